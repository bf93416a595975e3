use std::collections::{BTreeMap, BTreeSet};

use crate::asset::{Catalog, ContainerScan, MapScan, ObjectAnimation, PlacementKind};

/// A named container scan fed to the join.
#[derive(Debug, Clone, Copy)]
pub struct ContainerRef<'a> {
	/// Container file name; matched against catalog names case-insensitively.
	pub name: &'a str,
	/// Decode result for that file.
	pub scan: &'a ContainerScan,
}

/// A texture-animated container and the catalog ids that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedAsset {
	/// Lowercased container name.
	pub asset_name: Box<str>,
	/// Catalog ids naming this asset; empty for orphans.
	pub object_ids: BTreeSet<u32>,
	/// Texture channels present across its objects (`image`, `opacity`, `uv`).
	pub channels: BTreeSet<&'static str>,
	/// Number of texture-animated objects in the container.
	pub animated_objects: usize,
}

/// Animated buildings placed on one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapAnimation {
	/// Map identity.
	pub name: Box<str>,
	/// Distinct model ids placed on the map.
	pub model_types: usize,
	/// Placed model ids whose asset is texture-animated.
	pub animated_ids: BTreeSet<u32>,
}

/// Number of distinct containers using each channel slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUsage {
	/// Opacity usage by subset.
	pub opacity: BTreeMap<u8, usize>,
	/// Uv usage by `(subset, stage)`.
	pub uv: BTreeMap<(u8, u8), usize>,
	/// Image usage by `(subset, stage)`.
	pub image: BTreeMap<(u8, u8), usize>,
}

/// Output of the catalog/container/map join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XrefReport {
	/// Texture-animated containers keyed by lowercased name.
	pub assets: BTreeMap<Box<str>, AnimatedAsset>,
	/// Every catalog id that resolves to a texture-animated container.
	pub animated_ids: BTreeSet<u32>,
	/// Representative asset name per animated id.
	pub asset_by_id: BTreeMap<u32, Box<str>>,
	/// Maps placing at least one animated model, ordered by name.
	pub maps: Vec<MapAnimation>,
	/// Animated containers with no catalog entry.
	pub orphans: Vec<Box<str>>,
	/// Channel slot usage across animated containers.
	pub usage: ChannelUsage,
}

impl XrefReport {
	/// Look up the animated asset behind a catalog id.
	pub fn asset_for_id(&self, object_id: u32) -> Option<&AnimatedAsset> {
		let name = self.asset_by_id.get(&object_id)?;
		self.assets.get(name)
	}

	/// Animated containers that have at least one catalog id.
	pub fn cataloged_assets(&self) -> usize {
		self.assets.values().filter(|item| !item.object_ids.is_empty()).count()
	}
}

/// Join the catalog, container scans, and map scans.
///
/// Output depends only on the inputs' contents: containers and maps sharing a name are merged, and every collection
/// is ordered by key.
pub fn cross_reference(catalog: &Catalog, containers: &[ContainerRef<'_>], maps: &[MapScan]) -> XrefReport {
	let ids_by_asset = catalog.ids_by_asset();

	let mut animations: BTreeMap<Box<str>, Vec<&ObjectAnimation>> = BTreeMap::new();
	for container in containers {
		if !container.scan.is_texture_animated() {
			continue;
		}
		let name = container.name.trim().to_lowercase().into_boxed_str();
		animations.entry(name).or_default().extend(&container.scan.animations);
	}

	let mut report = XrefReport::default();
	for (name, objects) in &animations {
		let object_ids = ids_by_asset.get(name.as_ref()).cloned().unwrap_or_default();
		if object_ids.is_empty() {
			report.orphans.push(name.clone());
		}
		for object_id in &object_ids {
			report.animated_ids.insert(*object_id);
			report.asset_by_id.insert(*object_id, name.clone());
		}

		record_usage(&mut report.usage, objects);

		report.assets.insert(
			name.clone(),
			AnimatedAsset {
				asset_name: name.clone(),
				object_ids,
				channels: objects.iter().flat_map(|item| item.table.channel_labels()).collect(),
				animated_objects: objects.len(),
			},
		);
	}

	let mut models_by_map: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
	for map in maps {
		models_by_map.entry(map.name.as_ref()).or_default().extend(map.ids_of_kind(PlacementKind::Model));
	}
	for (name, models) in models_by_map {
		let animated_ids: BTreeSet<u32> = models.intersection(&report.animated_ids).copied().collect();
		if animated_ids.is_empty() {
			continue;
		}
		report.maps.push(MapAnimation {
			name: name.into(),
			model_types: models.len(),
			animated_ids,
		});
	}

	report
}

fn record_usage(usage: &mut ChannelUsage, objects: &[&ObjectAnimation]) {
	let mut opacity = BTreeSet::new();
	let mut uv = BTreeSet::new();
	let mut image = BTreeSet::new();
	for object in objects {
		opacity.extend(object.table.opacity_sizes.iter().map(|item| item.subset));
		uv.extend(object.table.uv_sizes.iter().map(|item| (item.subset, item.stage)));
		image.extend(object.table.image_sizes.iter().map(|item| (item.subset, item.stage)));
	}

	for key in opacity {
		*usage.opacity.entry(key).or_insert(0) += 1;
	}
	for key in uv {
		*usage.uv.entry(key).or_insert(0) += 1;
	}
	for key in image {
		*usage.image.entry(key).or_insert(0) += 1;
	}
}
