use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::info;

use crate::asset::{
	AssetSource, CatalogStats, ContainerRef, ContainerScan, DecodeError, MapScan, ObjectAnimation, Result, XrefReport, cross_reference, decode_catalog,
	decode_container, decode_map,
};

/// Container-side counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerCounts {
	/// Files read.
	pub scanned: usize,
	/// Files carrying the legacy version marker.
	pub legacy: usize,
	/// Other file-level rejections by error kind.
	pub rejected: BTreeMap<&'static str, usize>,
	/// Files with any texture-animated object.
	pub texture_animated: usize,
	/// Files with uv animation.
	pub with_uv: usize,
	/// Files with image animation.
	pub with_image: usize,
	/// Files with opacity animation.
	pub with_opacity: usize,
	/// Files without texture animation but with bone or material animation.
	pub bone_material_only: usize,
	/// Geometry objects dropped by error kind.
	pub skipped_objects: BTreeMap<&'static str, usize>,
	/// Files whose directory ended early.
	pub truncated_directories: usize,
}

/// Map-side counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapCounts {
	/// Files read.
	pub scanned: usize,
	/// Files rejected by error kind.
	pub rejected: BTreeMap<&'static str, usize>,
	/// Distinct placements summed over decoded maps.
	pub placements: usize,
	/// Sections cut short by end of file.
	pub truncated_sections: usize,
}

/// Everything a survey produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyReport {
	/// Container counters.
	pub containers: ContainerCounts,
	/// Map counters.
	pub maps: MapCounts,
	/// Catalog decode counters.
	pub catalog: CatalogStats,
	/// Distinct catalog ids.
	pub catalog_entries: usize,
	/// Texture-animated objects per container name.
	pub animated: BTreeMap<Box<str>, Vec<ObjectAnimation>>,
	/// Join output.
	pub xref: XrefReport,
}

/// Decode every source file in parallel, then join.
pub fn run_survey<S: AssetSource + ?Sized>(source: &S) -> Result<SurveyReport> {
	let container_files = source.container_files()?;
	let map_files = source.map_files()?;
	let catalog_bytes = source.catalog()?;

	let ((containers, maps), catalog) = rayon::join(
		|| {
			rayon::join(
				|| {
					container_files
						.par_iter()
						.map(|file| (&*file.name, decode_container(&file.bytes)))
						.collect::<Vec<_>>()
				},
				|| map_files.par_iter().map(|file| decode_map(&file.name, &file.bytes)).collect::<Vec<_>>(),
			)
		},
		|| decode_catalog(&catalog_bytes),
	);

	let refs: Vec<ContainerRef<'_>> = containers.iter().map(|(name, scan)| ContainerRef { name: *name, scan }).collect();
	let xref = cross_reference(&catalog, &refs, &maps);

	let report = SurveyReport {
		containers: count_containers(&containers),
		maps: count_maps(&maps),
		catalog: catalog.stats,
		catalog_entries: catalog.len(),
		animated: animated_by_name(&containers),
		xref,
	};

	info!(
		containers = report.containers.scanned,
		texture_animated = report.containers.texture_animated,
		maps = report.maps.scanned,
		catalog = report.catalog_entries,
		animated_ids = report.xref.animated_ids.len(),
		"survey complete"
	);
	Ok(report)
}

fn animated_by_name(scans: &[(&str, ContainerScan)]) -> BTreeMap<Box<str>, Vec<ObjectAnimation>> {
	let mut out: BTreeMap<Box<str>, Vec<ObjectAnimation>> = BTreeMap::new();
	for (name, scan) in scans.iter().filter(|(_, scan)| scan.is_texture_animated()) {
		let key = name.trim().to_lowercase().into_boxed_str();
		out.entry(key).or_default().extend(scan.animations.iter().cloned());
	}
	out
}

fn count_containers(scans: &[(&str, ContainerScan)]) -> ContainerCounts {
	let mut out = ContainerCounts::default();
	for (_, scan) in scans {
		out.scanned += 1;
		match &scan.rejected {
			Some(_) if scan.is_legacy() => out.legacy += 1,
			Some(err) => bump(&mut out.rejected, err),
			None => {}
		}
		for skip in &scan.skipped {
			bump(&mut out.skipped_objects, &skip.error);
		}
		if scan.directory_truncated {
			out.truncated_directories += 1;
		}

		if scan.is_texture_animated() {
			out.texture_animated += 1;
			out.with_uv += usize::from(scan.has_uv());
			out.with_image += usize::from(scan.has_image());
			out.with_opacity += usize::from(scan.has_opacity());
		} else if scan.bone_material_only > 0 {
			out.bone_material_only += 1;
		}
	}
	out
}

fn count_maps(scans: &[MapScan]) -> MapCounts {
	let mut out = MapCounts::default();
	for scan in scans {
		out.scanned += 1;
		if let Some(err) = &scan.rejected {
			bump(&mut out.rejected, err);
		}
		out.placements += scan.placements.len();
		out.truncated_sections += scan.truncated_sections;
	}
	out
}

fn bump(counts: &mut BTreeMap<&'static str, usize>, err: &DecodeError) {
	*counts.entry(err.kind()).or_insert(0) += 1;
}
