use std::collections::BTreeMap;
use std::path::PathBuf;

use animxref::asset::{MapAnimation, SurveyReport, XrefReport, run_survey};
use tracing::info;

use crate::cmd::config::{SurveyConfig, SurveyOverrides};
use crate::cmd::util::{emit_json, table_summary};

#[derive(clap::Args)]
pub struct Args {
	/// TOML file with survey inputs; flags override its values.
	#[arg(long)]
	pub config: Option<PathBuf>,
	#[arg(long)]
	pub container_dir: Option<PathBuf>,
	/// Map directory; repeat for several.
	#[arg(long = "map-dir")]
	pub map_dirs: Vec<PathBuf>,
	#[arg(long)]
	pub catalog: Option<PathBuf>,
	/// Map name reported in the excluded section; repeat for several.
	#[arg(long = "exclude-map")]
	pub exclude_maps: Vec<String>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct SurveyJson {
	containers: ContainerCountsJson,
	maps: MapCountsJson,
	catalog: CatalogJson,
	assets: Vec<AssetJson>,
	orphans: Vec<String>,
	included_maps: Vec<MapJson>,
	excluded_maps: Vec<MapJson>,
	usage: UsageJson,
}

#[derive(serde::Serialize)]
struct ContainerCountsJson {
	scanned: usize,
	legacy: usize,
	rejected: BTreeMap<&'static str, usize>,
	texture_animated: usize,
	with_uv: usize,
	with_image: usize,
	with_opacity: usize,
	bone_material_only: usize,
	skipped_objects: BTreeMap<&'static str, usize>,
	truncated_directories: usize,
}

#[derive(serde::Serialize)]
struct MapCountsJson {
	scanned: usize,
	rejected: BTreeMap<&'static str, usize>,
	placements: usize,
	truncated_sections: usize,
}

#[derive(serde::Serialize)]
struct CatalogJson {
	entries: usize,
	records: usize,
	not_existing: usize,
	empty_names: usize,
	too_narrow: usize,
	overwritten: usize,
	animated_ids: Vec<u32>,
	cataloged_assets: usize,
}

#[derive(serde::Serialize)]
struct AssetJson {
	asset_name: String,
	object_ids: Vec<u32>,
	channels: Vec<&'static str>,
	animated_objects: usize,
}

#[derive(serde::Serialize)]
struct MapJson {
	name: String,
	model_types: usize,
	animated: Vec<MapEntryJson>,
}

#[derive(serde::Serialize)]
struct MapEntryJson {
	object_id: u32,
	asset_name: Option<String>,
	channels: Vec<&'static str>,
}

#[derive(serde::Serialize)]
struct UsageJson {
	opacity: Vec<SlotJson>,
	uv: Vec<SlotJson>,
	image: Vec<SlotJson>,
}

#[derive(serde::Serialize)]
struct SlotJson {
	subset: u8,
	stage: Option<u8>,
	containers: usize,
}

/// Run the full cross-reference survey over directories named by flags and/or a config file.
pub fn run(args: Args) -> animxref::asset::Result<()> {
	let Args {
		config,
		container_dir,
		map_dirs,
		catalog,
		exclude_maps,
		json,
	} = args;

	let base = match &config {
		Some(path) => SurveyConfig::load(path)?,
		None => SurveyConfig::default(),
	};
	let config = base.with_overrides(SurveyOverrides {
		container_dir,
		map_dirs,
		catalog_path: catalog,
		excluded_maps: exclude_maps,
	});
	let source = config.to_source()?;
	info!(containers = %source.container_dir.display(), maps = source.map_dirs.len(), "starting survey");

	let report = run_survey(&source)?;
	let (included, excluded): (Vec<&MapAnimation>, Vec<&MapAnimation>) =
		report.xref.maps.iter().partition(|map| !config.is_excluded(&map.name));

	if json {
		emit_json(&survey_json(&report, &included, &excluded));
		return Ok(());
	}

	print_text(&report, &included, &excluded);
	Ok(())
}

fn print_text(report: &SurveyReport, included: &[&MapAnimation], excluded: &[&MapAnimation]) {
	let counts = &report.containers;
	println!("== containers ==");
	println!("scanned: {}", counts.scanned);
	println!("legacy: {}", counts.legacy);
	for (kind, count) in &counts.rejected {
		println!("rejected_{kind}: {count}");
	}
	println!("texture_animated: {}", counts.texture_animated);
	println!("  with_uv: {}", counts.with_uv);
	println!("  with_image: {}", counts.with_image);
	println!("  with_opacity: {}", counts.with_opacity);
	println!("bone_material_only: {}", counts.bone_material_only);
	for (kind, count) in &counts.skipped_objects {
		println!("skipped_objects_{kind}: {count}");
	}

	println!();
	println!("== detailed findings ==");
	for (name, objects) in &report.animated {
		println!("{name}:");
		for object in objects {
			println!("  obj[{}]: {}", object.index, table_summary(&object.table));
		}
	}

	let xref = &report.xref;
	println!();
	println!("== cross reference ==");
	println!("catalog_entries: {}", report.catalog_entries);
	println!("catalog_skipped_not_existing: {}", report.catalog.not_existing);
	println!("catalog_skipped_empty_name: {}", report.catalog.empty_names);
	println!("catalog_skipped_too_narrow: {}", report.catalog.too_narrow);
	println!("catalog_overwritten: {}", report.catalog.overwritten);
	println!("cataloged_animated_assets: {}", xref.cataloged_assets());
	println!("animated_ids: {}", xref.animated_ids.len());
	if !xref.orphans.is_empty() {
		println!("orphans: {}", xref.orphans.join(", "));
	}
	println!("maps_scanned: {}", report.maps.scanned);
	for (kind, count) in &report.maps.rejected {
		println!("maps_rejected_{kind}: {count}");
	}

	println!();
	println!("== included maps ({}) ==", included.len());
	for map in included {
		print_map(xref, map);
	}
	if !excluded.is_empty() {
		println!();
		println!("== excluded maps ({}) ==", excluded.len());
		for map in excluded {
			print_map(xref, map);
		}
	}

	let usage = &xref.usage;
	println!();
	println!("== channel usage ==");
	for ((subset, stage), count) in &usage.uv {
		println!("uv subset={subset} stage={stage}: {count}");
	}
	for ((subset, stage), count) in &usage.image {
		println!("image subset={subset} stage={stage}: {count}");
	}
	for (subset, count) in &usage.opacity {
		println!("opacity subset={subset}: {count}");
	}
}

fn print_map(xref: &XrefReport, map: &MapAnimation) {
	println!("{} ({} model types, {} animated):", map.name, map.model_types, map.animated_ids.len());
	for object_id in &map.animated_ids {
		match xref.asset_for_id(*object_id) {
			Some(asset) => {
				let channels: Vec<&str> = asset.channels.iter().copied().collect();
				println!("  {object_id} -> {} [{}]", asset.asset_name, channels.join(", "));
			}
			None => println!("  {object_id} -> ?"),
		}
	}
}

fn survey_json(report: &SurveyReport, included: &[&MapAnimation], excluded: &[&MapAnimation]) -> SurveyJson {
	let counts = &report.containers;
	let xref = &report.xref;
	SurveyJson {
		containers: ContainerCountsJson {
			scanned: counts.scanned,
			legacy: counts.legacy,
			rejected: counts.rejected.clone(),
			texture_animated: counts.texture_animated,
			with_uv: counts.with_uv,
			with_image: counts.with_image,
			with_opacity: counts.with_opacity,
			bone_material_only: counts.bone_material_only,
			skipped_objects: counts.skipped_objects.clone(),
			truncated_directories: counts.truncated_directories,
		},
		maps: MapCountsJson {
			scanned: report.maps.scanned,
			rejected: report.maps.rejected.clone(),
			placements: report.maps.placements,
			truncated_sections: report.maps.truncated_sections,
		},
		catalog: CatalogJson {
			entries: report.catalog_entries,
			records: report.catalog.records,
			not_existing: report.catalog.not_existing,
			empty_names: report.catalog.empty_names,
			too_narrow: report.catalog.too_narrow,
			overwritten: report.catalog.overwritten,
			animated_ids: xref.animated_ids.iter().copied().collect(),
			cataloged_assets: xref.cataloged_assets(),
		},
		assets: xref
			.assets
			.values()
			.map(|asset| AssetJson {
				asset_name: asset.asset_name.to_string(),
				object_ids: asset.object_ids.iter().copied().collect(),
				channels: asset.channels.iter().copied().collect(),
				animated_objects: asset.animated_objects,
			})
			.collect(),
		orphans: xref.orphans.iter().map(ToString::to_string).collect(),
		included_maps: included.iter().map(|map| map_json(xref, map)).collect(),
		excluded_maps: excluded.iter().map(|map| map_json(xref, map)).collect(),
		usage: UsageJson {
			opacity: xref
				.usage
				.opacity
				.iter()
				.map(|(subset, containers)| SlotJson {
					subset: *subset,
					stage: None,
					containers: *containers,
				})
				.collect(),
			uv: stage_slots(&xref.usage.uv),
			image: stage_slots(&xref.usage.image),
		},
	}
}

fn map_json(xref: &XrefReport, map: &MapAnimation) -> MapJson {
	MapJson {
		name: map.name.to_string(),
		model_types: map.model_types,
		animated: map
			.animated_ids
			.iter()
			.map(|object_id| {
				let asset = xref.asset_for_id(*object_id);
				MapEntryJson {
					object_id: *object_id,
					asset_name: asset.map(|item| item.asset_name.to_string()),
					channels: asset.map(|item| item.channels.iter().copied().collect()).unwrap_or_default(),
				}
			})
			.collect(),
	}
}

fn stage_slots(usage: &BTreeMap<(u8, u8), usize>) -> Vec<SlotJson> {
	usage
		.iter()
		.map(|((subset, stage), containers)| SlotJson {
			subset: *subset,
			stage: Some(*stage),
			containers: *containers,
		})
		.collect()
}
