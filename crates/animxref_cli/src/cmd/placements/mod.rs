use std::path::PathBuf;

use animxref::asset::{MapScan, PlacementKind, decode_map};

use crate::cmd::util::{emit_json, file_stem, parse_placement_kind};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Only list placements of this kind (`model` or `effect`).
	#[arg(long)]
	pub kind: Option<String>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct PlacementsJson {
	name: String,
	version: Option<i32>,
	columns: Option<i32>,
	rows: Option<i32>,
	section_width: Option<i32>,
	section_height: Option<i32>,
	declared_placements: Option<i32>,
	rejected: Option<String>,
	rejected_kind: Option<&'static str>,
	populated_sections: usize,
	truncated_sections: usize,
	slots_read: usize,
	placements: Vec<PlacementJson>,
}

#[derive(serde::Serialize)]
struct PlacementJson {
	kind: &'static str,
	object_id: u32,
}

/// Decode one map file and print its distinct placements.
pub fn run(args: Args) -> animxref::asset::Result<()> {
	let Args { path, kind, json } = args;
	let kind = kind.as_deref().map(parse_placement_kind).transpose()?;
	let bytes = std::fs::read(&path)?;
	let scan = decode_map(&file_stem(&path), &bytes);

	let placements: Vec<PlacementJson> = scan
		.placements
		.iter()
		.filter(|entry| kind.is_none_or(|kind| entry.kind == kind))
		.map(|entry| PlacementJson {
			kind: entry.kind.as_str(),
			object_id: entry.object_id,
		})
		.collect();

	if json {
		emit_json(&placements_json(&scan, placements));
		return Ok(());
	}

	println!("name: {}", scan.name);
	if let Some(header) = scan.header {
		println!("grid: {}x{}", header.columns, header.rows);
		println!("section_size: {}x{}", header.section_width, header.section_height);
		println!("declared_placements: {}", header.declared_placements);
	}
	if let Some(err) = &scan.rejected {
		println!("rejected: {err}");
		return Ok(());
	}
	println!("populated_sections: {}", scan.populated_sections);
	println!("truncated_sections: {}", scan.truncated_sections);
	println!("model_types: {}", scan.ids_of_kind(PlacementKind::Model).len());
	println!("effect_types: {}", scan.ids_of_kind(PlacementKind::Effect).len());
	for entry in &placements {
		println!("  {} {}", entry.kind, entry.object_id);
	}
	Ok(())
}

fn placements_json(scan: &MapScan, placements: Vec<PlacementJson>) -> PlacementsJson {
	PlacementsJson {
		name: scan.name.to_string(),
		version: scan.header.map(|header| header.version),
		columns: scan.header.map(|header| header.columns),
		rows: scan.header.map(|header| header.rows),
		section_width: scan.header.map(|header| header.section_width),
		section_height: scan.header.map(|header| header.section_height),
		declared_placements: scan.header.map(|header| header.declared_placements),
		rejected: scan.rejected.as_ref().map(ToString::to_string),
		rejected_kind: scan.rejected.as_ref().map(|err| err.kind()),
		populated_sections: scan.populated_sections,
		truncated_sections: scan.truncated_sections,
		slots_read: scan.slots_read,
		placements,
	}
}

#[cfg(test)]
mod tests;
