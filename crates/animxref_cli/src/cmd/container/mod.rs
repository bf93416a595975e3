use std::path::PathBuf;

use animxref::asset::{ContainerScan, decode_container};

use crate::cmd::util::{TableJson, emit_json, file_name, table_summary};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct ContainerJson {
	name: String,
	format_version: Option<u32>,
	object_count: Option<u32>,
	entry_count: Option<usize>,
	has_opacity: Option<bool>,
	rejected: Option<String>,
	rejected_kind: Option<&'static str>,
	geometry_objects: usize,
	bone_material_only: usize,
	directory_truncated: bool,
	texture_animated: bool,
	animations: Vec<ObjectJson>,
	skipped: Vec<SkipJson>,
}

#[derive(serde::Serialize)]
struct ObjectJson {
	index: usize,
	channels: Vec<&'static str>,
	table: TableJson,
}

#[derive(serde::Serialize)]
struct SkipJson {
	index: usize,
	kind: &'static str,
	error: String,
}

/// Decode one container file and print its animation size tables.
pub fn run(args: Args) -> animxref::asset::Result<()> {
	let Args { path, json } = args;
	let bytes = std::fs::read(&path)?;
	let name = file_name(&path);
	let scan = decode_container(&bytes);

	if json {
		emit_json(&container_json(name, &scan));
		return Ok(());
	}

	println!("path: {}", path.display());
	if let Some(header) = scan.header {
		let shape = header.shape();
		println!("format_version: 0x{:04x}", header.format_version);
		println!("object_count: {}", header.object_count);
		println!("table_entries: {}", shape.entry_count);
		println!("has_opacity: {}", shape.has_opacity);
	}
	if let Some(err) = &scan.rejected {
		println!("rejected: {err}");
		return Ok(());
	}

	println!("geometry_objects: {}", scan.geometry_objects);
	println!("animated_objects: {}", scan.animations.len());
	for anim in &scan.animations {
		println!("  obj[{}]: {}", anim.index, table_summary(&anim.table));
	}
	println!("bone_material_only: {}", scan.bone_material_only);
	if scan.directory_truncated {
		println!("directory: truncated");
	}
	for skip in &scan.skipped {
		println!("  skipped obj[{}]: {}", skip.index, skip.error);
	}
	Ok(())
}

fn container_json(name: String, scan: &ContainerScan) -> ContainerJson {
	ContainerJson {
		name,
		format_version: scan.header.map(|header| header.format_version),
		object_count: scan.header.map(|header| header.object_count),
		entry_count: scan.header.map(|header| header.shape().entry_count),
		has_opacity: scan.header.map(|header| header.shape().has_opacity),
		rejected: scan.rejected.as_ref().map(ToString::to_string),
		rejected_kind: scan.rejected.as_ref().map(|err| err.kind()),
		geometry_objects: scan.geometry_objects,
		bone_material_only: scan.bone_material_only,
		directory_truncated: scan.directory_truncated,
		texture_animated: scan.is_texture_animated(),
		animations: scan
			.animations
			.iter()
			.map(|anim| ObjectJson {
				index: anim.index,
				channels: anim.table.channel_labels(),
				table: TableJson::from(&anim.table),
			})
			.collect(),
		skipped: scan
			.skipped
			.iter()
			.map(|skip| SkipJson {
				index: skip.index,
				kind: skip.error.kind(),
				error: skip.error.to_string(),
			})
			.collect(),
	}
}
