use std::path::Path;

use animxref::asset::{AnimationSizeTable, AssetError, PlacementKind, Result};

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Parse a `model` / `effect` placement kind argument.
pub(crate) fn parse_placement_kind(value: &str) -> Result<PlacementKind> {
	match value.to_ascii_lowercase().as_str() {
		"model" | "0" => Ok(PlacementKind::Model),
		"effect" | "1" => Ok(PlacementKind::Effect),
		_ => Err(AssetError::InvalidPlacementKind { value: value.to_owned() }),
	}
}

/// File name component, lossy, or the whole path when there is none.
pub(crate) fn file_name(path: &Path) -> String {
	path.file_name()
		.map(|item| item.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

/// File stem component, lossy, or the whole path when there is none.
pub(crate) fn file_stem(path: &Path) -> String {
	path.file_stem()
		.map(|item| item.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

/// One-line `bone=.., uv[s][t]=..` summary of a size table.
pub(crate) fn table_summary(table: &AnimationSizeTable) -> String {
	let mut parts = Vec::new();
	if table.bone_size > 0 {
		parts.push(format!("bone={}", table.bone_size));
	}
	if table.material_anim_size > 0 {
		parts.push(format!("material={}", table.material_anim_size));
	}
	for item in &table.opacity_sizes {
		parts.push(format!("opacity[{}]={}", item.subset, item.size));
	}
	for item in &table.uv_sizes {
		parts.push(format!("uv[{}][{}]={}", item.subset, item.stage, item.size));
	}
	for item in &table.image_sizes {
		parts.push(format!("image[{}][{}]={}", item.subset, item.stage, item.size));
	}
	parts.join(", ")
}

#[derive(serde::Serialize)]
pub(crate) struct OpacityJson {
	pub(crate) subset: u8,
	pub(crate) size: u32,
}

#[derive(serde::Serialize)]
pub(crate) struct StageJson {
	pub(crate) subset: u8,
	pub(crate) stage: u8,
	pub(crate) size: u32,
}

#[derive(serde::Serialize)]
pub(crate) struct TableJson {
	pub(crate) bone_size: u32,
	pub(crate) material_anim_size: u32,
	pub(crate) opacity: Vec<OpacityJson>,
	pub(crate) uv: Vec<StageJson>,
	pub(crate) image: Vec<StageJson>,
}

impl From<&AnimationSizeTable> for TableJson {
	fn from(table: &AnimationSizeTable) -> Self {
		Self {
			bone_size: table.bone_size,
			material_anim_size: table.material_anim_size,
			opacity: table
				.opacity_sizes
				.iter()
				.map(|item| OpacityJson {
					subset: item.subset,
					size: item.size,
				})
				.collect(),
			uv: table.uv_sizes.iter().map(stage_json).collect(),
			image: table.image_sizes.iter().map(stage_json).collect(),
		}
	}
}

fn stage_json(item: &animxref::asset::StageSize) -> StageJson {
	StageJson {
		subset: item.subset,
		stage: item.stage,
		size: item.size,
	}
}
