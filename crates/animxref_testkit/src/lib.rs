//! Shared test helpers for workspace crates.
//!
//! The builders emit raw little-endian bytes in the container, catalog, and map layouts so tests can exercise the
//! decoders without shipping binary fixtures.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Object kind tag for geometry entries in a container directory.
pub const GEOMETRY_KIND: u32 = 1;
/// Geometry preamble width.
pub const PREAMBLE_SIZE: usize = 116;
/// Map file version accepted by the placement decoder.
pub const MAP_VERSION: i32 = 600;
/// Placement slot stride in map files.
pub const PLACEMENT_STRIDE: usize = 20;

/// Channel sizes for one synthetic animation block.
#[derive(Debug, Clone, Default)]
pub struct AnimSpec {
	/// Bone payload size.
	pub bone: u32,
	/// Material payload size.
	pub material: u32,
	/// `(subset, size)` opacity entries. Ignored for versions below `0x1005`.
	pub opacity: Vec<(u8, u32)>,
	/// `(subset, stage, size)` uv entries.
	pub uv: Vec<(u8, u8, u32)>,
	/// `(subset, stage, size)` image entries.
	pub image: Vec<(u8, u8, u32)>,
}

impl AnimSpec {
	/// Set the bone payload size.
	pub fn bone(mut self, size: u32) -> Self {
		self.bone = size;
		self
	}

	/// Set the material payload size.
	pub fn material(mut self, size: u32) -> Self {
		self.material = size;
		self
	}

	/// Add an opacity entry.
	pub fn opacity(mut self, subset: u8, size: u32) -> Self {
		self.opacity.push((subset, size));
		self
	}

	/// Add a uv entry.
	pub fn uv(mut self, subset: u8, stage: u8, size: u32) -> Self {
		self.uv.push((subset, stage, size));
		self
	}

	/// Add an image entry.
	pub fn image(mut self, subset: u8, stage: u8, size: u32) -> Self {
		self.image.push((subset, stage, size));
		self
	}

	fn payload_size(&self, with_opacity: bool) -> u64 {
		let opacity: u64 = if with_opacity { self.opacity.iter().map(|item| u64::from(item.1)).sum() } else { 0 };
		let uv: u64 = self.uv.iter().map(|item| u64::from(item.2)).sum();
		let image: u64 = self.image.iter().map(|item| u64::from(item.2)).sum();
		u64::from(self.bone) + u64::from(self.material) + opacity + uv + image
	}

	fn table(&self, with_opacity: bool) -> Vec<u32> {
		let mut out = vec![self.bone, self.material];
		if with_opacity {
			let mut opacity = [0_u32; 16];
			for (subset, size) in &self.opacity {
				opacity[usize::from(*subset)] = *size;
			}
			out.extend_from_slice(&opacity);
		}
		for grid in [&self.uv, &self.image] {
			let mut cells = [0_u32; 64];
			for (subset, stage, size) in grid {
				cells[usize::from(*subset) * 4 + usize::from(*stage)] = *size;
			}
			out.extend_from_slice(&cells);
		}
		out
	}
}

/// One geometry object in a synthetic container.
#[derive(Debug, Clone, Default)]
pub struct GeometrySpec {
	/// Material, mesh, helper block sizes.
	pub blocks: [u32; 3],
	/// Animation block, `None` for static geometry.
	pub animation: Option<AnimSpec>,
	/// Added to the correct animation block size when writing the preamble.
	pub size_delta: i64,
}

impl GeometrySpec {
	/// Geometry without animation.
	pub fn static_mesh() -> Self {
		Self::default()
	}

	/// Geometry with the given animation channels.
	pub fn animated(anim: AnimSpec) -> Self {
		Self {
			animation: Some(anim),
			..Self::default()
		}
	}

	/// Set material, mesh, and helper block sizes.
	pub fn with_blocks(mut self, material: u32, mesh: u32, helper: u32) -> Self {
		self.blocks = [material, mesh, helper];
		self
	}

	/// Skew the declared animation block size.
	pub fn with_size_delta(mut self, delta: i64) -> Self {
		self.size_delta = delta;
		self
	}
}

#[derive(Debug, Clone)]
enum ObjectSpec {
	Geometry(GeometrySpec),
	Other { kind: u32, len: usize },
}

/// Builder for container files.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
	version: u32,
	objects: Vec<ObjectSpec>,
	object_count: Option<u32>,
}

impl ContainerBuilder {
	/// Start a container with the given format version.
	pub fn new(version: u32) -> Self {
		Self {
			version,
			objects: Vec::new(),
			object_count: None,
		}
	}

	/// Append a geometry object.
	pub fn geometry(mut self, spec: GeometrySpec) -> Self {
		self.objects.push(ObjectSpec::Geometry(spec));
		self
	}

	/// Append a non-geometry object with an opaque payload.
	pub fn other(mut self, kind: u32, len: usize) -> Self {
		self.objects.push(ObjectSpec::Other { kind, len });
		self
	}

	/// Override the declared object count.
	pub fn object_count(mut self, count: u32) -> Self {
		self.object_count = Some(count);
		self
	}

	/// Serialize header, directory, and object regions.
	pub fn build(&self) -> Vec<u8> {
		let with_opacity = self.version >= 0x1005;
		let entry_count = if with_opacity { 146 } else { 130 };
		let count = self.object_count.unwrap_or(self.objects.len() as u32);

		let mut regions = Vec::new();
		for object in &self.objects {
			regions.push(match object {
				ObjectSpec::Geometry(spec) => (GEOMETRY_KIND, geometry_region(spec, entry_count, with_opacity)),
				ObjectSpec::Other { kind, len } => (*kind, vec![0_u8; *len]),
			});
		}

		let mut out = Vec::new();
		out.extend_from_slice(&self.version.to_le_bytes());
		out.extend_from_slice(&count.to_le_bytes());

		let mut offset = 8 + regions.len() * 12;
		for (kind, region) in &regions {
			out.extend_from_slice(&kind.to_le_bytes());
			out.extend_from_slice(&(offset as u32).to_le_bytes());
			out.extend_from_slice(&(region.len() as u32).to_le_bytes());
			offset += region.len();
		}
		for (_, region) in regions {
			out.extend_from_slice(&region);
		}
		out
	}
}

fn geometry_region(spec: &GeometrySpec, entry_count: usize, with_opacity: bool) -> Vec<u8> {
	let anim_size = match &spec.animation {
		Some(anim) => (entry_count as u64 * 4 + anim.payload_size(with_opacity)) as i64 + spec.size_delta,
		None => 0,
	};

	let mut out = vec![0_u8; PREAMBLE_SIZE];
	for (idx, size) in spec.blocks.iter().enumerate() {
		out[100 + idx * 4..104 + idx * 4].copy_from_slice(&size.to_le_bytes());
	}
	out[112..116].copy_from_slice(&(anim_size as u32).to_le_bytes());

	let block_bytes: u32 = spec.blocks.iter().sum();
	out.resize(out.len() + block_bytes as usize, 0);

	if let Some(anim) = &spec.animation {
		for value in anim.table(with_opacity) {
			out.extend_from_slice(&value.to_le_bytes());
		}
		out.resize(out.len() + anim.payload_size(with_opacity) as usize, 0xAB);
	}
	out
}

/// Builder for object catalog tables.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
	record_width: u32,
	records: Vec<Vec<u8>>,
	trailing: usize,
}

impl CatalogBuilder {
	/// Default record width, wide enough for the id field at offset 100.
	pub const DEFAULT_WIDTH: u32 = 120;

	/// Start a catalog with the default record width.
	pub fn new() -> Self {
		Self::with_width(Self::DEFAULT_WIDTH)
	}

	/// Start a catalog with an explicit record width.
	pub fn with_width(record_width: u32) -> Self {
		Self {
			record_width,
			records: Vec::new(),
			trailing: 0,
		}
	}

	/// Append an existing record.
	pub fn record(self, id: u32, name: &str) -> Self {
		self.raw_record(1, id, name.as_bytes())
	}

	/// Append a record whose `exists` flag is zero.
	pub fn missing(self, id: u32, name: &str) -> Self {
		self.raw_record(0, id, name.as_bytes())
	}

	/// Append a record with explicit flag and name bytes (truncated to 72 bytes).
	pub fn raw_record(mut self, exists: i32, id: u32, name: &[u8]) -> Self {
		let width = self.record_width as usize;
		let mut record = vec![0_u8; width.max(104)];
		record[0..4].copy_from_slice(&exists.to_le_bytes());
		let name_len = name.len().min(72);
		record[8..8 + name_len].copy_from_slice(&name[..name_len]);
		record[100..104].copy_from_slice(&id.to_le_bytes());
		record.truncate(width);
		self.records.push(record);
		self
	}

	/// Append a partial record of `len` bytes at the end.
	pub fn trailing(mut self, len: usize) -> Self {
		self.trailing = len;
		self
	}

	/// Serialize the table.
	pub fn build(&self) -> Vec<u8> {
		let mut out = self.record_width.to_le_bytes().to_vec();
		for record in &self.records {
			out.extend_from_slice(record);
		}
		out.resize(out.len() + self.trailing, 0x11);
		out
	}
}

impl Default for CatalogBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Pack a placement kind and id into the 16-bit map field.
pub fn pack_type_id(kind: u16, id: u16) -> u16 {
	(kind << 14) | (id & 0x3FFF)
}

/// Builder for map placement files.
#[derive(Debug, Clone)]
pub struct MapBuilder {
	version: i32,
	columns: i32,
	rows: i32,
	section_size: (i32, i32),
	sections: Vec<Vec<u16>>,
	overrides: Vec<(usize, i32, i32)>,
}

impl MapBuilder {
	/// Start a map with a `columns x rows` section grid.
	pub fn new(columns: i32, rows: i32) -> Self {
		let count = (columns.max(0) * rows.max(0)) as usize;
		Self {
			version: MAP_VERSION,
			columns,
			rows,
			section_size: (8, 8),
			sections: vec![Vec::new(); count],
			overrides: Vec::new(),
		}
	}

	/// Override the format version.
	pub fn version(mut self, version: i32) -> Self {
		self.version = version;
		self
	}

	/// Set the section width and height.
	pub fn section_size(mut self, width: i32, height: i32) -> Self {
		self.section_size = (width, height);
		self
	}

	/// Place a raw packed value in a section.
	pub fn place_raw(mut self, section: usize, raw: u16) -> Self {
		self.sections[section].push(raw);
		self
	}

	/// Place a model in a section.
	pub fn place_model(self, section: usize, id: u16) -> Self {
		self.place_raw(section, pack_type_id(0, id))
	}

	/// Place an effect in a section.
	pub fn place_effect(self, section: usize, id: u16) -> Self {
		self.place_raw(section, pack_type_id(1, id))
	}

	/// Force a section index entry to the given `(offset, count)`.
	pub fn override_section(mut self, section: usize, offset: i32, count: i32) -> Self {
		self.overrides.push((section, offset, count));
		self
	}

	/// Serialize header, section index, and placement slots.
	pub fn build(&self) -> Vec<u8> {
		let index_len = self.sections.len() * 8;
		let total: usize = self.sections.iter().map(Vec::len).sum();

		let mut out = vec![0_u8; 44];
		out[..5].copy_from_slice(b"map\0\0");
		out[16..20].copy_from_slice(&self.version.to_le_bytes());
		out[24..28].copy_from_slice(&self.columns.to_le_bytes());
		out[28..32].copy_from_slice(&self.rows.to_le_bytes());
		out[32..36].copy_from_slice(&self.section_size.0.to_le_bytes());
		out[36..40].copy_from_slice(&self.section_size.1.to_le_bytes());
		out[40..44].copy_from_slice(&(total as i32).to_le_bytes());

		let mut entries = Vec::new();
		let mut index = Vec::with_capacity(self.sections.len());
		let mut offset = 44 + index_len;
		for section in &self.sections {
			if section.is_empty() {
				index.push((0_i32, 0_i32));
				continue;
			}
			index.push((offset as i32, section.len() as i32));
			for raw in section {
				let mut slot = [0_u8; PLACEMENT_STRIDE];
				slot[0..2].copy_from_slice(&raw.to_le_bytes());
				slot[4..8].copy_from_slice(&100_i32.to_le_bytes());
				slot[8..12].copy_from_slice(&200_i32.to_le_bytes());
				entries.extend_from_slice(&slot);
			}
			offset += section.len() * PLACEMENT_STRIDE;
		}
		for (section, off, count) in &self.overrides {
			index[*section] = (*off, *count);
		}

		for (off, count) in index {
			out.extend_from_slice(&off.to_le_bytes());
			out.extend_from_slice(&count.to_le_bytes());
		}
		out.extend_from_slice(&entries);

		let file_size = out.len() as i32;
		out[20..24].copy_from_slice(&file_size.to_le_bytes());
		out
	}
}
