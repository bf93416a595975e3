use tracing::debug;

use crate::asset::error::DecodeResult;
use crate::asset::{
	AnimationSizeTable, ByteReader, DecodeError, GeometryAnimation, HeaderShape, decode_geometry_animation,
	read_bone_material_sizes, shape_for,
};

/// Largest object count accepted before a container is treated as corrupt.
pub const MAX_OBJECT_COUNT: u32 = 500;
/// Version marker of the legacy layout, which is not decoded.
pub const LEGACY_VERSION: u32 = 0;

const DIRECTORY_OFFSET: usize = 8;
const DIRECTORY_ENTRY_SIZE: usize = 12;
const GEOMETRY_KIND: u32 = 1;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
	/// Raw format version.
	pub format_version: u32,
	/// Declared number of directory entries.
	pub object_count: u32,
}

impl ContainerHeader {
	/// Parse and sanity-check the 8-byte header.
	pub fn parse(reader: ByteReader<'_>) -> DecodeResult<Self> {
		let format_version = reader.read_u32_le(0)?;
		let object_count = reader.read_u32_le(4)?;

		if format_version == LEGACY_VERSION {
			return Err(DecodeError::UnsupportedVersion {
				version: i64::from(format_version),
			});
		}
		if object_count > MAX_OBJECT_COUNT {
			return Err(DecodeError::ImplausibleCount {
				count: u64::from(object_count),
				max: u64::from(MAX_OBJECT_COUNT),
			});
		}

		Ok(Self { format_version, object_count })
	}

	/// Size-table layout for this container.
	pub fn shape(self) -> HeaderShape {
		shape_for(self.format_version)
	}
}

/// Directory entry object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
	/// Geometry object, possibly animated.
	Geometry,
	/// Any other object kind, carried as its raw tag.
	Other(u32),
}

impl ObjectKind {
	/// Map a raw directory tag.
	pub fn from_raw(raw: u32) -> Self {
		match raw {
			GEOMETRY_KIND => Self::Geometry,
			other => Self::Other(other),
		}
	}
}

/// One object directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
	/// Position in the directory.
	pub index: usize,
	/// Object kind.
	pub kind: ObjectKind,
	/// Absolute offset of the object region.
	pub byte_offset: u32,
	/// Declared object region length.
	pub declared_size: u32,
}

impl DirectoryEntry {
	/// Return `true` when the declared region lies inside a buffer of `len` bytes.
	pub fn region_fits(&self, len: usize) -> bool {
		(self.byte_offset as usize).checked_add(self.declared_size as usize).is_some_and(|end| end <= len)
	}
}

/// Read up to `object_count` directory entries.
///
/// Stops at the first entry that would overrun the buffer; the flag reports whether that happened.
pub fn read_directory(reader: ByteReader<'_>, header: ContainerHeader) -> (Vec<DirectoryEntry>, bool) {
	let mut out = Vec::with_capacity(header.object_count as usize);
	for index in 0..header.object_count as usize {
		let at = DIRECTORY_OFFSET + index * DIRECTORY_ENTRY_SIZE;
		let entry = reader.read_bytes(at, DIRECTORY_ENTRY_SIZE).map(ByteReader::new).and_then(|raw| {
			Ok(DirectoryEntry {
				index,
				kind: ObjectKind::from_raw(raw.read_u32_le(0)?),
				byte_offset: raw.read_u32_le(4)?,
				declared_size: raw.read_u32_le(8)?,
			})
		});
		match entry {
			Ok(entry) => out.push(entry),
			Err(_) => return (out, true),
		}
	}
	(out, false)
}

/// A texture-animated geometry object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAnimation {
	/// Directory index of the object.
	pub index: usize,
	/// Validated size table.
	pub table: AnimationSizeTable,
}

/// A geometry object dropped during decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSkip {
	/// Directory index of the object.
	pub index: usize,
	/// Why it was dropped.
	pub error: DecodeError,
}

/// Result of scanning one container file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerScan {
	/// Header, when it passed validation.
	pub header: Option<ContainerHeader>,
	/// File-level rejection; the scan is empty when set.
	pub rejected: Option<DecodeError>,
	/// Geometry entries examined.
	pub geometry_objects: usize,
	/// Objects with opacity, uv, or image channels.
	pub animations: Vec<ObjectAnimation>,
	/// Objects without a texture table whose animation block leads with a nonzero bone or material size.
	///
	/// Counted from the block's first eight bytes, so objects that fail the size check still count.
	pub bone_material_only: usize,
	/// Geometry objects dropped with their reason.
	pub skipped: Vec<ObjectSkip>,
	/// Directory ended before `object_count` entries.
	pub directory_truncated: bool,
}

impl ContainerScan {
	/// Return `true` when the file carries the legacy version marker.
	pub fn is_legacy(&self) -> bool {
		matches!(self.rejected, Some(DecodeError::UnsupportedVersion { version: 0 }))
	}

	/// Return `true` when any object has opacity, uv, or image animation.
	pub fn is_texture_animated(&self) -> bool {
		!self.animations.is_empty()
	}

	/// Return `true` when any object carries uv animation.
	pub fn has_uv(&self) -> bool {
		self.animations.iter().any(|item| !item.table.uv_sizes.is_empty())
	}

	/// Return `true` when any object carries image animation.
	pub fn has_image(&self) -> bool {
		self.animations.iter().any(|item| !item.table.image_sizes.is_empty())
	}

	/// Return `true` when any object carries opacity animation.
	pub fn has_opacity(&self) -> bool {
		self.animations.iter().any(|item| !item.table.opacity_sizes.is_empty())
	}
}

/// Decode a container file into its texture-animated objects.
///
/// Never fails: file-level problems land in `rejected`, per-object problems in `skipped`.
pub fn decode_container(bytes: &[u8]) -> ContainerScan {
	let reader = ByteReader::new(bytes);
	let header = match ContainerHeader::parse(reader) {
		Ok(header) => header,
		Err(err) => {
			debug!(error = %err, "container rejected");
			return ContainerScan {
				rejected: Some(err),
				..ContainerScan::default()
			};
		}
	};

	let shape = header.shape();
	let (entries, directory_truncated) = read_directory(reader, header);
	if directory_truncated {
		debug!(read = entries.len(), declared = header.object_count, "container directory truncated");
	}

	let mut scan = ContainerScan {
		header: Some(header),
		directory_truncated,
		..ContainerScan::default()
	};

	for entry in entries.into_iter().filter(|item| item.kind == ObjectKind::Geometry) {
		scan.geometry_objects += 1;
		match decode_entry(reader, &entry, shape) {
			Ok(GeometryAnimation::Table(table)) if table.has_texture_channels() => {
				scan.animations.push(ObjectAnimation { index: entry.index, table });
				continue;
			}
			Ok(_) => {}
			Err(error) => {
				debug!(object = entry.index, error = %error, "geometry object skipped");
				scan.skipped.push(ObjectSkip { index: entry.index, error });
			}
		}
		if leads_with_bone_or_material(reader, &entry) {
			scan.bone_material_only += 1;
		}
	}

	scan
}

fn leads_with_bone_or_material(reader: ByteReader<'_>, entry: &DirectoryEntry) -> bool {
	matches!(
		read_bone_material_sizes(reader, entry.byte_offset as usize),
		Ok(Some((bone, material))) if bone > 0 || material > 0
	)
}

fn decode_entry(reader: ByteReader<'_>, entry: &DirectoryEntry, shape: HeaderShape) -> DecodeResult<GeometryAnimation> {
	if !entry.region_fits(reader.len()) {
		return Err(DecodeError::TruncatedData {
			at: entry.byte_offset as usize,
			need: entry.declared_size as usize,
			rem: reader.len().saturating_sub(entry.byte_offset as usize),
		});
	}
	decode_geometry_animation(reader, entry.byte_offset as usize, shape)
}

#[cfg(test)]
mod tests;
