use std::collections::BTreeSet;

use tracing::debug;

use crate::asset::error::DecodeResult;
use crate::asset::{ByteReader, DecodeError};

/// The only map file version this decoder recognizes.
pub const MAP_VERSION: i32 = 600;

const HEADER_SIZE: usize = 44;
const INDEX_ENTRY_SIZE: usize = 8;
const PLACEMENT_STRIDE: usize = 20;
const KIND_SHIFT: u16 = 14;
const ID_MASK: u16 = 0x3FFF;

/// Split a packed placement field into `(kind bits, object id)`.
///
/// The top two bits carry the kind and the low fourteen bits the id.
pub fn split_packed_id(raw: u16) -> (u8, u16) {
	((raw >> KIND_SHIFT) as u8, raw & ID_MASK)
}

/// Placement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementKind {
	/// Static or animated scene model.
	Model,
	/// Scene effect.
	Effect,
}

impl PlacementKind {
	/// Map the two kind bits; values above 1 are not placements this decoder understands.
	pub fn from_bits(bits: u8) -> Option<Self> {
		match bits {
			0 => Some(Self::Model),
			1 => Some(Self::Effect),
			_ => None,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Model => "model",
			Self::Effect => "effect",
		}
	}
}

/// One distinct `(kind, id)` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlacementEntry {
	/// Placement category.
	pub kind: PlacementKind,
	/// Catalog object id, never zero.
	pub object_id: u32,
}

impl PlacementEntry {
	/// Decode a packed field, dropping id zero and unknown kinds.
	pub fn from_packed(raw: u16) -> Option<Self> {
		let (bits, id) = split_packed_id(raw);
		if id == 0 {
			return None;
		}
		Some(Self {
			kind: PlacementKind::from_bits(bits)?,
			object_id: u32::from(id),
		})
	}
}

/// Fixed 44-byte map header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
	/// Format version, always [`MAP_VERSION`] once parsed.
	pub version: i32,
	/// Section grid columns.
	pub columns: i32,
	/// Section grid rows.
	pub rows: i32,
	/// Section width in map tiles.
	pub section_width: i32,
	/// Section height in map tiles.
	pub section_height: i32,
	/// Total placement count stated by the header.
	pub declared_placements: i32,
}

impl MapHeader {
	/// Parse the header and validate the version marker.
	pub fn parse(reader: ByteReader<'_>) -> DecodeResult<Self> {
		reader.read_bytes(0, HEADER_SIZE)?;
		let version = reader.read_i32_le(16)?;
		if version != MAP_VERSION {
			return Err(DecodeError::UnsupportedVersion {
				version: i64::from(version),
			});
		}

		Ok(Self {
			version,
			columns: reader.read_i32_le(24)?,
			rows: reader.read_i32_le(28)?,
			section_width: reader.read_i32_le(32)?,
			section_height: reader.read_i32_le(36)?,
			declared_placements: reader.read_i32_le(40)?,
		})
	}

	/// Number of sections in the grid: the signed product of columns and rows, zero when not positive.
	pub fn section_count(self) -> DecodeResult<usize> {
		let count = i64::from(self.columns) * i64::from(self.rows);
		if count <= 0 {
			return Ok(0);
		}
		usize::try_from(count).map_err(|_| DecodeError::ImplausibleCount {
			count: count.unsigned_abs(),
			max: usize::MAX as u64,
		})
	}
}

/// Result of scanning one map file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapScan {
	/// Map identity, usually the file stem.
	pub name: Box<str>,
	/// Header, when it passed validation.
	pub header: Option<MapHeader>,
	/// File-level rejection; the placement set is empty when set.
	pub rejected: Option<DecodeError>,
	/// Distinct placements across all sections.
	pub placements: BTreeSet<PlacementEntry>,
	/// Sections with a positive offset and count.
	pub populated_sections: usize,
	/// Sections whose slots ran past the end of the file.
	pub truncated_sections: usize,
	/// Placement slots read, duplicates and filtered slots included.
	pub slots_read: usize,
}

impl MapScan {
	/// Distinct ids placed with the given kind.
	pub fn ids_of_kind(&self, kind: PlacementKind) -> BTreeSet<u32> {
		self.placements.iter().filter(|item| item.kind == kind).map(|item| item.object_id).collect()
	}
}

/// Decode a map file's section index and placement slots.
///
/// Never fails: file-level problems land in `rejected`.
pub fn decode_map(name: &str, bytes: &[u8]) -> MapScan {
	let mut scan = MapScan {
		name: name.into(),
		..MapScan::default()
	};

	match scan_sections(ByteReader::new(bytes), &mut scan) {
		Ok(header) => scan.header = Some(header),
		Err(err) => {
			debug!(map = name, error = %err, "map rejected");
			scan.placements.clear();
			scan.rejected = Some(err);
		}
	}
	scan
}

fn scan_sections(reader: ByteReader<'_>, scan: &mut MapScan) -> DecodeResult<MapHeader> {
	let header = MapHeader::parse(reader)?;
	let section_count = header.section_count()?;
	let index_len = section_count.checked_mul(INDEX_ENTRY_SIZE).ok_or(DecodeError::ImplausibleCount {
		count: section_count as u64,
		max: (usize::MAX / INDEX_ENTRY_SIZE) as u64,
	})?;
	let index = ByteReader::new(reader.read_bytes(HEADER_SIZE, index_len)?);

	for section in 0..section_count {
		let offset = index.read_i32_le(section * INDEX_ENTRY_SIZE)?;
		let count = index.read_i32_le(section * INDEX_ENTRY_SIZE + 4)?;
		if offset <= 0 || count <= 0 {
			continue;
		}
		scan.populated_sections += 1;

		for slot in 0..count as usize {
			let at = offset as usize + slot * PLACEMENT_STRIDE;
			if !reader.fits(at, PLACEMENT_STRIDE) {
				debug!(map = %scan.name, section, slot, "placement slots run past end of file");
				scan.truncated_sections += 1;
				break;
			}
			scan.slots_read += 1;
			if let Some(entry) = PlacementEntry::from_packed(reader.read_u16_le(at)?) {
				scan.placements.insert(entry);
			}
		}
	}

	Ok(header)
}
