use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::asset::ByteReader;

const EXISTS_OFFSET: usize = 0;
const NAME_OFFSET: usize = 8;
const NAME_LEN: usize = 72;
const ID_OFFSET: usize = 100;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
	/// Object id referenced by map placements.
	pub object_id: u32,
	/// Lowercased, trimmed asset file name.
	pub asset_name: Box<str>,
}

/// Counters collected while decoding a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
	/// Declared record width.
	pub record_width: u32,
	/// Complete records present in the file.
	pub records: usize,
	/// Records skipped because `exists` was zero.
	pub not_existing: usize,
	/// Records skipped because the name decoded empty.
	pub empty_names: usize,
	/// Records too narrow to hold the id field.
	pub too_narrow: usize,
	/// Records that replaced an earlier record with the same id.
	pub overwritten: usize,
}

/// Decoded object catalog keyed by object id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
	by_id: BTreeMap<u32, Box<str>>,
	/// Decode counters.
	pub stats: CatalogStats,
}

impl Catalog {
	/// Look up the asset name for an object id.
	pub fn get(&self, object_id: u32) -> Option<&str> {
		self.by_id.get(&object_id).map(AsRef::as_ref)
	}

	/// Number of distinct ids.
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	/// Return `true` when no record survived decoding.
	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Iterate records in ascending id order.
	pub fn records(&self) -> impl Iterator<Item = CatalogRecord> + '_ {
		self.by_id.iter().map(|(object_id, asset_name)| CatalogRecord {
			object_id: *object_id,
			asset_name: asset_name.clone(),
		})
	}

	/// Invert to `asset_name -> object ids`; one asset can back several ids.
	pub fn ids_by_asset(&self) -> BTreeMap<&str, BTreeSet<u32>> {
		let mut out: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
		for (object_id, asset_name) in &self.by_id {
			out.entry(asset_name.as_ref()).or_default().insert(*object_id);
		}
		out
	}

	fn insert(&mut self, record: CatalogRecord) {
		if self.by_id.insert(record.object_id, record.asset_name).is_some() {
			self.stats.overwritten += 1;
		}
	}
}

impl FromIterator<CatalogRecord> for Catalog {
	fn from_iter<I: IntoIterator<Item = CatalogRecord>>(iter: I) -> Self {
		let mut out = Self::default();
		for record in iter {
			out.insert(record);
		}
		out
	}
}

/// Decode a fixed-width catalog table.
///
/// A zero width or a buffer shorter than the width field yields an empty catalog. Later duplicates win.
pub fn decode_catalog(bytes: &[u8]) -> Catalog {
	let mut out = Catalog::default();
	let Ok(record_width) = ByteReader::new(bytes).read_u32_le(0) else {
		return out;
	};
	out.stats.record_width = record_width;
	if record_width == 0 {
		return out;
	}

	let body = &bytes[4..];
	for chunk in body.chunks_exact(record_width as usize) {
		out.stats.records += 1;
		let record = ByteReader::new(chunk);

		let Ok(exists) = record.read_i32_le(EXISTS_OFFSET) else {
			out.stats.too_narrow += 1;
			continue;
		};
		if exists == 0 {
			out.stats.not_existing += 1;
			continue;
		}

		let Ok(object_id) = record.read_u32_le(ID_OFFSET) else {
			out.stats.too_narrow += 1;
			continue;
		};

		let asset_name = decode_name(chunk);
		if asset_name.is_empty() {
			out.stats.empty_names += 1;
			continue;
		}

		out.insert(CatalogRecord {
			object_id,
			asset_name: asset_name.into_boxed_str(),
		});
	}

	debug!(records = out.stats.records, kept = out.len(), "catalog decoded");
	out
}

fn decode_name(record: &[u8]) -> String {
	let start = NAME_OFFSET.min(record.len());
	let end = (NAME_OFFSET + NAME_LEN).min(record.len());
	let field = &record[start..end];
	let field = match field.iter().position(|byte| *byte == 0) {
		Some(nul) => &field[..nul],
		None => field,
	};
	String::from_utf8_lossy(field).trim().to_lowercase()
}
