/// Container version at which the material opacity channel appears.
pub const OPACITY_VERSION: u32 = 0x1005;

/// Number of material subsets addressed by the size table.
pub const SUBSET_COUNT: usize = 16;
/// Number of texture stages per subset.
pub const STAGE_COUNT: usize = 4;

/// Animation size-table layout selected by container version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderShape {
	/// Number of `u32` entries in the size table.
	pub entry_count: usize,
	/// Whether a per-subset opacity size array precedes the texture grids.
	pub has_opacity: bool,
}

impl HeaderShape {
	/// Layout without the opacity channel (`bone + material + uv[16][4] + image[16][4]`).
	pub const BASE: Self = Self {
		entry_count: 2 + 2 * SUBSET_COUNT * STAGE_COUNT,
		has_opacity: false,
	};
	/// Layout with the opacity channel (`bone + material + opacity[16] + uv[16][4] + image[16][4]`).
	pub const WITH_OPACITY: Self = Self {
		entry_count: 2 + SUBSET_COUNT + 2 * SUBSET_COUNT * STAGE_COUNT,
		has_opacity: true,
	};

	/// Width of the size table in bytes.
	pub fn table_bytes(self) -> usize {
		self.entry_count * 4
	}

	/// Number of opacity subsets present in this layout.
	pub fn opacity_subsets(self) -> usize {
		if self.has_opacity { SUBSET_COUNT } else { 0 }
	}
}

/// Select the size-table layout for a container version.
///
/// The version threshold is the only signal; the table carries no tag of its own.
pub fn shape_for(version: u32) -> HeaderShape {
	if version >= OPACITY_VERSION {
		HeaderShape::WITH_OPACITY
	} else {
		HeaderShape::BASE
	}
}

#[cfg(test)]
mod tests;
