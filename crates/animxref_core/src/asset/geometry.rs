use crate::asset::error::DecodeResult;
use crate::asset::shape::{STAGE_COUNT, SUBSET_COUNT};
use crate::asset::{ByteReader, DecodeError, HeaderShape};

/// Fixed width of the geometry object preamble.
pub const PREAMBLE_SIZE: usize = 116;
/// Offset of the block-size quad inside the preamble.
pub const SIZE_QUAD_OFFSET: usize = 100;

/// Sub-block sizes stored in a geometry object preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySizes {
	/// Material block byte size.
	pub material: u32,
	/// Mesh block byte size.
	pub mesh: u32,
	/// Helper block byte size.
	pub helper: u32,
	/// Animation block byte size, size table included. Zero means no animation.
	pub animation: u32,
}

impl GeometrySizes {
	/// Read the size quad of the object starting at `object_offset`.
	pub fn parse(reader: ByteReader<'_>, object_offset: usize) -> DecodeResult<Self> {
		reader.read_bytes(object_offset, PREAMBLE_SIZE)?;
		let quad = object_offset + SIZE_QUAD_OFFSET;
		Ok(Self {
			material: reader.read_u32_le(quad)?,
			mesh: reader.read_u32_le(quad + 4)?,
			helper: reader.read_u32_le(quad + 8)?,
			animation: reader.read_u32_le(quad + 12)?,
		})
	}

	/// Absolute offset of the animation block, or `None` on address overflow.
	pub fn animation_offset(self, object_offset: usize) -> Option<usize> {
		[self.material, self.mesh, self.helper]
			.into_iter()
			.try_fold(object_offset.checked_add(PREAMBLE_SIZE)?, |acc, size| acc.checked_add(size as usize))
	}
}

/// One nonzero opacity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OpacitySize {
	/// Material subset index.
	pub subset: u8,
	/// Byte size of the channel payload.
	pub size: u32,
}

/// One nonzero texture-stage entry (uv or image channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StageSize {
	/// Material subset index.
	pub subset: u8,
	/// Texture stage index.
	pub stage: u8,
	/// Byte size of the channel payload.
	pub size: u32,
}

/// Decoded per-channel animation size table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationSizeTable {
	/// Bone animation payload size.
	pub bone_size: u32,
	/// Material animation payload size.
	pub material_anim_size: u32,
	/// Nonzero opacity sizes, ascending subset order.
	pub opacity_sizes: Vec<OpacitySize>,
	/// Nonzero texture-coordinate sizes, subset-major order.
	pub uv_sizes: Vec<StageSize>,
	/// Nonzero texture-image sizes, subset-major order.
	pub image_sizes: Vec<StageSize>,
}

impl AnimationSizeTable {
	/// Return `true` when any opacity, uv, or image entry is present.
	pub fn has_texture_channels(&self) -> bool {
		!self.opacity_sizes.is_empty() || !self.uv_sizes.is_empty() || !self.image_sizes.is_empty()
	}

	/// Return `true` when bone or material animation is present.
	pub fn has_bone_or_material(&self) -> bool {
		self.bone_size > 0 || self.material_anim_size > 0
	}

	/// Header table width plus every channel size.
	pub fn computed_size(&self, shape: HeaderShape) -> u64 {
		let opacity: u64 = self.opacity_sizes.iter().map(|item| u64::from(item.size)).sum();
		let uv: u64 = self.uv_sizes.iter().map(|item| u64::from(item.size)).sum();
		let image: u64 = self.image_sizes.iter().map(|item| u64::from(item.size)).sum();
		shape.table_bytes() as u64 + u64::from(self.bone_size) + u64::from(self.material_anim_size) + opacity + uv + image
	}

	/// Labels of the texture channels present, in fixed `uv`, `image`, `opacity` order.
	pub fn channel_labels(&self) -> Vec<&'static str> {
		let mut out = Vec::new();
		if !self.uv_sizes.is_empty() {
			out.push("uv");
		}
		if !self.image_sizes.is_empty() {
			out.push("image");
		}
		if !self.opacity_sizes.is_empty() {
			out.push("opacity");
		}
		out
	}
}

/// Outcome of decoding one geometry object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryAnimation {
	/// The preamble declares no animation block.
	Absent,
	/// A size table that passed the exact-size check.
	Table(AnimationSizeTable),
}

/// Decode the animation size table of the geometry object at `object_offset`.
///
/// Fails with `TruncatedData` when the preamble or size table does not fit and with `SizeMismatch` when the
/// table does not add up to the declared animation block size.
pub fn decode_geometry_animation(reader: ByteReader<'_>, object_offset: usize, shape: HeaderShape) -> DecodeResult<GeometryAnimation> {
	let sizes = GeometrySizes::parse(reader, object_offset)?;
	if sizes.animation == 0 {
		return Ok(GeometryAnimation::Absent);
	}

	let Some(start) = sizes.animation_offset(object_offset) else {
		return Err(DecodeError::TruncatedData {
			at: object_offset,
			need: shape.table_bytes(),
			rem: 0,
		});
	};
	let table = ByteReader::new(reader.read_bytes(start, shape.table_bytes())?);

	let mut out = AnimationSizeTable {
		bone_size: table.read_u32_le(0)?,
		material_anim_size: table.read_u32_le(4)?,
		..AnimationSizeTable::default()
	};
	let mut at = 8;

	for subset in 0..shape.opacity_subsets() {
		let size = table.read_u32_le(at + subset * 4)?;
		if size > 0 {
			out.opacity_sizes.push(OpacitySize { subset: subset as u8, size });
		}
	}
	at += shape.opacity_subsets() * 4;

	out.uv_sizes = read_stage_grid(table, at)?;
	at += SUBSET_COUNT * STAGE_COUNT * 4;
	out.image_sizes = read_stage_grid(table, at)?;

	let computed = out.computed_size(shape);
	if computed != u64::from(sizes.animation) {
		return Err(DecodeError::SizeMismatch {
			computed,
			declared: u64::from(sizes.animation),
		});
	}

	Ok(GeometryAnimation::Table(out))
}

/// Read only the leading `(bone_size, material_anim_size)` words of the animation block.
///
/// Needs the preamble and the first eight bytes of the block; the rest of the size table is neither read nor
/// validated. `None` when the preamble declares no animation block.
pub fn read_bone_material_sizes(reader: ByteReader<'_>, object_offset: usize) -> DecodeResult<Option<(u32, u32)>> {
	let sizes = GeometrySizes::parse(reader, object_offset)?;
	if sizes.animation == 0 {
		return Ok(None);
	}
	let Some(start) = sizes.animation_offset(object_offset) else {
		return Err(DecodeError::TruncatedData {
			at: object_offset,
			need: 8,
			rem: 0,
		});
	};
	Ok(Some((reader.read_u32_le(start)?, reader.read_u32_le(start.saturating_add(4))?)))
}

fn read_stage_grid(table: ByteReader<'_>, base: usize) -> DecodeResult<Vec<StageSize>> {
	let mut out = Vec::new();
	for subset in 0..SUBSET_COUNT {
		for stage in 0..STAGE_COUNT {
			let size = table.read_u32_le(base + (subset * STAGE_COUNT + stage) * 4)?;
			if size > 0 {
				out.push(StageSize {
					subset: subset as u8,
					stage: stage as u8,
					size,
				});
			}
		}
	}
	Ok(out)
}

#[cfg(test)]
mod tests;
