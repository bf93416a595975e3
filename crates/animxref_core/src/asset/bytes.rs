use crate::asset::DecodeError;
use crate::asset::error::DecodeResult;

/// Offset-addressed little-endian reader over an immutable byte slice.
///
/// Reads never advance any state; each one names its absolute offset and is checked against the buffer length.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
	bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
	/// Wrap a byte slice.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes }
	}

	/// Total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return `true` for an empty buffer.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return `true` when `len` bytes starting at `offset` lie inside the buffer.
	pub fn fits(&self, offset: usize, len: usize) -> bool {
		offset.checked_add(len).is_some_and(|end| end <= self.bytes.len())
	}

	/// Borrow exactly `len` bytes at `offset`.
	pub fn read_bytes(&self, offset: usize, len: usize) -> DecodeResult<&'a [u8]> {
		if !self.fits(offset, len) {
			return Err(DecodeError::TruncatedData {
				at: offset,
				need: len,
				rem: self.bytes.len().saturating_sub(offset),
			});
		}
		Ok(&self.bytes[offset..offset + len])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&self, offset: usize) -> DecodeResult<u16> {
		Ok(u16::from_le_bytes(self.read_array(offset)?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&self, offset: usize) -> DecodeResult<u32> {
		Ok(u32::from_le_bytes(self.read_array(offset)?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&self, offset: usize) -> DecodeResult<i32> {
		Ok(i32::from_le_bytes(self.read_array(offset)?))
	}

	fn read_array<const N: usize>(&self, offset: usize) -> DecodeResult<[u8; N]> {
		let raw = self.read_bytes(offset, N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}
}
