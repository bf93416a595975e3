use std::path::PathBuf;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssetError>;

pub(crate) type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Recoverable decode failures.
///
/// Every variant is local to one unit (object, section, or file). Callers drop the unit and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// A read would exceed the buffer.
	#[error("truncated data at offset {at}, need {need} bytes, remaining {rem}")]
	TruncatedData {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes available from `at`.
		rem: usize,
	},
	/// Legacy or unrecognized format marker.
	#[error("unsupported format version {version}")]
	UnsupportedVersion {
		/// Raw version field.
		version: i64,
	},
	/// Object or record count exceeds sanity bounds.
	#[error("implausible count {count} (max {max})")]
	ImplausibleCount {
		/// Declared count.
		count: u64,
		/// Accepted ceiling.
		max: u64,
	},
	/// Computed total does not match the declared block size.
	#[error("size mismatch: computed {computed}, declared {declared}")]
	SizeMismatch {
		/// Sum of header table and channel sizes.
		computed: u64,
		/// Size stated by the object preamble.
		declared: u64,
	},
}

impl DecodeError {
	/// Stable lowercase label used in reports.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::TruncatedData { .. } => "truncated_data",
			Self::UnsupportedVersion { .. } => "unsupported_version",
			Self::ImplausibleCount { .. } => "implausible_count",
			Self::SizeMismatch { .. } => "size_mismatch",
		}
	}
}

/// Errors that stop a command: IO, enumeration, and configuration.
#[derive(Debug, Error)]
pub enum AssetError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Directory traversal failure.
	#[error("walk: {0}")]
	Walk(#[from] walkdir::Error),
	/// Decode failure surfaced to a caller that asked for strict handling.
	#[error("decode: {0}")]
	Decode(#[from] DecodeError),
	/// Configuration file could not be parsed.
	#[error("invalid config {path}: {reason}")]
	InvalidConfig {
		/// Config file path.
		path: PathBuf,
		/// Parser message.
		reason: String,
	},
	/// Required setting absent from both config file and flags.
	#[error("missing setting: {name}")]
	MissingSetting {
		/// Setting name as spelled in the config file.
		name: &'static str,
	},
	/// CLI placement kind argument was invalid.
	#[error("invalid placement kind: {value} (expected model or effect)")]
	InvalidPlacementKind {
		/// User-provided value.
		value: String,
	},
}
