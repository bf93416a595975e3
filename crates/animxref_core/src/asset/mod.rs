mod bytes;
mod catalog;
mod container;
mod error;
mod geometry;
mod placement;
mod shape;
mod source;
mod survey;
mod xref;

/// Bounds-checked little-endian reader.
pub use bytes::ByteReader;
/// Object catalog decode output and entry points.
pub use catalog::{Catalog, CatalogRecord, CatalogStats, decode_catalog};
/// Container header, directory, and scan output.
pub use container::{
	ContainerHeader, ContainerScan, DirectoryEntry, MAX_OBJECT_COUNT, ObjectAnimation, ObjectKind, ObjectSkip, decode_container, read_directory,
};
/// Error and result aliases.
pub use error::{AssetError, DecodeError, Result};
/// Geometry preamble and animation size table decoding.
pub use geometry::{
	AnimationSizeTable, GeometryAnimation, GeometrySizes, OpacitySize, StageSize, decode_geometry_animation,
	read_bone_material_sizes,
};
/// Map placement decode output and packed-id helpers.
pub use placement::{MAP_VERSION, MapHeader, MapScan, PlacementEntry, PlacementKind, decode_map, split_packed_id};
/// Version-dependent animation header layout.
pub use shape::{HeaderShape, shape_for};
/// Source file enumeration seam and implementations.
pub use source::{AssetSource, DirSource, MemorySource, SourceFile};
/// Whole-corpus survey driver and counters.
pub use survey::{ContainerCounts, MapCounts, SurveyReport, run_survey};
/// Cross-reference join types and entry points.
pub use xref::{AnimatedAsset, ChannelUsage, ContainerRef, MapAnimation, XrefReport, cross_reference};
