//! Public library API for surveying animated scene models across game maps.

/// Container, catalog, and map decoders plus the cross-reference engine.
pub mod asset;
