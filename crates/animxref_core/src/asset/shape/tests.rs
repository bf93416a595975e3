use crate::asset::{HeaderShape, shape_for};

#[test]
fn layout_widths_match_format() {
	assert_eq!(HeaderShape::BASE.entry_count, 130);
	assert_eq!(HeaderShape::WITH_OPACITY.entry_count, 146);
	assert_eq!(HeaderShape::BASE.table_bytes(), 520);
	assert_eq!(HeaderShape::WITH_OPACITY.table_bytes(), 584);
}

#[test]
fn threshold_selects_opacity_layout() {
	for version in [0x1000, 0x1003, 0x1004] {
		let shape = shape_for(version);
		assert_eq!(shape.entry_count, 130, "version {version:#x}");
		assert!(!shape.has_opacity);
		assert_eq!(shape.opacity_subsets(), 0);
	}

	for version in [0x1005, 0x1006, 0x2000] {
		let shape = shape_for(version);
		assert_eq!(shape.entry_count, 146, "version {version:#x}");
		assert!(shape.has_opacity);
		assert_eq!(shape.opacity_subsets(), 16);
	}
}
