use animxref_testkit::{AnimSpec, ContainerBuilder, GeometrySpec};

use crate::asset::{
	ByteReader, ContainerHeader, DecodeError, DirectoryEntry, ObjectKind, StageSize, decode_container, read_directory,
};

fn uv_object() -> GeometrySpec {
	GeometrySpec::animated(AnimSpec::default().uv(0, 0, 128))
}

#[test]
fn legacy_version_is_always_empty() {
	for count in [0, 1, 3, 600] {
		let bytes = ContainerBuilder::new(0).geometry(uv_object()).object_count(count).build();
		let scan = decode_container(&bytes);
		assert!(scan.is_legacy(), "count {count}");
		assert!(scan.header.is_none());
		assert!(scan.animations.is_empty());
		assert_eq!(scan.rejected, Some(DecodeError::UnsupportedVersion { version: 0 }));
	}
}

#[test]
fn implausible_object_count_is_empty() {
	let bytes = ContainerBuilder::new(0x1005).geometry(uv_object()).object_count(501).build();
	let scan = decode_container(&bytes);
	assert_eq!(scan.rejected, Some(DecodeError::ImplausibleCount { count: 501, max: 500 }));
	assert!(scan.animations.is_empty());
	assert!(!scan.is_legacy());
}

#[test]
fn object_count_at_cap_is_accepted() {
	let bytes = ContainerBuilder::new(0x1005).geometry(uv_object()).object_count(500).build();
	let scan = decode_container(&bytes);
	assert!(scan.rejected.is_none());
	assert_eq!(scan.animations.len(), 1);
	assert!(scan.directory_truncated);
}

#[test]
fn short_buffer_is_rejected_as_truncated() {
	let scan = decode_container(&[1, 0, 0, 0, 5]);
	assert!(matches!(scan.rejected, Some(DecodeError::TruncatedData { .. })));
	assert!(scan.animations.is_empty());
}

#[test]
fn version_threshold_boundaries() {
	for (version, opacity) in [(0x1003, false), (0x1004, false), (0x1005, true), (0x1006, true)] {
		let spec = GeometrySpec::animated(AnimSpec::default().opacity(4, 24).uv(1, 0, 16));
		let bytes = ContainerBuilder::new(version).geometry(spec).build();
		let scan = decode_container(&bytes);

		let header = scan.header.expect("header parses");
		assert_eq!(header.shape().entry_count, if opacity { 146 } else { 130 }, "version {version:#x}");
		assert_eq!(scan.animations.len(), 1, "version {version:#x}");
		assert_eq!(scan.has_opacity(), opacity, "version {version:#x}");
		assert_eq!(scan.animations[0].table.uv_sizes, vec![StageSize { subset: 1, stage: 0, size: 16 }]);
	}
}

#[test]
fn directory_cut_mid_entry_stops_silently() {
	let mut bytes = ContainerBuilder::new(0x1005).geometry(uv_object()).geometry(uv_object()).geometry(uv_object()).build();
	bytes.truncate(8 + 12 + 6);

	let header = ContainerHeader::parse(ByteReader::new(&bytes)).expect("header parses");
	let (entries, truncated) = read_directory(ByteReader::new(&bytes), header);
	assert!(truncated);
	assert_eq!(
		entries,
		vec![DirectoryEntry {
			index: 0,
			kind: ObjectKind::Geometry,
			byte_offset: 8 + 3 * 12,
			declared_size: entries[0].declared_size,
		}]
	);

	let scan = decode_container(&bytes);
	assert!(scan.rejected.is_none());
	assert!(scan.directory_truncated);
	assert_eq!(scan.geometry_objects, 1);
	assert_eq!(scan.skipped.len(), 1);
	assert!(matches!(scan.skipped[0].error, DecodeError::TruncatedData { .. }));
}

#[test]
fn non_geometry_entries_are_ignored() {
	let bytes = ContainerBuilder::new(0x1005).other(2, 64).geometry(uv_object()).other(3, 8).build();
	let scan = decode_container(&bytes);
	assert_eq!(scan.geometry_objects, 1);
	assert_eq!(scan.animations.len(), 1);
	assert_eq!(scan.animations[0].index, 1);
}

#[test]
fn bad_object_does_not_discard_siblings() {
	let bytes = ContainerBuilder::new(0x1005)
		.geometry(uv_object().with_size_delta(4))
		.geometry(GeometrySpec::static_mesh())
		.geometry(GeometrySpec::animated(AnimSpec::default().bone(64)))
		.geometry(GeometrySpec::animated(AnimSpec::default().image(0, 1, 32)).with_blocks(4, 8, 12))
		.build();
	let scan = decode_container(&bytes);

	assert_eq!(scan.geometry_objects, 4);
	assert_eq!(scan.skipped.len(), 1);
	assert_eq!(scan.skipped[0].index, 0);
	assert!(matches!(scan.skipped[0].error, DecodeError::SizeMismatch { .. }));
	assert_eq!(scan.bone_material_only, 1);
	assert_eq!(scan.animations.len(), 1);
	assert_eq!(scan.animations[0].index, 3);
	assert!(scan.has_image());
	assert!(!scan.has_uv());
}

#[test]
fn region_past_end_of_file_is_skipped() {
	let mut bytes = ContainerBuilder::new(0x1005).geometry(uv_object()).build();
	let declared = u32::from_le_bytes(bytes[16..20].try_into().expect("4 bytes"));
	bytes[16..20].copy_from_slice(&(declared + 1).to_le_bytes());

	let scan = decode_container(&bytes);
	assert!(scan.animations.is_empty());
	assert!(matches!(scan.skipped[0].error, DecodeError::TruncatedData { .. }));
}

#[test]
fn bone_data_counts_even_when_size_check_fails() {
	let bytes = ContainerBuilder::new(0x1005)
		.geometry(GeometrySpec::animated(AnimSpec::default().bone(64).uv(0, 0, 8)).with_size_delta(1))
		.build();
	let scan = decode_container(&bytes);

	assert!(scan.animations.is_empty());
	assert!(matches!(scan.skipped[0].error, DecodeError::SizeMismatch { .. }));
	assert_eq!(scan.bone_material_only, 1);
}

#[test]
fn texture_animated_object_is_not_bone_material_only() {
	let bytes = ContainerBuilder::new(0x1005)
		.geometry(GeometrySpec::animated(AnimSpec::default().bone(64).uv(0, 0, 8)))
		.build();
	let scan = decode_container(&bytes);

	assert_eq!(scan.animations.len(), 1);
	assert_eq!(scan.bone_material_only, 0);
}
