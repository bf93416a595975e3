use animxref_testkit::{AnimSpec, ContainerBuilder, GeometrySpec};

use crate::asset::{ByteReader, DecodeError, GeometryAnimation, GeometrySizes, HeaderShape, OpacitySize, StageSize, decode_geometry_animation, read_bone_material_sizes, shape_for};

// A one-object container places its object right after the 20-byte header + directory.
const FIRST_OBJECT: usize = 8 + 12;

fn decode_single(version: u32, spec: GeometrySpec) -> Result<GeometryAnimation, DecodeError> {
	let bytes = ContainerBuilder::new(version).geometry(spec).build();
	decode_geometry_animation(ByteReader::new(&bytes), FIRST_OBJECT, shape_for(version))
}

fn table(result: Result<GeometryAnimation, DecodeError>) -> crate::asset::AnimationSizeTable {
	match result.expect("geometry decodes") {
		GeometryAnimation::Table(table) => table,
		GeometryAnimation::Absent => panic!("expected animation table"),
	}
}

#[test]
fn reproduces_known_channel_sizes() {
	let anim = AnimSpec::default()
		.bone(40)
		.material(12)
		.opacity(3, 16)
		.uv(0, 0, 128)
		.uv(2, 1, 64)
		.image(15, 3, 8);
	let decoded = table(decode_single(0x1005, GeometrySpec::animated(anim).with_blocks(32, 96, 8)));

	assert_eq!(decoded.bone_size, 40);
	assert_eq!(decoded.material_anim_size, 12);
	assert_eq!(decoded.opacity_sizes, vec![OpacitySize { subset: 3, size: 16 }]);
	assert_eq!(
		decoded.uv_sizes,
		vec![StageSize { subset: 0, stage: 0, size: 128 }, StageSize { subset: 2, stage: 1, size: 64 }]
	);
	assert_eq!(decoded.image_sizes, vec![StageSize { subset: 15, stage: 3, size: 8 }]);
	assert_eq!(decoded.computed_size(HeaderShape::WITH_OPACITY), 584 + 40 + 12 + 16 + 128 + 64 + 8);
	assert_eq!(decoded.channel_labels(), vec!["uv", "image", "opacity"]);
}

#[test]
fn declared_size_off_by_one_is_rejected() {
	let spec = GeometrySpec::animated(AnimSpec::default().uv(0, 0, 128)).with_size_delta(1);
	let err = decode_single(0x1005, spec).expect_err("size mismatch rejects object");
	assert_eq!(
		err,
		DecodeError::SizeMismatch {
			computed: 584 + 128,
			declared: 584 + 128 + 1,
		}
	);
}

#[test]
fn pre_opacity_versions_use_narrow_table() {
	let decoded = table(decode_single(0x1004, GeometrySpec::animated(AnimSpec::default().image(1, 2, 32))));
	assert!(decoded.opacity_sizes.is_empty());
	assert_eq!(decoded.image_sizes, vec![StageSize { subset: 1, stage: 2, size: 32 }]);
	assert_eq!(decoded.computed_size(HeaderShape::BASE), 520 + 32);
}

#[test]
fn decoding_with_wrong_shape_fails_size_check() {
	let bytes = ContainerBuilder::new(0x1004)
		.geometry(GeometrySpec::animated(AnimSpec::default().uv(0, 0, 128)))
		.build();
	let err = decode_geometry_animation(ByteReader::new(&bytes), FIRST_OBJECT, HeaderShape::WITH_OPACITY).expect_err("wide shape misreads");
	assert!(matches!(err, DecodeError::SizeMismatch { .. } | DecodeError::TruncatedData { .. }));
}

#[test]
fn zero_animation_size_is_absent() {
	let result = decode_single(0x1005, GeometrySpec::static_mesh().with_blocks(10, 20, 30));
	assert_eq!(result, Ok(GeometryAnimation::Absent));
}

#[test]
fn bone_only_table_is_valid_but_has_no_texture_channels() {
	let decoded = table(decode_single(0x1005, GeometrySpec::animated(AnimSpec::default().bone(200))));
	assert!(!decoded.has_texture_channels());
	assert!(decoded.has_bone_or_material());
	assert!(decoded.channel_labels().is_empty());
}

#[test]
fn preamble_past_end_is_truncated() {
	let bytes = vec![0_u8; 100];
	let err = decode_geometry_animation(ByteReader::new(&bytes), 0, HeaderShape::BASE).expect_err("short preamble");
	assert_eq!(err, DecodeError::TruncatedData { at: 0, need: 116, rem: 100 });
}

#[test]
fn size_table_past_end_is_truncated() {
	let mut bytes = ContainerBuilder::new(0x1005)
		.geometry(GeometrySpec::animated(AnimSpec::default().uv(0, 0, 4)))
		.build();
	bytes.truncate(FIRST_OBJECT + 116 + 100);
	let err = decode_geometry_animation(ByteReader::new(&bytes), FIRST_OBJECT, HeaderShape::WITH_OPACITY).expect_err("short table");
	assert!(matches!(err, DecodeError::TruncatedData { need: 584, .. }));
}

#[test]
fn block_sizes_overflowing_address_space_are_truncated() {
	let mut bytes = vec![0_u8; 116];
	bytes[100..104].copy_from_slice(&u32::MAX.to_le_bytes());
	bytes[104..108].copy_from_slice(&u32::MAX.to_le_bytes());
	bytes[112..116].copy_from_slice(&600_u32.to_le_bytes());

	let sizes = GeometrySizes::parse(ByteReader::new(&bytes), 0).expect("preamble parses");
	assert_eq!(sizes.animation, 600);
	let err = decode_geometry_animation(ByteReader::new(&bytes), 0, HeaderShape::BASE).expect_err("region outside file");
	assert!(matches!(err, DecodeError::TruncatedData { .. }));
}

#[test]
fn leading_bone_material_sizes_need_only_eight_bytes() {
	let mut bytes = ContainerBuilder::new(0x1005)
		.geometry(GeometrySpec::animated(AnimSpec::default().bone(64).material(12).uv(0, 0, 8)))
		.build();
	bytes.truncate(FIRST_OBJECT + 116 + 8);
	let reader = ByteReader::new(&bytes);

	assert!(decode_geometry_animation(reader, FIRST_OBJECT, HeaderShape::WITH_OPACITY).is_err());
	assert_eq!(read_bone_material_sizes(reader, FIRST_OBJECT), Ok(Some((64, 12))));

	bytes.truncate(FIRST_OBJECT + 116 + 4);
	assert!(matches!(
		read_bone_material_sizes(ByteReader::new(&bytes), FIRST_OBJECT),
		Err(DecodeError::TruncatedData { .. })
	));
}

#[test]
fn leading_sizes_absent_without_animation_block() {
	let bytes = ContainerBuilder::new(0x1005).geometry(GeometrySpec::static_mesh()).build();
	assert_eq!(read_bone_material_sizes(ByteReader::new(&bytes), FIRST_OBJECT), Ok(None));
}
