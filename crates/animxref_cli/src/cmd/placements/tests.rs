use animxref_testkit::MapBuilder;

use crate::cmd::test_support::{run_animxref, run_animxref_json, write_fixture};

#[test]
fn placements_json_dedupes_and_filters_by_kind() {
	let dir = tempfile::tempdir().expect("tempdir");
	let bytes = MapBuilder::new(2, 2)
		.place_model(0, 42)
		.place_model(0, 42)
		.place_effect(1, 42)
		.place_model(3, 7)
		.build();
	let path = write_fixture(dir.path(), "Harbor.obj", &bytes);
	let path = path.to_str().expect("utf8 path");

	let json = run_animxref_json(&["placements", path, "--json"]);
	assert_eq!(json["name"], "Harbor");
	assert_eq!(json["version"], 600);
	assert_eq!(json["populated_sections"], 3);
	assert_eq!(json["slots_read"], 4);
	assert_eq!(json["placements"].as_array().map(Vec::len), Some(3));

	let json = run_animxref_json(&["placements", path, "--kind", "model", "--json"]);
	let ids: Vec<u64> = json["placements"]
		.as_array()
		.expect("placements array")
		.iter()
		.filter_map(|entry| entry["object_id"].as_u64())
		.collect();
	assert_eq!(ids, vec![7, 42]);
}

#[test]
fn wrong_version_is_reported_not_fatal() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = write_fixture(dir.path(), "old.obj", &MapBuilder::new(1, 1).version(500).place_model(0, 1).build());

	let json = run_animxref_json(&["placements", path.to_str().expect("utf8 path"), "--json"]);
	assert_eq!(json["rejected_kind"], "unsupported_version");
	assert_eq!(json["placements"].as_array().map(Vec::len), Some(0));
}

#[test]
fn invalid_kind_argument_fails() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = write_fixture(dir.path(), "a.obj", &MapBuilder::new(1, 1).build());

	let output = run_animxref(&["placements", path.to_str().expect("utf8 path"), "--kind", "light"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("invalid placement kind: light"));
}
