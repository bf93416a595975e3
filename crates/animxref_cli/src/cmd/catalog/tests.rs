use animxref_testkit::CatalogBuilder;

use crate::cmd::test_support::{run_animxref, run_animxref_json, write_fixture};

fn fixture_catalog() -> Vec<u8> {
	CatalogBuilder::new()
		.record(7, "Tower.LMO")
		.record(3, "gate.lmo")
		.missing(9, "ghost.lmo")
		.record(12, "")
		.record(5, "tower_b.lmo")
		.record(3, "gate_v2.lmo")
		.build()
}

#[test]
fn catalog_json_reports_records_and_stats() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = write_fixture(dir.path(), "objinfo.bin", &fixture_catalog());

	let json = run_animxref_json(&["catalog", path.to_str().expect("utf8 path"), "--json"]);

	assert_eq!(json["stats"]["record_width"], 120);
	assert_eq!(json["stats"]["records"], 6);
	assert_eq!(json["stats"]["not_existing"], 1);
	assert_eq!(json["stats"]["empty_names"], 1);
	assert_eq!(json["stats"]["overwritten"], 1);
	assert_eq!(json["entries"], 3);

	let ids: Vec<u64> = json["records"]
		.as_array()
		.expect("records array")
		.iter()
		.filter_map(|record| record["object_id"].as_u64())
		.collect();
	assert_eq!(ids, vec![3, 5, 7]);
	assert_eq!(json["records"][0]["asset_name"], "gate_v2.lmo");
	assert_eq!(json["records"][2]["asset_name"], "tower.lmo");
}

#[test]
fn catalog_filter_and_limit_apply_in_id_order() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = write_fixture(dir.path(), "objinfo.bin", &fixture_catalog());
	let path = path.to_str().expect("utf8 path");

	let json = run_animxref_json(&["catalog", path, "--filter", "TOWER", "--limit", "1", "--json"]);
	assert_eq!(json["shown"], 1);
	assert_eq!(json["records"][0]["object_id"], 5);

	let output = run_animxref(&["catalog", path, "--filter", "gate"]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("gate_v2.lmo"));
	assert!(!stdout.contains("tower.lmo"));
}
