#![allow(missing_docs)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use animxref::asset::{DirSource, run_survey};
use animxref_testkit::{AnimSpec, CatalogBuilder, ContainerBuilder, GeometrySpec, MapBuilder};

fn write(path: &Path, bytes: &[u8]) {
	fs::create_dir_all(path.parent().expect("parent dir")).expect("mkdir");
	fs::write(path, bytes).expect("write fixture");
}

#[test]
fn directory_survey_reports_animated_buildings_per_map() {
	let root = tempfile::tempdir().expect("tempdir");
	let models = root.path().join("model").join("scene");
	let maps_a = root.path().join("client").join("map");
	let maps_b = root.path().join("map");
	let catalog = root.path().join("scripts").join("table").join("sceneobjinfo.bin");

	write(
		&models.join("TowerA.lmo"),
		&ContainerBuilder::new(0x1005)
			.other(2, 40)
			.geometry(GeometrySpec::animated(AnimSpec::default().uv(0, 0, 128)).with_blocks(64, 256, 16))
			.build(),
	);
	write(
		&models.join("flag.lmo"),
		&ContainerBuilder::new(0x1004)
			.geometry(GeometrySpec::animated(AnimSpec::default().image(2, 1, 48).bone(16)))
			.build(),
	);
	write(&models.join("legacy.lmo"), &ContainerBuilder::new(0).object_count(2).build());
	write(
		&catalog,
		&CatalogBuilder::new().record(42, "TowerA.lmo").record(43, "flag.lmo").record(44, "plain.lmo").build(),
	);
	write(&maps_a.join("harbor.obj"), &MapBuilder::new(2, 1).place_model(0, 42).place_model(1, 44).build());
	write(&maps_b.join("garner.obj"), &MapBuilder::new(1, 1).place_model(0, 43).place_effect(0, 42).build());
	write(&maps_b.join("empty.obj"), &MapBuilder::new(1, 1).place_model(0, 44).build());

	let source = DirSource::new(&models, vec![maps_a, maps_b], &catalog);
	let report = run_survey(&source).expect("survey runs");

	assert_eq!(report.containers.scanned, 3);
	assert_eq!(report.containers.legacy, 1);
	assert_eq!(report.xref.animated_ids, BTreeSet::from([42, 43]));

	let per_map: BTreeMap<&str, &BTreeSet<u32>> = report.xref.maps.iter().map(|item| (item.name.as_ref(), &item.animated_ids)).collect();
	assert_eq!(per_map.len(), 2);
	assert_eq!(per_map["harbor"], &BTreeSet::from([42]));
	assert_eq!(per_map["garner"], &BTreeSet::from([43]));

	assert_eq!(report.xref.usage.uv, BTreeMap::from([((0, 0), 1)]));
	assert_eq!(report.xref.usage.image, BTreeMap::from([((2, 1), 1)]));
}
