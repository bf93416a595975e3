use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use animxref_testkit::target_dir as workspace_target_dir;

static ANIMXREF_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).expect("fixture dir created");
	}
	std::fs::write(&path, bytes).expect("fixture written");
	path
}

pub(crate) fn run_animxref(args: &[&str]) -> Output {
	Command::new(animxref_bin()).args(args).output().expect("animxref command executes")
}

pub(crate) fn run_animxref_json(args: &[&str]) -> serde_json::Value {
	let output = run_animxref(args);
	assert!(
		output.status.success(),
		"animxref command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn animxref_bin() -> &'static PathBuf {
	ANIMXREF_BIN.get_or_init(resolve_animxref_bin)
}

fn resolve_animxref_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_animxref") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "animxref.exe" } else { "animxref" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "animxref"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build animxref binary at {}", bin.display());

	bin
}
