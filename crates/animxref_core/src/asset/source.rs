use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::asset::Result;

/// One input file with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
	/// Identity used for joining and reporting.
	pub name: Box<str>,
	/// Raw file contents.
	pub bytes: Vec<u8>,
}

impl SourceFile {
	/// Pair a name with its bytes.
	pub fn new(name: impl Into<Box<str>>, bytes: Vec<u8>) -> Self {
		Self { name: name.into(), bytes }
	}
}

/// Supplies the three inputs of a survey.
pub trait AssetSource {
	/// Every container file.
	fn container_files(&self) -> Result<Vec<SourceFile>>;
	/// Every map placement file.
	fn map_files(&self) -> Result<Vec<SourceFile>>;
	/// The object catalog bytes; empty when there is no catalog.
	fn catalog(&self) -> Result<Vec<u8>>;
}

/// Directory-backed source.
///
/// Container names are lowercased file names; map names are file stems. Directories are listed one level deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirSource {
	/// Directory holding container files.
	pub container_dir: PathBuf,
	/// Directories holding map files, scanned in order.
	pub map_dirs: Vec<PathBuf>,
	/// Catalog table path.
	pub catalog_path: PathBuf,
	/// Container file extension, without the dot.
	pub container_extension: String,
	/// Map file extension, without the dot.
	pub map_extension: String,
}

impl DirSource {
	/// Default container extension.
	pub const CONTAINER_EXTENSION: &'static str = "lmo";
	/// Default map extension.
	pub const MAP_EXTENSION: &'static str = "obj";

	/// Build a source with the default extensions.
	pub fn new(container_dir: impl Into<PathBuf>, map_dirs: Vec<PathBuf>, catalog_path: impl Into<PathBuf>) -> Self {
		Self {
			container_dir: container_dir.into(),
			map_dirs,
			catalog_path: catalog_path.into(),
			container_extension: Self::CONTAINER_EXTENSION.to_owned(),
			map_extension: Self::MAP_EXTENSION.to_owned(),
		}
	}

	/// Override both extensions.
	pub fn with_extensions(mut self, container: impl Into<String>, map: impl Into<String>) -> Self {
		self.container_extension = container.into();
		self.map_extension = map.into();
		self
	}
}

impl AssetSource for DirSource {
	fn container_files(&self) -> Result<Vec<SourceFile>> {
		let mut out = Vec::new();
		for path in list_files(&self.container_dir, &self.container_extension)? {
			let name = file_label(&path, Path::file_name).to_lowercase();
			out.push(SourceFile::new(name, fs::read(&path)?));
		}
		debug!(dir = %self.container_dir.display(), count = out.len(), "container files listed");
		Ok(out)
	}

	fn map_files(&self) -> Result<Vec<SourceFile>> {
		let mut paths = BTreeSet::new();
		for dir in &self.map_dirs {
			paths.extend(list_files(dir, &self.map_extension)?);
		}

		let mut out = Vec::with_capacity(paths.len());
		for path in paths {
			out.push(SourceFile::new(file_label(&path, Path::file_stem), fs::read(&path)?));
		}
		debug!(count = out.len(), "map files listed");
		Ok(out)
	}

	fn catalog(&self) -> Result<Vec<u8>> {
		if !self.catalog_path.is_file() {
			warn!(path = %self.catalog_path.display(), "catalog not found; continuing with an empty catalog");
			return Ok(Vec::new());
		}
		Ok(fs::read(&self.catalog_path)?)
	}
}

fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		warn!(dir = %dir.display(), "directory not found; skipping");
		return Ok(Vec::new());
	}

	let mut out = Vec::new();
	for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}
		let matches = entry
			.path()
			.extension()
			.and_then(|item| item.to_str())
			.is_some_and(|item| item.eq_ignore_ascii_case(extension));
		if matches {
			out.push(entry.into_path());
		}
	}
	Ok(out)
}

fn file_label(path: &Path, part: fn(&Path) -> Option<&std::ffi::OsStr>) -> String {
	part(path).map(|item| item.to_string_lossy().into_owned()).unwrap_or_default()
}

/// In-memory source for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
	/// Container files.
	pub containers: Vec<SourceFile>,
	/// Map files.
	pub maps: Vec<SourceFile>,
	/// Catalog bytes.
	pub catalog: Vec<u8>,
}

impl AssetSource for MemorySource {
	fn container_files(&self) -> Result<Vec<SourceFile>> {
		Ok(self.containers.clone())
	}

	fn map_files(&self) -> Result<Vec<SourceFile>> {
		Ok(self.maps.clone())
	}

	fn catalog(&self) -> Result<Vec<u8>> {
		Ok(self.catalog.clone())
	}
}
