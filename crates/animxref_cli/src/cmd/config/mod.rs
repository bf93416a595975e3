use std::path::{Path, PathBuf};

use animxref::asset::{AssetError, DirSource, Result};
use serde::{Deserialize, Serialize};

/// Survey inputs read from a TOML file.
///
/// ```toml
/// container_dir = "data/model"
/// map_dirs = ["data/map", "data/map2"]
/// catalog_path = "data/objinfo.bin"
/// excluded_maps = ["debug_room"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyConfig {
	pub container_dir: Option<PathBuf>,
	pub map_dirs: Vec<PathBuf>,
	pub catalog_path: Option<PathBuf>,
	pub excluded_maps: Vec<String>,
	pub container_extension: String,
	pub map_extension: String,
}

impl Default for SurveyConfig {
	fn default() -> Self {
		Self {
			container_dir: None,
			map_dirs: Vec::new(),
			catalog_path: None,
			excluded_maps: Vec::new(),
			container_extension: DirSource::CONTAINER_EXTENSION.to_owned(),
			map_extension: DirSource::MAP_EXTENSION.to_owned(),
		}
	}
}

/// Command-line values layered over a config file.
#[derive(Debug, Clone, Default)]
pub struct SurveyOverrides {
	pub container_dir: Option<PathBuf>,
	pub map_dirs: Vec<PathBuf>,
	pub catalog_path: Option<PathBuf>,
	pub excluded_maps: Vec<String>,
}

impl SurveyConfig {
	/// Read and parse a config file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text, path)
	}

	/// Parse config text; `path` only labels errors.
	pub fn parse(text: &str, path: &Path) -> Result<Self> {
		toml::from_str(text).map_err(|err| AssetError::InvalidConfig {
			path: path.to_path_buf(),
			reason: err.message().to_owned(),
		})
	}

	/// Apply flags. Directories and the catalog replace file values; exclusions accumulate.
	pub fn with_overrides(mut self, overrides: SurveyOverrides) -> Self {
		if let Some(dir) = overrides.container_dir {
			self.container_dir = Some(dir);
		}
		if !overrides.map_dirs.is_empty() {
			self.map_dirs = overrides.map_dirs;
		}
		if let Some(path) = overrides.catalog_path {
			self.catalog_path = Some(path);
		}
		self.excluded_maps.extend(overrides.excluded_maps);
		self
	}

	/// Whether a map name is listed in `excluded_maps`, ignoring ASCII case.
	pub fn is_excluded(&self, map_name: &str) -> bool {
		self.excluded_maps.iter().any(|name| name.eq_ignore_ascii_case(map_name))
	}

	/// Build a directory source, failing on the first unset required value.
	pub fn to_source(&self) -> Result<DirSource> {
		let container_dir = self
			.container_dir
			.clone()
			.ok_or(AssetError::MissingSetting { name: "container_dir" })?;
		if self.map_dirs.is_empty() {
			return Err(AssetError::MissingSetting { name: "map_dirs" });
		}
		let catalog_path = self
			.catalog_path
			.clone()
			.ok_or(AssetError::MissingSetting { name: "catalog_path" })?;

		Ok(DirSource::new(container_dir, self.map_dirs.clone(), catalog_path)
			.with_extensions(self.container_extension.as_str(), self.map_extension.as_str()))
	}
}
