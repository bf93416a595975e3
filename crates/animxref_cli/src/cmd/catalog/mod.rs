use std::path::PathBuf;

use animxref::asset::{CatalogStats, decode_catalog};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Keep records whose asset name contains this text (case-insensitive).
	#[arg(long)]
	pub filter: Option<String>,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct CatalogJson {
	path: String,
	stats: StatsJson,
	entries: usize,
	shown: usize,
	records: Vec<RecordJson>,
}

#[derive(serde::Serialize)]
struct StatsJson {
	record_width: u32,
	records: usize,
	not_existing: usize,
	empty_names: usize,
	too_narrow: usize,
	overwritten: usize,
}

impl From<CatalogStats> for StatsJson {
	fn from(stats: CatalogStats) -> Self {
		Self {
			record_width: stats.record_width,
			records: stats.records,
			not_existing: stats.not_existing,
			empty_names: stats.empty_names,
			too_narrow: stats.too_narrow,
			overwritten: stats.overwritten,
		}
	}
}

#[derive(serde::Serialize)]
struct RecordJson {
	object_id: u32,
	asset_name: String,
}

/// Decode an object catalog and print its records ordered by id.
pub fn run(args: Args) -> animxref::asset::Result<()> {
	let Args { path, filter, limit, json } = args;
	let bytes = std::fs::read(&path)?;
	let catalog = decode_catalog(&bytes);

	let needle = filter.map(|text| text.to_lowercase());
	let records: Vec<RecordJson> = catalog
		.records()
		.filter(|record| needle.as_deref().is_none_or(|needle| record.asset_name.contains(needle)))
		.take(limit.unwrap_or(usize::MAX))
		.map(|record| RecordJson {
			object_id: record.object_id,
			asset_name: record.asset_name.into(),
		})
		.collect();

	if json {
		emit_json(&CatalogJson {
			path: path.display().to_string(),
			stats: catalog.stats.into(),
			entries: catalog.len(),
			shown: records.len(),
			records,
		});
		return Ok(());
	}

	let stats = catalog.stats;
	println!("path: {}", path.display());
	println!("record_width: {}", stats.record_width);
	println!("records: {}", stats.records);
	println!("skipped_not_existing: {}", stats.not_existing);
	println!("skipped_empty_name: {}", stats.empty_names);
	println!("skipped_too_narrow: {}", stats.too_narrow);
	println!("overwritten: {}", stats.overwritten);
	println!("entries: {}", catalog.len());
	for record in &records {
		println!("  {:>5} {}", record.object_id, record.asset_name);
	}
	Ok(())
}

#[cfg(test)]
mod tests;
