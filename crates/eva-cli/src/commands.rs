use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use eva_core::{ImportOrchestrator, ImportReport, JsonFileStore};
use eva_standards::Standards;

use eva_cli::config::ImportConfig;

pub fn run_import(url: &str, config: &ImportConfig) -> Result<ImportReport> {
    let span = info_span!("run", url = %url);
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 0: settings and standards
    // =========================================================================
    let data_dir = &config.data_dir;
    let store_path = &config.store_path;
    let standards = Standards::load().context("load standards")?;
    info!(
        mappings = standards.schema.len(),
        choice_tables = standards.catalog.len(),
        data_dir = %data_dir.display(),
        store = %store_path.display(),
        "standards loaded"
    );

    // =========================================================================
    // Stage 1: open the store
    // =========================================================================
    let mut store = JsonFileStore::open(store_path)
        .with_context(|| format!("open store {}", store_path.display()))?;

    // =========================================================================
    // Stage 2: fetch, group and import
    // =========================================================================
    let report = ImportOrchestrator::new(&standards, &mut store)
        .with_filter(config.value_filter())
        .import(url, data_dir)
        .with_context(|| format!("import {url}"))?;

    info!(
        imported = report.imported,
        skipped = report.skipped_duplicate + report.skipped_missing_id,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(report)
}
