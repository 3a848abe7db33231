//! The import driver: source file to stored evaluations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use eva_ingest::{RawTable, RowGrouper, RowSet, fetch_or_reuse, read_raw_table};
use eva_model::{ChildRecord, RecordKind};
use eva_standards::Standards;
use eva_transform::{ApplyStats, DerivedFieldComputer, FieldResolver, ValueFilter};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::{ImportError, Result};
use crate::search::SearchIndexer;
use crate::store::EvaluationStore;

/// What happened to one evaluation of the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Imported {
        external_id: String,
        id: Uuid,
        title: Option<String>,
        /// Child records created, per kind.
        children: BTreeMap<RecordKind, usize>,
        stats: ApplyStats,
    },
    SkippedDuplicate {
        external_id: String,
    },
    /// Rows whose evaluation identifier cell was blank.
    SkippedMissingId {
        rows: usize,
    },
}

impl EvaluationOutcome {
    pub fn external_id(&self) -> Option<&str> {
        match self {
            EvaluationOutcome::Imported { external_id, .. }
            | EvaluationOutcome::SkippedDuplicate { external_id } => Some(external_id),
            EvaluationOutcome::SkippedMissingId { .. } => None,
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            EvaluationOutcome::Imported { children, .. } => children.values().sum(),
            _ => 0,
        }
    }
}

/// Totals of one import run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Local copy of the source, when the run started from a URL.
    pub source: Option<PathBuf>,
    pub downloaded: bool,
    pub imported: usize,
    pub skipped_duplicate: usize,
    pub skipped_missing_id: usize,
    pub outcomes: Vec<EvaluationOutcome>,
}

impl ImportReport {
    fn record(&mut self, outcome: EvaluationOutcome) {
        match &outcome {
            EvaluationOutcome::Imported { .. } => self.imported += 1,
            EvaluationOutcome::SkippedDuplicate { .. } => self.skipped_duplicate += 1,
            EvaluationOutcome::SkippedMissingId { .. } => self.skipped_missing_id += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Drives one import against a store.
///
/// Evaluations whose identifier is already stored are skipped, so running the
/// same source twice imports nothing the second time.
pub struct ImportOrchestrator<'a, S: EvaluationStore + ?Sized> {
    standards: &'a Standards,
    filter: ValueFilter,
    store: &'a mut S,
}

impl<'a, S: EvaluationStore + ?Sized> ImportOrchestrator<'a, S> {
    pub fn new(standards: &'a Standards, store: &'a mut S) -> Self {
        Self {
            standards,
            filter: ValueFilter::default(),
            store,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ValueFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Fetch (or reuse) the file at `url` under `data_dir` and import it.
    pub fn import(&mut self, url: &str, data_dir: &Path) -> Result<ImportReport> {
        let span = info_span!("import", url = %url);
        let _guard = span.enter();

        let cached = fetch_or_reuse(url, data_dir).map_err(ImportError::Download)?;
        let table = read_raw_table(&cached.path).map_err(ImportError::Table)?;
        let mut report = self.import_table(&table)?;
        report.source = Some(cached.path);
        report.downloaded = cached.downloaded;
        Ok(report)
    }

    /// Import an already parsed table.
    pub fn import_table(&mut self, table: &RawTable) -> Result<ImportReport> {
        let start = Instant::now();
        let grouper = RowGrouper::new(&table.headers).map_err(ImportError::Table)?;
        let existing = self.store.existing_external_ids()?;
        let all_rows = RowSet::all(table);
        let evaluations = grouper.group_by_evaluation(&all_rows);
        info!(
            rows = table.len(),
            evaluations = evaluations.len(),
            already_stored = existing.len(),
            "grouped source rows"
        );

        let mut report = ImportReport::default();
        for (external_id, rows) in &evaluations {
            let outcome = if external_id.is_empty() {
                warn!(rows = rows.len(), "rows without an evaluation id skipped");
                EvaluationOutcome::SkippedMissingId { rows: rows.len() }
            } else if existing.contains(external_id) {
                info!(external_id = %external_id, "evaluation already imported, skipping");
                EvaluationOutcome::SkippedDuplicate {
                    external_id: external_id.clone(),
                }
            } else {
                self.import_evaluation(&grouper, external_id, rows)?
            };
            report.record(outcome);
        }

        info!(
            imported = report.imported,
            skipped_duplicate = report.skipped_duplicate,
            skipped_missing_id = report.skipped_missing_id,
            duration_ms = start.elapsed().as_millis(),
            "import complete"
        );
        Ok(report)
    }

    fn import_evaluation(
        &mut self,
        grouper: &RowGrouper,
        external_id: &str,
        rows: &RowSet<'_>,
    ) -> Result<EvaluationOutcome> {
        let span = info_span!("evaluation", external_id = %external_id);
        let _guard = span.enter();

        let resolver = FieldResolver::new(&self.standards.schema, &self.filter);
        let derived = DerivedFieldComputer::new(resolver);
        let indexer = SearchIndexer::new(&self.standards.schema, &self.standards.catalog);

        // =====================================================================
        // Evaluation fields
        // =====================================================================
        let mut evaluation = self.store.create_evaluation()?;
        evaluation.rsm_evaluation_id = Some(external_id.to_string());
        let mut stats = resolver.populate(&mut evaluation, rows);
        self.store.save_evaluation(&mut evaluation)?;

        // =====================================================================
        // Child records, at most one of each kind per report
        // =====================================================================
        let mut children: Vec<ChildRecord> = Vec::new();
        for (report_id, report_rows) in grouper.group_by_report(rows) {
            for kind in RecordKind::CHILDREN {
                if !resolver.has_values(kind, &report_rows) {
                    continue;
                }
                let mut child = self.store.create_child(evaluation.id, kind)?;
                stats.merge(resolver.populate(child.as_record_mut(), &report_rows));
                self.store.save_child(&mut child)?;
                debug!(report_id = %report_id, kind = %kind, id = %child.id(), "created child record");
                children.push(child);
            }
        }

        // =====================================================================
        // Derived fields and search text
        // =====================================================================
        stats.merge(derived.compute(&mut evaluation, rows));
        evaluation.search_text = Some(indexer.evaluation_text(&evaluation, &children));
        self.store.save_evaluation(&mut evaluation)?;

        let mut child_counts: BTreeMap<RecordKind, usize> = BTreeMap::new();
        for child in &children {
            *child_counts.entry(child.kind()).or_default() += 1;
        }
        info!(
            id = %evaluation.id,
            children = children.len(),
            truncated = stats.truncated,
            rejected = stats.rejected,
            "evaluation imported"
        );

        Ok(EvaluationOutcome::Imported {
            external_id: external_id.to_string(),
            id: evaluation.id,
            title: evaluation.title.clone(),
            children: child_counts,
            stats,
        })
    }
}
