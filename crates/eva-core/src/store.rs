//! Record storage consumed by the importer.
//!
//! [`InMemoryStore`] keeps everything in memory. [`JsonFileStore`] keeps the
//! same data in one JSON file, rewritten atomically (temp file + rename) each
//! time an evaluation is saved, so an interrupted import leaves the last
//! complete save. Children created or saved since then are written with the
//! next evaluation save.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Utc;
use eva_model::{ChildRecord, Evaluation, Record, RecordKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Create, read and save evaluations and their child records.
pub trait EvaluationStore {
    /// External identifiers (`rsm_evaluation_id`) of every stored evaluation.
    fn existing_external_ids(&self) -> StoreResult<BTreeSet<String>>;

    /// Create an empty evaluation with a fresh id.
    fn create_evaluation(&mut self) -> StoreResult<Evaluation>;

    fn get_evaluation(&self, id: Uuid) -> StoreResult<Evaluation>;

    /// Persist `evaluation`, updating its timestamps.
    ///
    /// Durable stores also write every child created or saved since the last call.
    fn save_evaluation(&mut self, evaluation: &mut Evaluation) -> StoreResult<()>;

    /// Create an empty child of `kind` owned by `evaluation_id`.
    fn create_child(&mut self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<ChildRecord>;

    fn save_child(&mut self, child: &mut ChildRecord) -> StoreResult<()>;

    /// Children of one kind owned by `evaluation_id`, oldest first.
    fn children(&self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<Vec<ChildRecord>>;
}

/// Serialized store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub evaluations: BTreeMap<Uuid, Evaluation>,
    /// Children in creation order.
    pub children: Vec<ChildRecord>,
}

impl StoreData {
    fn existing_external_ids(&self) -> BTreeSet<String> {
        self.evaluations
            .values()
            .filter_map(|evaluation| evaluation.rsm_evaluation_id.clone())
            .collect()
    }

    fn create_evaluation(&mut self) -> Evaluation {
        let mut evaluation = Evaluation {
            id: Uuid::new_v4(),
            ..Evaluation::default()
        };
        evaluation.touch(Utc::now());
        self.evaluations.insert(evaluation.id, evaluation.clone());
        evaluation
    }

    fn get_evaluation(&self, id: Uuid) -> StoreResult<Evaluation> {
        self.evaluations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Evaluation,
                id,
            })
    }

    fn save_evaluation(&mut self, evaluation: &mut Evaluation) -> StoreResult<()> {
        let slot = self
            .evaluations
            .get_mut(&evaluation.id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Evaluation,
                id: evaluation.id,
            })?;
        evaluation.touch(Utc::now());
        *slot = evaluation.clone();
        Ok(())
    }

    fn create_child(&mut self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<ChildRecord> {
        if !self.evaluations.contains_key(&evaluation_id) {
            return Err(StoreError::NotFound {
                kind: RecordKind::Evaluation,
                id: evaluation_id,
            });
        }
        let mut child = ChildRecord::new(kind, Uuid::new_v4(), evaluation_id)?;
        child.as_record_mut().touch(Utc::now());
        self.children.push(child.clone());
        Ok(child)
    }

    fn save_child(&mut self, child: &mut ChildRecord) -> StoreResult<()> {
        let id = child.id();
        let slot = self
            .children
            .iter_mut()
            .rev()
            .find(|stored| stored.id() == id)
            .ok_or(StoreError::NotFound {
                kind: child.kind(),
                id,
            })?;
        child.as_record_mut().touch(Utc::now());
        *slot = child.clone();
        Ok(())
    }

    fn children(&self, evaluation_id: Uuid, kind: RecordKind) -> Vec<ChildRecord> {
        self.children
            .iter()
            .filter(|child| child.evaluation_id() == evaluation_id && child.kind() == kind)
            .cloned()
            .collect()
    }
}

/// Store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: StoreData,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }
}

impl EvaluationStore for InMemoryStore {
    fn existing_external_ids(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self.data.existing_external_ids())
    }

    fn create_evaluation(&mut self) -> StoreResult<Evaluation> {
        Ok(self.data.create_evaluation())
    }

    fn get_evaluation(&self, id: Uuid) -> StoreResult<Evaluation> {
        self.data.get_evaluation(id)
    }

    fn save_evaluation(&mut self, evaluation: &mut Evaluation) -> StoreResult<()> {
        self.data.save_evaluation(evaluation)
    }

    fn create_child(&mut self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<ChildRecord> {
        self.data.create_child(evaluation_id, kind)
    }

    fn save_child(&mut self, child: &mut ChildRecord) -> StoreResult<()> {
        self.data.save_child(child)
    }

    fn children(&self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<Vec<ChildRecord>> {
        Ok(self.data.children(evaluation_id, kind))
    }
}

/// Store persisted as one JSON document, written on every evaluation save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let file = File::open(&path).map_err(|source| StoreError::Io {
                operation: "open",
                path: path.clone(),
                source,
            })?;
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                StoreError::Serialization {
                    path: path.clone(),
                    source,
                }
            })?
        } else {
            StoreData::default()
        };
        tracing::debug!(
            path = %path.display(),
            evaluations = data.evaluations.len(),
            children = data.children.len(),
            "opened store"
        );
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    fn persist(&self) -> StoreResult<()> {
        let temp_path = self.path.with_extension("json.tmp");
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(&temp_path).map_err(|source| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.data).map_err(|source| {
            StoreError::Serialization {
                path: temp_path.clone(),
                source,
            }
        })?;
        let file = writer.into_inner().map_err(|error| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: error.into_error(),
        })?;
        file.sync_all().map_err(|source| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source,
        })
    }
}

impl EvaluationStore for JsonFileStore {
    fn existing_external_ids(&self) -> StoreResult<BTreeSet<String>> {
        Ok(self.data.existing_external_ids())
    }

    fn create_evaluation(&mut self) -> StoreResult<Evaluation> {
        Ok(self.data.create_evaluation())
    }

    fn get_evaluation(&self, id: Uuid) -> StoreResult<Evaluation> {
        self.data.get_evaluation(id)
    }

    fn save_evaluation(&mut self, evaluation: &mut Evaluation) -> StoreResult<()> {
        self.data.save_evaluation(evaluation)?;
        self.persist()
    }

    fn create_child(&mut self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<ChildRecord> {
        self.data.create_child(evaluation_id, kind)
    }

    fn save_child(&mut self, child: &mut ChildRecord) -> StoreResult<()> {
        self.data.save_child(child)
    }

    fn children(&self, evaluation_id: Uuid, kind: RecordKind) -> StoreResult<Vec<ChildRecord>> {
        Ok(self.data.children(evaluation_id, kind))
    }
}
