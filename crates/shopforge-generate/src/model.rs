use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the pipeline engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    /// Run seed; every random draw in the pipeline derives from it.
    pub seed: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            seed: 332,
        }
    }
}

/// Summary of one generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub tables: Vec<TableReport>,
    pub purchase_events: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub duration_ms: u64,
    pub bytes_written: u64,
}

impl GenerationReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            tables: Vec::new(),
            purchase_events: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
            bytes_written: 0,
        }
    }

    pub fn record_table(&mut self, table: &str, rows: u64) {
        self.tables.push(TableReport {
            table: table.to_string(),
            rows,
        });
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
