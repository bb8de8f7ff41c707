//! Component copying with skip-existing semantics
//!
//! Copying is best-effort: a missing component, an unsafe entry or a failed
//! write is recorded in the report and the remaining work continues.

use crate::bundle::{Bundle, BundleEntry};
use crate::plan::CopyPlan;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What happened to a single bundle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written,
    /// Destination already existed and overwrite was off
    Skipped,
    /// Reading the entry or writing the destination failed
    Failed(String),
    /// Entry path would escape the destination root
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub component: String,
    pub relative_path: String,
    pub destination: Option<PathBuf>,
    pub outcome: FileOutcome,
}

/// Result of copying a set of components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub files: Vec<FileRecord>,
    /// Requested components with no matching entries
    pub not_found: Vec<String>,
    /// Number of distinct components requested
    pub requested: usize,
}

impl CopyReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Rejected(_)))
    }

    /// True when components were requested and none of them resolved
    pub fn all_components_missing(&self) -> bool {
        self.requested > 0 && self.not_found.len() == self.requested
    }
}

/// Copy the requested components of `collection` under `destination`
pub async fn copy_components(
    bundle: &Bundle,
    collection: &str,
    components: &[String],
    destination: &Path,
    overwrite: bool,
) -> CopyReport {
    let mut report = CopyReport::default();
    let mut seen = HashSet::new();

    for component in components {
        if !seen.insert(component.as_str()) {
            continue;
        }
        report.requested += 1;

        let plan = CopyPlan::build(bundle, collection, component);
        if plan.is_empty() {
            report.not_found.push(component.clone());
            continue;
        }

        copy_plan(bundle, &plan, destination, overwrite, &mut report).await;
    }

    report
}

async fn copy_plan(
    bundle: &Bundle,
    plan: &CopyPlan<'_>,
    destination: &Path,
    overwrite: bool,
    report: &mut CopyReport,
) {
    for step in &plan.steps {
        let record = |path: Option<PathBuf>, outcome| FileRecord {
            component: plan.component.clone(),
            relative_path: step.relative_path.clone(),
            destination: path,
            outcome,
        };

        let target = match &step.target {
            Ok(relative) => destination.join(relative),
            Err(e) => {
                report
                    .files
                    .push(record(None, FileOutcome::Rejected(e.to_string())));
                continue;
            }
        };

        if step.is_dir() {
            if let Err(e) = fs::create_dir_all(&target).await {
                report.files.push(record(
                    Some(target),
                    FileOutcome::Failed(format!("falha ao criar diretório: {}", e)),
                ));
            }
            continue;
        }

        let exists = fs::symlink_metadata(&target).await.is_ok();
        if exists && !overwrite {
            report.files.push(record(Some(target), FileOutcome::Skipped));
            continue;
        }

        let outcome = match write_entry(bundle, step.entry, &target).await {
            Ok(()) => FileOutcome::Written,
            Err(reason) => FileOutcome::Failed(reason),
        };
        report.files.push(record(Some(target), outcome));
    }
}

async fn write_entry(
    bundle: &Bundle,
    entry: &BundleEntry,
    target: &Path,
) -> Result<(), String> {
    let content = bundle.read(entry).map_err(|e| e.to_string())?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("falha ao criar diretório {}: {}", parent.display(), e))?;
    }

    fs::write(target, &content)
        .await
        .map_err(|e| format!("falha ao escrever arquivo: {}", e))
}
