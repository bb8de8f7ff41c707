//! Copy plans: the entries of one component mapped to destination-relative paths

use crate::bundle::{Bundle, BundleEntry};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("caminho inseguro no pacote: {0}")]
    UnsafePath(String),
}

/// One entry of a plan
#[derive(Debug)]
pub struct PlanStep<'a> {
    /// Path relative to the destination root, as it appears in the bundle
    pub relative_path: String,
    /// Sanitized destination-relative path, or why it was rejected
    pub target: Result<PathBuf, PlanError>,
    pub entry: &'a BundleEntry,
}

impl PlanStep<'_> {
    pub fn is_dir(&self) -> bool {
        self.entry.is_dir
    }
}

/// Ordered steps that install one component
#[derive(Debug)]
pub struct CopyPlan<'a> {
    pub component: String,
    pub steps: Vec<PlanStep<'a>>,
}

impl<'a> CopyPlan<'a> {
    /// Collect every entry under `<collection>/<component>/`, keeping the
    /// component directory in the destination path
    pub fn build(bundle: &'a Bundle, collection: &str, component: &str) -> Self {
        let collection_prefix = format!("{}/", collection);
        let marker = format!("{}{}", collection_prefix, component);
        let component_prefix = format!("{}/", marker);

        let steps = bundle
            .entries()
            .iter()
            .filter(|entry| {
                entry.path.starts_with(&component_prefix) || (entry.is_dir && entry.path == marker)
            })
            .map(|entry| {
                let relative_path = entry.path[collection_prefix.len()..].to_string();
                let target = sanitize_relative(&relative_path);
                PlanStep {
                    relative_path,
                    target,
                    entry,
                }
            })
            .collect();

        Self {
            component: component.to_string(),
            steps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Turn a `/`-separated bundle path into a relative path that cannot leave
/// the destination root. `.` and empty segments are dropped; `..`, absolute
/// paths, drive prefixes and backslashes are rejected.
pub fn sanitize_relative(path: &str) -> Result<PathBuf, PlanError> {
    let unsafe_path = || PlanError::UnsafePath(path.to_string());

    if path.starts_with('/') {
        return Err(unsafe_path());
    }

    let mut sanitized = PathBuf::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(unsafe_path()),
            s if s.contains('\\') || s.contains(':') || s.contains('\0') => {
                return Err(unsafe_path())
            }
            s => sanitized.push(s),
        }
    }

    if sanitized.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(sanitized)
}
