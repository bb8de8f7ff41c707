//! Options for the `add` command and their validation

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nome de componente vazio")]
    EmptyComponent,

    #[error("nome de componente inválido '{0}': use apenas o nome da pasta")]
    InvalidComponent(String),

    #[error("nome de coleção inválido '{0}'")]
    InvalidCollection(String),

    #[error("--path deve ser relativo ao diretório de trabalho e não pode conter '..': {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Raw arguments as parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub components: Vec<String>,
    pub yes: bool,
    pub overwrite: bool,
    pub cwd: Option<PathBuf>,
    pub all: bool,
    pub path: Option<PathBuf>,
    pub silent: bool,
    pub src_dir: bool,
    pub collection: Option<String>,
}

/// Validated, immutable options for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    components: Vec<String>,
    yes: bool,
    overwrite: bool,
    cwd: PathBuf,
    all: bool,
    path: Option<PathBuf>,
    silent: bool,
    src_dir: bool,
    collection: Option<String>,
}

impl Options {
    /// Validate raw arguments; relative working directories resolve against
    /// `current_dir`
    pub fn new(args: AddArgs, current_dir: &Path) -> Result<Self, ValidationError> {
        for component in &args.components {
            validate_segment(component).map_err(|e| match e {
                SegmentError::Empty => ValidationError::EmptyComponent,
                SegmentError::Invalid => ValidationError::InvalidComponent(component.clone()),
            })?;
        }

        if let Some(collection) = &args.collection {
            validate_segment(collection)
                .map_err(|_| ValidationError::InvalidCollection(collection.clone()))?;
        }

        if let Some(path) = &args.path {
            let escapes = path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                return Err(ValidationError::InvalidPath(path.clone()));
            }
        }

        let cwd = match args.cwd {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => current_dir.join(dir),
            None => current_dir.to_path_buf(),
        };

        Ok(Self {
            components: args.components,
            yes: args.yes,
            overwrite: args.overwrite,
            cwd,
            all: args.all,
            path: args.path,
            silent: args.silent,
            src_dir: args.src_dir,
            collection: args.collection,
        })
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn yes(&self) -> bool {
        self.yes
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn all(&self) -> bool {
        self.all
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn silent(&self) -> bool {
        self.silent
    }

    pub fn src_dir(&self) -> bool {
        self.src_dir
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// `cwd`, then `src` with `--src-dir`, then `--path`
    pub fn destination(&self) -> PathBuf {
        let mut destination = self.cwd.clone();
        if self.src_dir {
            destination.push("src");
        }
        if let Some(path) = &self.path {
            destination.push(path);
        }
        destination
    }
}

enum SegmentError {
    Empty,
    Invalid,
}

/// A component or collection name must be a single path segment
fn validate_segment(name: &str) -> Result<(), SegmentError> {
    if name.trim().is_empty() {
        return Err(SegmentError::Empty);
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(SegmentError::Invalid);
    }
    Ok(())
}
