//! Component Core - Shared library for component scaffolding CLIs
//!
//! This library fetches a component library (a branch archive of a remote
//! repository, or a local directory), lets the user pick a collection and the
//! components inside it, and copies the selected file trees into a project.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Bundle sources, copy plans and the copier
//! - **Layer 2: Workflow Orchestration** - `Options`, the `Prompter` trait,
//!   selection and the `add` pipeline, `LibraryConfig` for product binaries
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use component_core::{Bundle, BundleFetcher, BundleSource, Options, AddArgs, workflow};
//!
//! let fetcher = BundleFetcher::new("my-cli", None);
//! let bundle = fetcher.materialize(&BundleSource::local("library".into())).await?;
//! let options = Options::new(AddArgs::default(), &std::env::current_dir()?)?;
//! let outcome = workflow::add(&bundle, &options, &mut my_prompter).await?;
//! ```

pub mod bundle;
pub mod copier;
pub mod library;
pub mod options;
pub mod plan;
pub mod selector;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use bundle::{Bundle, BundleEntry, BundleFetcher, BundleSource, RemoteRef, SourceError};
pub use copier::{copy_components, CopyReport, FileOutcome, FileRecord};
pub use library::LibraryConfig;
pub use options::{AddArgs, Options, ValidationError};
pub use plan::{CopyPlan, PlanError};
pub use selector::Prompter;
pub use workflow::{AddOutcome, Selected, Selection};

#[cfg(feature = "tui")]
pub use tui::run;
