//! The `add` pipeline: collection → components → copy
//!
//! This layer is UI-agnostic. It drives the selector through a `Prompter` and
//! returns an `AddOutcome` for the caller to render.

use crate::bundle::Bundle;
use crate::copier::{copy_components, CopyReport};
use crate::options::Options;
use crate::selector::{self, Prompter};
use anyhow::Result;
use std::path::PathBuf;

/// How an `add` run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The bundle has no collections
    NoCollections,
    /// The collection prompt was dismissed
    NoCollectionSelected,
    /// No components were selected; nothing was written
    NothingSelected,
    /// Overwrite confirmation was declined
    Cancelled,
    Copied {
        collection: String,
        destination: PathBuf,
        report: CopyReport,
    },
}

impl AddOutcome {
    /// Informational message for the early-return outcomes
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AddOutcome::NoCollections => Some("Nenhuma pasta disponível para copiar."),
            AddOutcome::NoCollectionSelected => Some("Nenhuma pasta selecionada."),
            AddOutcome::NothingSelected => Some("Nenhum componente foi selecionado."),
            AddOutcome::Cancelled => Some("Operação cancelada."),
            AddOutcome::Copied { .. } => None,
        }
    }

    /// Non-zero only when every requested component failed to resolve
    pub fn exit_code(&self) -> u8 {
        match self {
            AddOutcome::Copied { report, .. } if report.all_components_missing() => 1,
            _ => 0,
        }
    }
}

/// Everything chosen interactively, ready to be copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub collection: String,
    pub components: Vec<String>,
    pub destination: PathBuf,
    pub overwrite: bool,
}

/// Result of the interactive half of `add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    Copy(Selection),
    /// Stopped before writing anything
    Done(AddOutcome),
}

/// Choose a collection and its components, then confirm overwriting
pub fn select<P: Prompter + ?Sized>(
    bundle: &Bundle,
    options: &Options,
    prompter: &mut P,
) -> Result<Selected> {
    let collections = bundle.collections();
    if collections.is_empty() {
        return Ok(Selected::Done(AddOutcome::NoCollections));
    }

    let Some(collection) = selector::choose_collection(prompter, options, &collections)? else {
        return Ok(Selected::Done(AddOutcome::NoCollectionSelected));
    };

    let available = bundle.components(&collection);
    let components = selector::choose_components(prompter, options, &available)?;
    if components.is_empty() {
        return Ok(Selected::Done(AddOutcome::NothingSelected));
    }

    let destination = options.destination();
    if !selector::confirm_overwrite(prompter, options, &destination)? {
        return Ok(Selected::Done(AddOutcome::Cancelled));
    }

    Ok(Selected::Copy(Selection {
        collection,
        components,
        destination,
        overwrite: options.overwrite(),
    }))
}

/// Copy a confirmed selection out of the bundle
pub async fn copy(bundle: &Bundle, selection: Selection) -> AddOutcome {
    let report = copy_components(
        bundle,
        &selection.collection,
        &selection.components,
        &selection.destination,
        selection.overwrite,
    )
    .await;

    AddOutcome::Copied {
        collection: selection.collection,
        destination: selection.destination,
        report,
    }
}

/// Run selection and copying against a materialized bundle
pub async fn add<P: Prompter + ?Sized>(
    bundle: &Bundle,
    options: &Options,
    prompter: &mut P,
) -> Result<AddOutcome> {
    match select(bundle, options, prompter)? {
        Selected::Copy(selection) => Ok(copy(bundle, selection).await),
        Selected::Done(outcome) => Ok(outcome),
    }
}
