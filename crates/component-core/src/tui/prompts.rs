//! Charm-style CLI prompts using cliclack

use crate::bundle::{Bundle, BundleFetcher, BundleSource};
use crate::copier::{CopyReport, FileOutcome};
use crate::library::LibraryConfig;
use crate::options::Options;
use crate::selector::Prompter;
use crate::workflow::{self, AddOutcome, Selected, Selection};
use anyhow::Result;
use colored::Colorize;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Terminal prompter backed by cliclack
#[derive(Debug, Default, Clone, Copy)]
pub struct CliclackPrompter;

/// Esc / Ctrl+C surface as `Interrupted`; treat them as a dismissal
fn dismissible<T>(result: io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Prompter for CliclackPrompter {
    fn select(&mut self, message: &str, items: &[String]) -> Result<Option<usize>> {
        // Use indices as values to avoid cloning labels into the prompt
        let mut select = cliclack::select(message);
        for (idx, item) in items.iter().enumerate() {
            select = select.item(idx, item, "");
        }
        dismissible(select.interact())
    }

    fn multiselect(
        &mut self,
        message: &str,
        items: &[String],
        initially_selected: bool,
    ) -> Result<Option<Vec<usize>>> {
        let mut multi = cliclack::multiselect(message);
        for (idx, item) in items.iter().enumerate() {
            multi = multi.item(idx, item, "");
        }
        if initially_selected {
            multi = multi.initial_values((0..items.len()).collect());
        }
        dismissible(multi.required(false).interact())
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>> {
        dismissible(cliclack::confirm(message).initial_value(default).interact())
    }
}

/// Run the `add` command with interactive prompts
pub async fn run<C: LibraryConfig>(
    config: &C,
    options: Options,
    source: BundleSource,
    timeout: Option<Duration>,
) -> Result<AddOutcome> {
    let silent = options.silent();
    if !silent {
        cliclack::intro(config.display_name())?;
    }

    // Step 1: Download or read the component library
    let fetcher = BundleFetcher::from_config(config, timeout);
    let bundle = load_bundle(&fetcher, &source, silent).await?;

    // Step 2: Select
    let mut prompter = CliclackPrompter;
    let outcome = match workflow::select(&bundle, &options, &mut prompter)? {
        // Step 3: Copy
        Selected::Copy(selection) => copy_selection(&bundle, selection, silent).await,
        Selected::Done(outcome) => outcome,
    };

    // Step 4: Report
    print_outcome(&outcome, silent)?;

    Ok(outcome)
}

async fn load_bundle(fetcher: &BundleFetcher, source: &BundleSource, silent: bool) -> Result<Bundle> {
    if silent {
        return Ok(fetcher.materialize(source).await?);
    }

    let spinner = cliclack::spinner();
    let action = match source {
        BundleSource::Remote(_) => "Baixando e extraindo componentes",
        BundleSource::Local(_) => "Lendo componentes",
    };
    spinner.start(format!("{} de {}...", action, source));

    match fetcher.materialize(source).await {
        Ok(bundle) => {
            spinner.stop(format!(
                "Componentes carregados ({} entradas).",
                bundle.entries().len()
            ));
            Ok(bundle)
        }
        Err(e) => {
            spinner.error("Falha ao carregar componentes");
            Err(e.into())
        }
    }
}

async fn copy_selection(bundle: &Bundle, selection: Selection, silent: bool) -> AddOutcome {
    if silent {
        return workflow::copy(bundle, selection).await;
    }

    let spinner = cliclack::spinner();
    spinner.start("Copiando componentes selecionados...");
    let outcome = workflow::copy(bundle, selection).await;
    match &outcome {
        AddOutcome::Copied { report, .. } if report.failed() + report.rejected() > 0 => {
            spinner.error("Cópia concluída com erros.");
        }
        _ => spinner.stop("Cópia concluída."),
    }
    outcome
}

fn print_outcome(outcome: &AddOutcome, silent: bool) -> Result<()> {
    if let Some(message) = outcome.message() {
        return finish(message, silent);
    }

    let AddOutcome::Copied {
        collection,
        destination,
        report,
    } = outcome
    else {
        return Ok(());
    };

    for file in &report.files {
        let relative = &file.relative_path;
        match &file.outcome {
            FileOutcome::Written if !silent => {
                cliclack::log::success(format!(
                    "Arquivo {} copiado para {}.",
                    relative,
                    destination.display()
                ))?;
            }
            FileOutcome::Skipped if !silent => {
                cliclack::log::remark(format!("Arquivo {} já existe. Pulando...", relative))?;
            }
            FileOutcome::Failed(reason) => {
                print_error(&format!("Arquivo {}: {}", relative, reason), silent)?;
            }
            FileOutcome::Rejected(reason) => {
                print_error(&format!("Arquivo {} ignorado: {}", relative, reason), silent)?;
            }
            _ => {}
        }
    }

    for name in &report.not_found {
        print_error(
            &format!("Componente '{}' não encontrado em '{}'.", name, collection),
            silent,
        )?;
    }

    finish(&summary(report, destination), silent)
}

fn summary(report: &CopyReport, destination: &Path) -> String {
    let mut line = format!(
        "{} copiado(s), {} ignorado(s), {} não encontrado(s) em {}",
        report.written(),
        report.skipped(),
        report.not_found.len(),
        destination.display()
    );
    let errors = report.failed() + report.rejected();
    if errors > 0 {
        line.push_str(&format!(", {} com erro", errors));
    }
    line
}

fn print_error(message: &str, silent: bool) -> Result<()> {
    if silent {
        eprintln!("{} {}", "Erro:".red(), message);
    } else {
        cliclack::log::error(message)?;
    }
    Ok(())
}

fn finish(message: &str, silent: bool) -> Result<()> {
    if silent {
        println!("{}", message);
    } else {
        cliclack::outro(message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copier::FileRecord;

    fn record(outcome: FileOutcome) -> FileRecord {
        FileRecord {
            component: "button".into(),
            relative_path: "button/index.ts".into(),
            destination: None,
            outcome,
        }
    }

    #[test]
    fn test_summary_counts() {
        let report = CopyReport {
            files: vec![
                record(FileOutcome::Written),
                record(FileOutcome::Written),
                record(FileOutcome::Skipped),
            ],
            not_found: vec!["tooltip".into()],
            requested: 2,
        };
        assert_eq!(
            summary(&report, Path::new("/tmp/proj")),
            "2 copiado(s), 1 ignorado(s), 1 não encontrado(s) em /tmp/proj"
        );
    }

    #[test]
    fn test_summary_mentions_errors() {
        let report = CopyReport {
            files: vec![
                record(FileOutcome::Failed("permissão negada".into())),
                record(FileOutcome::Rejected("caminho inseguro".into())),
            ],
            not_found: vec![],
            requested: 1,
        };
        assert!(summary(&report, Path::new("/tmp/proj")).ends_with(", 2 com erro"));
    }

    #[test]
    fn test_dismissible_maps_interrupt_to_none() {
        let interrupted: io::Result<bool> = Err(io::Error::new(io::ErrorKind::Interrupted, "esc"));
        assert_eq!(dismissible(interrupted).unwrap(), None);

        let other: io::Result<bool> = Err(io::Error::new(io::ErrorKind::Other, "tty"));
        assert!(dismissible(other).is_err());

        assert_eq!(dismissible(Ok(3)).unwrap(), Some(3));
    }
}
