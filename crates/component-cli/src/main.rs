//! Components CLI - add components from a component library to your project

use clap::{Parser, Subcommand};
use colored::Colorize;
use component_core::{AddArgs, BundleSource, LibraryConfig, Options, RemoteRef, SourceError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Component library configuration
#[derive(Clone)]
pub struct ComponentsConfig;

impl LibraryConfig for ComponentsConfig {
    fn name(&self) -> &'static str {
        "components"
    }

    fn display_name(&self) -> &'static str {
        "Components"
    }

    fn default_repository(&self) -> &'static str {
        "andrebrumdev/components"
    }

    fn repository_env(&self) -> &'static str {
        "COMPONENTS_REPOSITORY"
    }

    fn branch_env(&self) -> &'static str {
        "COMPONENTS_BRANCH"
    }

    fn host_env(&self) -> &'static str {
        "COMPONENTS_HOST"
    }

    fn cli_description(&self) -> &'static str {
        "Adiciona componentes de uma biblioteca de componentes ao seu projeto"
    }
}

#[derive(Parser, Debug)]
#[command(name = "components")]
#[command(about = ComponentsConfig.cli_description())]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Adiciona um componente ao seu projeto
    Add(CliAddArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliAddArgs {
    /// Os componentes a serem adicionados
    pub components: Vec<String>,

    /// Pular o prompt de confirmação
    #[arg(short, long)]
    pub yes: bool,

    /// Sobrescrever arquivos existentes
    #[arg(short, long)]
    pub overwrite: bool,

    /// O diretório de trabalho. Padrão é o diretório atual
    #[arg(short, long)]
    pub cwd: Option<PathBuf>,

    /// Adicionar todos os componentes disponíveis
    #[arg(short, long)]
    pub all: bool,

    /// O caminho para adicionar o componente
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Silenciar a saída
    #[arg(short, long)]
    pub silent: bool,

    /// Usar o diretório src ao criar um novo projeto
    #[arg(long = "src-dir")]
    pub src_dir: bool,

    /// Pasta (coleção) a copiar, sem prompt
    #[arg(long)]
    pub collection: Option<String>,

    /// Diretório local com a biblioteca de componentes, em vez do repositório remoto
    #[arg(long = "source-dir", conflicts_with_all = ["repo", "branch"])]
    pub source_dir: Option<PathBuf>,

    /// Repositório remoto (dono/repositorio)
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch do repositório remoto
    #[arg(long)]
    pub branch: Option<String>,

    /// Tempo limite do download, em segundos
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl From<CliAddArgs> for AddArgs {
    fn from(args: CliAddArgs) -> Self {
        AddArgs {
            components: args.components,
            yes: args.yes,
            overwrite: args.overwrite,
            cwd: args.cwd,
            all: args.all,
            path: args.path,
            silent: args.silent,
            src_dir: args.src_dir,
            collection: args.collection,
        }
    }
}

/// Remote repository (flags over environment over defaults) or a local directory
fn resolve_source<C: LibraryConfig>(
    config: &C,
    args: &CliAddArgs,
    current_dir: &Path,
) -> Result<BundleSource, SourceError> {
    if let Some(dir) = &args.source_dir {
        return Ok(BundleSource::local(current_dir.join(dir)));
    }

    let mut remote = RemoteRef::from_config(config)?;
    if let Some(repo) = &args.repo {
        remote = remote.with_repository(repo)?;
    }
    if let Some(branch) = &args.branch {
        remote = remote.with_branch(branch.as_str());
    }
    Ok(BundleSource::Remote(remote))
}

async fn run_add<C: LibraryConfig>(config: &C, args: CliAddArgs) -> ExitCode {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let timeout = args.timeout.map(Duration::from_secs);

    // Everything is validated before any network or filesystem access
    let source = match resolve_source(config, &args, &current_dir) {
        Ok(source) => source,
        Err(e) => return invalid_options(e),
    };
    let options = match Options::new(args.into(), &current_dir) {
        Ok(options) => options,
        Err(e) => return invalid_options(e),
    };

    match component_core::run(config, options, source, timeout).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{} {:#}", "Erro ao copiar componentes:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn invalid_options(error: impl std::fmt::Display) -> ExitCode {
    eprintln!("{} {}", "Opções inválidas:".red(), error);
    ExitCode::from(2)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = ComponentsConfig;

    let add_args = match args.command {
        Some(Command::Add(add_args)) => add_args,
        // No subcommand provided, default to add behavior (interactive mode)
        None => CliAddArgs::default(),
    };

    let code = run_add(&config, add_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    code
}
