use std::path::PathBuf;
use std::process;

mod cli;
mod error;
mod exit_codes;
mod loader;
mod report;

use cli::{Cli, Commands};
use error::{CliError, CliResult};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use flowsight::{build_graph, merge};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    use tracing::Level;
    let log_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();

    let result = match cli.command {
        Commands::Render {
            files,
            output,
            pretty,
        } => run_render(files, output, pretty).await,
        Commands::Validate { file } => run_validate(file, cli.quiet).await,
        Commands::Report { files } => run_report(files).await,
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{}", error.full_chain());
            error.exit_code
        }
    };
    process::exit(exit_code);
}

async fn run_render(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
) -> CliResult<i32> {
    let (definition, trace) = loader::load_pair(&files)
        .await
        .map_err(CliError::validation)?;

    if let Err(findings) = definition.validate_structure() {
        for finding in &findings {
            tracing::warn!("{}", finding);
        }
    }

    let graph = build_graph(&definition, trace.as_ref()).map_err(CliError::validation)?;

    let json = if pretty {
        serde_json::to_string_pretty(&graph)
    } else {
        serde_json::to_string(&graph)
    }
    .map_err(CliError::general)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .map_err(CliError::general)?;
            tracing::info!(path = %path.display(), "wrote graph");
        }
        None => println!("{}", json),
    }
    Ok(EXIT_SUCCESS)
}

async fn run_validate(file: PathBuf, quiet: bool) -> CliResult<i32> {
    let document = loader::load_document(&file).await.map_err(CliError::validation)?;
    if document.kind != loader::DocumentKind::Definition {
        return Err(CliError::new(
            format!("{} is not a workflow definition", file.display()),
            EXIT_ERROR,
        ));
    }

    let definition: flowsight::WorkflowDefinition =
        serde_json::from_value(document.value).map_err(CliError::validation)?;

    match definition.validate_structure() {
        Ok(()) => {
            report::print_validation(&file, &[], quiet);
            Ok(EXIT_SUCCESS)
        }
        Err(findings) => {
            report::print_validation(&file, &findings, quiet);
            Ok(EXIT_ERROR)
        }
    }
}

async fn run_report(files: Vec<PathBuf>) -> CliResult<i32> {
    let (definition, trace) = loader::load_pair(&files)
        .await
        .map_err(CliError::validation)?;

    let unified = merge(&definition, trace.as_ref());
    print!("{}", report::execution_report(&definition, &unified));

    let unhandled = unified
        .iter()
        .any(|s| s.has_error && flowsight::resolve_handler(s).is_none());
    if unhandled {
        return Ok(EXIT_WARNING);
    }
    Ok(EXIT_SUCCESS)
}
