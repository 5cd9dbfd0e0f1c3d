use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flowgate::error::Diagnostic;
use flowgate::model::{Node, NodeKind};
use flowgate::parse::{self, ConnectionRequest, ProcessDefinition};
use flowgate::validate::{self, ValidateOptions};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Parse(String),
    #[error("node '{0}' is not part of the process definition")]
    UnknownNode(String),
    #[error("node '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },
}

/// Topology admission checks for process definitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a whole process definition before simulation
    Check {
        /// Path to the process definition JSON file
        path: PathBuf,
        /// JSON file with validation options (exemptKinds, checkPorts, recheckConnections)
        #[arg(long)]
        options: Option<PathBuf>,
        /// Node kind that need not declare an element (repeatable)
        #[arg(long = "exempt")]
        exempt: Vec<NodeKind>,
        /// Require every edge handle to name a port of its node
        #[arg(long)]
        check_ports: bool,
        /// Re-run the pairwise rules over every existing edge
        #[arg(long)]
        recheck_connections: bool,
        /// Print the report as JSON instead of one line per error
        #[arg(long)]
        json: bool,
    },
    /// Check whether an edge between two nodes of a definition would be admitted
    Connect {
        /// Path to the process definition JSON file
        path: PathBuf,
        /// Source node id
        from: String,
        /// Target node id
        to: String,
        #[arg(long)]
        source_handle: Option<String>,
        #[arg(long)]
        target_handle: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the checked input was admitted.
fn run(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Check {
            path,
            options,
            exempt,
            check_ports,
            recheck_connections,
            json,
        } => {
            let definition = load_definition(&path)?;
            let mut options = match options {
                Some(options_path) => load_options(&options_path)?,
                None => ValidateOptions::default(),
            };
            options.exempt_kinds.extend(exempt);
            options.check_ports |= check_ports;
            options.recheck_connections |= recheck_connections;
            debug!(?options, "validation options");

            let report = validate::validate_process_definition(&definition, &options);
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::Parse(e.to_string()))?;
                println!("{}", out);
            } else if report.valid {
                println!(
                    "{}: valid ({} nodes, {} edges)",
                    path.display(),
                    definition.nodes.len(),
                    definition.edges.len()
                );
            } else {
                for error in &report.errors {
                    println!("{}", error);
                }
                println!("{}: {} error(s)", path.display(), report.errors.len());
            }
            Ok(report.valid)
        }
        Commands::Connect {
            path,
            from,
            to,
            source_handle,
            target_handle,
        } => {
            let definition = load_definition(&path)?;
            let source = find_node(&definition, &from)?;
            let target = find_node(&definition, &to)?;
            let request = ConnectionRequest::between(&from, &to)
                .with_handles(source_handle.as_deref(), target_handle.as_deref());

            match validate::validate_connection(&source, &target, &request) {
                Ok(()) => {
                    info!(%from, %to, "connection admitted");
                    println!("{} -> {}: accepted", from, to);
                    Ok(true)
                }
                Err(rejection) => {
                    println!("{}", Diagnostic::connection(rejection));
                    Ok(false)
                }
            }
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_definition(path: &Path) -> Result<ProcessDefinition, CliError> {
    let json = read(path)?;
    parse::parse(&json).map_err(|errors| {
        CliError::Parse(
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    })
}

fn load_options(path: &Path) -> Result<ValidateOptions, CliError> {
    let json = read(path)?;
    serde_json::from_str(&json).map_err(|e| {
        CliError::Parse(format!(
            "Failed to parse validation options {}: {}",
            path.display(),
            e
        ))
    })
}

fn find_node(definition: &ProcessDefinition, id: &str) -> Result<Node, CliError> {
    let record = definition
        .nodes
        .iter()
        .find(|n| n.id.as_deref() == Some(id))
        .ok_or_else(|| CliError::UnknownNode(id.to_string()))?;
    Node::from_record(record).map_err(|e| CliError::Malformed {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
