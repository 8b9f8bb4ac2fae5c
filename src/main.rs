use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use pgplan::catalog::Catalog;
use pgplan::diff::PlanOptions;
use pgplan::topo::diagnostics::Severity;
use pgplan::topo::{analyze_and_sort, AnalyzeRequest};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two catalog snapshots into an ordered DDL plan
    Plan {
        /// JSON snapshot of the current catalog
        main: PathBuf,
        /// JSON snapshot of the desired catalog
        branch: PathBuf,
        /// Role that will execute the generated DDL
        #[arg(long, default_value = "postgres")]
        current_user: String,
        /// Emit the dependency-graph report as JSON instead of SQL
        #[arg(long)]
        report: bool,
    },
    /// Classify and order the statements of one or more .sql trees
    Analyze {
        /// Root directories (or files) to scan for .sql sources
        #[arg(required = true)]
        roots: Vec<PathBuf>,
        /// Emit the dependency-graph report as JSON instead of SQL
        #[arg(long)]
        report: bool,
    },
}

fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_catalog(path: &PathBuf) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse catalog snapshot {}", path.display()))
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Plan {
            main,
            branch,
            current_user,
            report,
        } => {
            let main_catalog = load_catalog(main)?;
            let branch_catalog = load_catalog(branch)?;
            let options = PlanOptions {
                current_user: current_user.clone(),
            };

            let plan = pgplan::plan(&main_catalog, &branch_catalog, &options);
            info!(
                statements = plan.statements.len(),
                diagnostics = plan.diagnostics.len(),
                "plan computed"
            );

            for diagnostic in &plan.diagnostics {
                let line = format!(
                    "{:?} {:?}: {}",
                    diagnostic.severity, diagnostic.code, diagnostic.message
                );
                match diagnostic.severity {
                    Severity::Error => eprintln!("error: {}", line),
                    Severity::Warning => eprintln!("warning: {}", line),
                    Severity::Info => {}
                }
            }

            if *report {
                println!("{}", serde_json::to_string_pretty(&plan.graph)?);
            } else {
                println!("{}", plan.sql());
            }
            Ok(plan.has_errors())
        }
        Commands::Analyze { roots, report } => {
            let result = analyze_and_sort(&AnalyzeRequest {
                roots: roots.clone(),
            });

            for diagnostic in &result.diagnostics {
                let location = diagnostic
                    .statement_id
                    .as_ref()
                    .map(|id| format!("{}: ", id))
                    .unwrap_or_default();
                match diagnostic.severity {
                    Severity::Error => {
                        eprintln!("error: {}{}", location, diagnostic.message)
                    }
                    Severity::Warning => {
                        eprintln!("warning: {}{}", location, diagnostic.message)
                    }
                    Severity::Info => {}
                }
            }

            if *report {
                println!("{}", serde_json::to_string_pretty(&result.graph)?);
            } else {
                let statements: Vec<&str> =
                    result.ordered.iter().map(|node| node.sql.as_str()).collect();
                if !statements.is_empty() {
                    println!("{};", statements.join(";\n"));
                }
            }
            Ok(result.has_errors())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(had_errors) => {
            if had_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::from(1)
        }
    }
}
