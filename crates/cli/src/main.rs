use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use engine_config::{
    report::summary::ExecutionReport,
    settings::{ExecutionSettings, FailurePolicy},
};
use engine_core::{
    bulk::BulkPlan,
    chain::CommandChain,
    connection::{Connection, DryRunConnection},
    registry::CommandRegistry,
    sink::{Content, FileSink, OutputSink},
};
use model::{
    catalog::{Catalog, table::TableType},
    execution::{
        command::CommandSpec,
        format::{Destination, OutputFormat},
    },
};
use planner::{operation::Operation, statement::dialect::by_name};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "catalog-chain",
    version = "0.1.0",
    about = "Run commands and bulk statements over a crawled database catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<ExitCode, CliError> {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chain {
            catalog,
            steps,
            settings,
            continue_on_error,
            preflight,
            dry_run,
            report,
        } => {
            let catalog = Catalog::load(&catalog)?;
            let mut settings = load_settings(settings.as_deref())?;
            if continue_on_error {
                settings = settings.with_failure_policy(FailurePolicy::Continue);
            }
            if preflight {
                settings = settings.with_preflight(true);
            }
            run_chain(&catalog, steps, settings, dry_run, report.as_deref())
        }
        Commands::Bulk {
            catalog,
            operation,
            template,
            schema,
            table_type,
            order,
            dialect,
            settings,
            continue_on_error,
            output,
            report,
        } => {
            let catalog = Catalog::load(&catalog)?;
            let mut settings = load_settings(settings.as_deref())?;
            if continue_on_error {
                settings = settings.with_failure_policy(FailurePolicy::Continue);
            }
            if let Some(order) = order {
                settings = settings.with_ordering(order);
            }

            let operation = parse_operation(&operation, template)?;
            let mut plan = BulkPlan::new(operation)?
                .with_dialect(by_name(&dialect)?)
                .with_settings(settings)
                .with_table_types(table_type.into_iter().map(TableType::from).collect());
            if let Some(schema) = schema {
                plan = plan.with_schema(schema);
            }
            run_bulk(&catalog, &plan, output, report.as_deref())
        }
        Commands::Commands => {
            list_commands(&CommandRegistry::with_builtins());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info { catalog } => {
            let catalog = Catalog::load(&catalog)?;
            println!("{}", catalog.crawl_info());
            println!("{:<16} {}", "Schemas", catalog.schema_count());
            println!("{:<16} {}", "Tables", catalog.table_count());
            println!("{:<16} {}", "Relationships", catalog.relationship_count());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<ExecutionSettings, CliError> {
    match path {
        Some(path) => Ok(ExecutionSettings::from_file(path)?),
        None => Ok(ExecutionSettings::default()),
    }
}

fn parse_operation(name: &str, template: Option<String>) -> Result<Operation, CliError> {
    match (name, template) {
        ("query", Some(template)) => Ok(Operation::query_over("query", template)),
        ("query", None) => Err(CliError::MissingTemplate),
        (name, _) => Ok(name.parse()?),
    }
}

fn run_chain(
    catalog: &Catalog,
    steps: Vec<CommandSpec>,
    settings: ExecutionSettings,
    dry_run: bool,
    report_path: Option<&Path>,
) -> Result<ExitCode, CliError> {
    let registry = Arc::new(CommandRegistry::with_builtins());
    let mut chain = CommandChain::new(registry, Arc::new(FileSink::new())).with_settings(settings);
    for spec in steps {
        chain.add(spec)?;
    }

    let mut dry_run_conn = DryRunConnection::new();
    let connection: Option<&mut dyn Connection> = if dry_run {
        Some(&mut dry_run_conn)
    } else {
        None
    };

    let report = chain.execute(catalog, connection)?;
    finish(&report, report_path)
}

fn run_bulk(
    catalog: &Catalog,
    plan: &BulkPlan,
    output: Option<PathBuf>,
    report_path: Option<&Path>,
) -> Result<ExitCode, CliError> {
    let mut connection = DryRunConnection::new();
    let report = plan.execute(catalog, &mut connection)?;

    let destination = output.map(Destination::File).unwrap_or(Destination::Stdout);
    FileSink::new().write(
        &destination,
        OutputFormat::Text,
        &Content::Text(connection.script()),
    )?;
    info!(
        "{} statement(s) written to {}",
        connection.statements().len(),
        destination
    );

    finish(&report, report_path)
}

fn finish(
    report: &ExecutionReport,
    report_path: Option<&Path>,
) -> Result<ExitCode, CliError> {
    match report_path {
        Some(path) => output::write_report(report, path)?,
        None => output::print_report(report),
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn list_commands(registry: &CommandRegistry) {
    println!("{:<12} {:<16} {:<11} Description", "Command", "Formats", "Connection");
    println!("-----------------------------");
    for (id, command) in registry.iter() {
        let formats = command
            .supported_formats()
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let connection = if command.uses_connection() { "required" } else { "-" };
        println!(
            "{:<12} {:<16} {:<11} {}",
            id.as_str(),
            formats,
            connection,
            command.description()
        );
    }
}
