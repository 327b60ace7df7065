use clap::Subcommand;
use engine_config::settings::OrderingKind;
use model::execution::command::CommandSpec;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run catalog commands one after the other, stopping at the first failure
    Chain {
        #[arg(long, help = "Catalog snapshot (JSON) path")]
        catalog: PathBuf,

        #[arg(
            long = "step",
            required = true,
            help = "Step as <command>:<format>:<destination>, repeatable; `-` writes to stdout"
        )]
        steps: Vec<CommandSpec>,

        #[arg(long, help = "Execution settings file (JSON)")]
        settings: Option<PathBuf>,

        #[arg(long, help = "Keep running the remaining steps after a failure")]
        continue_on_error: bool,

        #[arg(long, help = "Resolve every step and check its format before running any")]
        preflight: bool,

        #[arg(
            long,
            help = "Record statements on a dry-run connection for commands that need one"
        )]
        dry_run: bool,

        #[arg(long, help = "If specified, writes the JSON report to this file")]
        report: Option<PathBuf>,
    },
    /// Apply one statement template to every table and print the resulting script
    Bulk {
        #[arg(long, help = "Catalog snapshot (JSON) path")]
        catalog: PathBuf,

        /// count, drop, truncate, dump, or query (with --template)
        #[arg(long)]
        operation: String,

        #[arg(
            long,
            help = "Statement template for `query`, e.g. \"ANALYZE ${table}\""
        )]
        template: Option<String>,

        #[arg(long, help = "Only tables in this schema")]
        schema: Option<String>,

        #[arg(long, help = "Only tables of this type, e.g. TABLE or VIEW")]
        table_type: Vec<String>,

        /// crawl, reverse, or dependency
        #[arg(long)]
        order: Option<OrderingKind>,

        /// ansi, postgres, mysql, or none
        #[arg(long, default_value = "ansi")]
        dialect: String,

        #[arg(long, help = "Execution settings file (JSON)")]
        settings: Option<PathBuf>,

        #[arg(long, help = "Keep going after a failed table")]
        continue_on_error: bool,

        #[arg(long, help = "If specified, writes the statement script to this file")]
        output: Option<PathBuf>,

        #[arg(long, help = "If specified, writes the JSON report to this file")]
        report: Option<PathBuf>,
    },
    /// List the registered commands
    Commands,
    /// Show crawl metadata and entity counts of a catalog snapshot
    Info {
        #[arg(long, help = "Catalog snapshot (JSON) path")]
        catalog: PathBuf,
    },
}
