use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use cellatlas_search::app::App;
use cellatlas_search::config::{ConfigLoader, ResolvedConfig};
use cellatlas_search::corpus::Session;
use cellatlas_search::domain::{ClauseSpecifier, CombineMode, MatchMode};
use cellatlas_search::error::AtlasError;
use cellatlas_search::output::{JsonOutput, OutputMode, TextOutput};
use cellatlas_search::query::Query;
use cellatlas_search::store::Store;

#[derive(Parser)]
#[command(name = "cellatlas")]
#[command(about = "Search single-cell atlas project metadata by field and value")]
#[command(version, author)]
struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Corpus file (JSON mapping of project id to metadata document).
    #[arg(long, global = true)]
    corpus: Option<String>,

    /// Config file with defaults and saved queries (default: ./cellatlas.json).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search projects; repeat a field to match any of several values")]
    Search(SearchArgs),
    #[command(about = "Run saved queries from the config file")]
    Run(RunArgs),
    #[command(about = "List searchable fields, or the known values of one field")]
    Fields(FieldsArgs),
    #[command(about = "Show every field/value pair of a project")]
    Show(ProjectArgs),
    #[command(about = "List the AnnData files a project offers for download")]
    Files(ProjectArgs),
    #[command(about = "Write the field catalog to a JSON file")]
    Export(ExportArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE", required = true)]
    clauses: Vec<String>,

    #[arg(long)]
    combine: Option<CombineMode>,

    #[arg(long = "match")]
    match_mode: Option<MatchMode>,
}

#[derive(Args)]
struct RunArgs {
    name: Option<String>,
}

#[derive(Args)]
struct FieldsArgs {
    #[arg(long)]
    field: Option<String>,
}

#[derive(Args)]
struct ProjectArgs {
    project: String,
}

#[derive(Args)]
struct ExportArgs {
    path: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<AtlasError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AtlasError) -> u8 {
    match error {
        AtlasError::InvalidArgument { .. }
        | AtlasError::InvalidClause(_)
        | AtlasError::MissingConfig
        | AtlasError::ProjectNotFound(_)
        | AtlasError::QueryNotFound(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let config = match &cli.command {
        Commands::Run(_) => ConfigLoader::resolve(cli.config.as_deref()),
        _ => ConfigLoader::resolve_or_default(cli.config.as_deref()),
    }?;

    let store = Store::new()?;
    let corpus_path = store.resolve_corpus_path(cli.corpus.as_deref(), config.corpus.as_deref());
    let app = App::new(Session::load(&corpus_path)?);

    match cli.command {
        Commands::Search(args) => run_search(args, &app, &config, output_mode),
        Commands::Run(args) => run_saved(args, &app, &config, output_mode),
        Commands::Fields(args) => run_fields(args, &app, output_mode),
        Commands::Show(args) => run_show(args, &app, output_mode),
        Commands::Files(args) => run_files(args, &app, output_mode),
        Commands::Export(args) => run_export(args, &app, output_mode),
    }
}

fn run_search(
    args: SearchArgs,
    app: &App,
    config: &ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let query = args
        .clauses
        .iter()
        .map(|clause| clause.parse::<ClauseSpecifier>())
        .collect::<Result<Query, AtlasError>>()?;
    let combine = args.combine.unwrap_or(config.combine);
    let match_mode = args.match_mode.unwrap_or(config.match_mode);

    let result = app.search(query, combine, match_mode);
    match output_mode {
        OutputMode::Json => JsonOutput::print_search(&result).into_diagnostic(),
        OutputMode::Text => TextOutput::print_search(&result).into_diagnostic(),
    }
}

fn run_saved(
    args: RunArgs,
    app: &App,
    config: &ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let result = match args.name {
        Some(name) => {
            let saved = config.query(&name)?;
            app.run_saved(std::slice::from_ref(saved))
        }
        None => app.run_saved(&config.queries),
    };
    match output_mode {
        OutputMode::Json => JsonOutput::print_run(&result).into_diagnostic(),
        OutputMode::Text => TextOutput::print_run(&result).into_diagnostic(),
    }
}

fn run_fields(args: FieldsArgs, app: &App, output_mode: OutputMode) -> miette::Result<()> {
    match args.field {
        Some(field) => {
            let result = app.values(&field);
            match output_mode {
                OutputMode::Json => JsonOutput::print_values(&result).into_diagnostic(),
                OutputMode::Text => TextOutput::print_values(&result).into_diagnostic(),
            }
        }
        None => {
            let result = app.fields();
            match output_mode {
                OutputMode::Json => JsonOutput::print_fields(&result).into_diagnostic(),
                OutputMode::Text => TextOutput::print_fields(&result).into_diagnostic(),
            }
        }
    }
}

fn run_show(args: ProjectArgs, app: &App, output_mode: OutputMode) -> miette::Result<()> {
    let result = app.show(&args.project)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_show(&result).into_diagnostic(),
        OutputMode::Text => TextOutput::print_show(&result).into_diagnostic(),
    }
}

fn run_files(args: ProjectArgs, app: &App, output_mode: OutputMode) -> miette::Result<()> {
    let result = app.files(&args.project)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_files(&result).into_diagnostic(),
        OutputMode::Text => TextOutput::print_files(&result).into_diagnostic(),
    }
}

fn run_export(args: ExportArgs, app: &App, output_mode: OutputMode) -> miette::Result<()> {
    let path = Utf8PathBuf::from(args.path);
    let result = app.export_catalog(&path)?;
    match output_mode {
        OutputMode::Json => JsonOutput::print_export(&result).into_diagnostic(),
        OutputMode::Text => TextOutput::print_export(&result).into_diagnostic(),
    }
}
