mod presenter;

use clap::{Args, Parser, Subcommand};
use form_spec::{
    FormModel, OutputPaths, SAMPLE_DEFINITION, compile, output, parse_form, write_artifacts,
};
use presenter::{Presenter, Verbosity};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const OUTPUT_DIR_ENV: &str = "FORMC_OUTPUT_DIR";
const LOG_ENV: &str = "FORMC_LOG";
const DEFAULT_LOG_FILTER: &str = "formc=info";
const DEFAULT_SAMPLE_PATH: &str = "form.def";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form definition compiler",
    long_about = "Compiles a line-oriented form definition into an HTML form page and a typed answer schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a definition and write the HTML page and schema source.
    Build(BuildArgs),
    /// Compile in memory and report warnings without writing anything.
    Check {
        /// Form definition file, or `-` for stdin.
        #[arg(long, value_name = "INPUT")]
        input: PathBuf,
    },
    /// Print the parsed definition as JSON.
    Parse {
        /// Form definition file, or `-` for stdin.
        #[arg(long, value_name = "INPUT")]
        input: PathBuf,
    },
    /// Print the JSON Schema of the parsed-definition JSON.
    ModelSchema,
    /// Write a sample definition covering every element kind.
    Init {
        /// Destination file.
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SAMPLE_PATH)]
        out: PathBuf,
        /// Overwrite the file if present.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Form definition file, or `-` for stdin.
    #[arg(long, value_name = "INPUT")]
    input: PathBuf,
    /// Root directory for relative artifact paths (defaults to FORMC_OUTPUT_DIR or the current directory).
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// HTML document path.
    #[arg(long, value_name = "PATH", default_value = output::DEFAULT_HTML_PATH)]
    html: PathBuf,
    /// Generated schema source path.
    #[arg(long, value_name = "PATH", default_value = output::DEFAULT_SCHEMA_SOURCE_PATH)]
    schema_source: PathBuf,
    /// Also write the answer JSON Schema to this path.
    #[arg(long, value_name = "PATH")]
    json_schema: Option<PathBuf>,
    /// Overwrite existing artifacts.
    #[arg(long)]
    force: bool,
    /// Treat warnings as errors; nothing is written when there are any.
    #[arg(long)]
    strict: bool,
    /// Print the derived page metadata and answer fields.
    #[arg(long)]
    verbose: bool,
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => run_build(args),
        Command::Check { input } => run_check(&input),
        Command::Parse { input } => run_parse(&input),
        Command::ModelSchema => run_model_schema(),
        Command::Init { out, force } => run_init(&out, force),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_build(args: BuildArgs) -> CliResult<()> {
    let presenter = Presenter::new(Verbosity::from_verbose(args.verbose));
    let source = read_definition(&args.input)?;
    info!(input = %args.input.display(), "compiling form definition");
    let compilation = compile(&source)?;
    presenter.show_warnings(&compilation.warnings);
    if args.strict && !compilation.warnings.is_empty() {
        return Err(format!(
            "{} warning(s) in strict mode; no artifacts written",
            compilation.warnings.len()
        )
        .into());
    }
    presenter.show_summary(&compilation);

    let out_root = resolve_output_root(args.out)?;
    let paths = OutputPaths {
        html: out_root.join(&args.html),
        schema_source: out_root.join(&args.schema_source),
        json_schema: args.json_schema.map(|path| out_root.join(path)),
    };
    let report = write_artifacts(&compilation, &paths, args.force);
    presenter.show_report(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "{} artifact(s) could not be written",
            report.failures.len()
        )
        .into())
    }
}

fn run_check(input: &Path) -> CliResult<()> {
    let source = read_definition(input)?;
    let compilation = compile(&source)?;
    let presenter = Presenter::new(Verbosity::Verbose);
    presenter.show_warnings(&compilation.warnings);
    presenter.show_summary(&compilation);
    if compilation.warnings.is_empty() {
        println!("Definition is clean.");
        Ok(())
    } else {
        Err(format!("{} warning(s) found", compilation.warnings.len()).into())
    }
}

fn run_parse(input: &Path) -> CliResult<()> {
    let source = read_definition(input)?;
    let parsed = parse_form(&source);
    for warning in &parsed.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", serde_json::to_string_pretty(&parsed.model)?);
    Ok(())
}

fn run_model_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormModel);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_init(out: &Path, force: bool) -> CliResult<()> {
    if out.exists() && !force {
        return Err(format!(
            "{} already exists; rerun with --force to overwrite",
            out.display()
        )
        .into());
    }
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, SAMPLE_DEFINITION)?;
    println!("Wrote sample definition to {}", out.display());
    Ok(())
}

fn read_definition(input: &Path) -> CliResult<String> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err).into())
}

fn resolve_output_root(out: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match out {
        Some(path) => path,
        None => env::var_os(OUTPUT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("output directory cannot be empty".into());
    }
    Ok(candidate)
}
