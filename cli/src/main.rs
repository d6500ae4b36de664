use std::fs;
use std::path::{Path, PathBuf};

use boa_core::{CommandTable, ParserConfig, ResultSet, parse_loaded};
use boa_help::output::{OutputFormat, format_result, format_table};
use boa_help::{from_help_with_config, scan_help};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when the arguments produced parse errors.
const EXIT_PARSE_ERRORS: i32 = 2;
/// Exit status for I/O, configuration and table load failures.
const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "boa")]
#[command(version)]
#[command(about = "Parse argument vectors against declarative command tables")]
struct Cli {
    /// YAML parser configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Emit debug logging on stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments against a JSON or YAML command table.
    Table(TableArgs),
    /// Parse arguments against a structured help document.
    HelpDoc(HelpDocArgs),
    /// Scan a help document and print the command table it declares.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Command table file (.json, .yaml or .yml).
    file: PathBuf,
    /// Output format for the result set.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Arguments to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpDocArgs {
    /// Help document file.
    file: PathBuf,
    /// Output format for the result set.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
    /// Arguments to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Help document file.
    file: PathBuf,
    /// Output format for the command table.
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    ParseErrors,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Table(args) => run_table(args, &config),
        Command::HelpDoc(args) => run_help_doc(args, &config),
        Command::Scan(args) => run_scan(args),
    });

    match result {
        Ok(Outcome::Clean) => {}
        Ok(Outcome::ParseErrors) => std::process::exit(EXIT_PARSE_ERRORS),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ParserConfig, String> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };
    debug!(path = %path.display(), "Loading parser configuration");
    ParserConfig::load(path).map_err(|e| format!("Failed to load {}: {e}", path.display()))
}

fn run_table(args: TableArgs, config: &ParserConfig) -> Result<Outcome, String> {
    let contents = read_file(&args.file)?;
    let loaded = if is_yaml(&args.file) {
        CommandTable::from_yaml_with(&contents, &config.app_data_name)
    } else {
        CommandTable::from_json_with(contents.as_bytes(), &config.app_data_name)
    }
    .map_err(|e| format!("Failed to load {}: {e}", args.file.display()))?;

    debug!(items = loaded.table.len(), args = args.args.len(), "Parsing against command table");
    let result = parse_loaded(loaded, &args.args, config);
    print_result(&result, args.format)
}

fn run_help_doc(args: HelpDocArgs, config: &ParserConfig) -> Result<Outcome, String> {
    let text = read_file(&args.file)?;
    let result = from_help_with_config(&text, &args.args, config);
    print_result(&result, args.format)
}

fn run_scan(args: ScanArgs) -> Result<Outcome, String> {
    let text = read_file(&args.file)?;
    let scanned = scan_help(&text).map_err(|e| format!("{}: {e}", args.file.display()))?;

    for warning in &scanned.warnings {
        eprintln!("warning: {warning}");
    }
    print!("{}", format_table(&scanned.app, &scanned.table, args.format)?);

    if scanned.warnings.is_empty() {
        Ok(Outcome::Clean)
    } else {
        Ok(Outcome::ParseErrors)
    }
}

fn print_result(result: &ResultSet, format: OutputFormat) -> Result<Outcome, String> {
    let rendered = format_result(result, format)?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }

    if result.has_errors() {
        Ok(Outcome::ParseErrors)
    } else {
        Ok(Outcome::Clean)
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_args_keep_hyphens() {
        let cli = Cli::try_parse_from(["boa", "table", "t.json", "--", "-v", "--count", "3"])
            .expect("arguments should parse");
        let Command::Table(args) = cli.command else {
            panic!("expected table command");
        };
        assert_eq!(args.args, vec!["-v", "--count", "3"]);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_options_follow_subcommand() {
        let cli = Cli::try_parse_from(["boa", "scan", "help.txt", "--verbose", "--config", "c.yaml"])
            .expect("arguments should parse");
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
    }

    #[test]
    fn test_yaml_detection_by_extension() {
        assert!(is_yaml(Path::new("table.yaml")));
        assert!(is_yaml(Path::new("TABLE.YML")));
        assert!(!is_yaml(Path::new("table.json")));
        assert!(!is_yaml(Path::new("table")));
    }
}
