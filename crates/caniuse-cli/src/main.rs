//! Binary entrypoint for the caniuse CLI.
//!
//! Acts as the host for the lookup engine: each argument line (or each stdin
//! line) is one input event.
mod report;

use caniuse_css::{Engine, EngineConfig, PolicyKind};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing::Level;

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", help_text());
            return;
        }
        Ok(Command::Version) => {
            println!("caniuse {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Ok(Command::Run(args)) => args,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let engine = Engine::load(&config)?;
    let format = if args.json { report::Format::Json } else { report::Format::Text };

    match args.input {
        Some(line) => println!("{}", report::render(&engine.lookup(&line), format)?),
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                tracing::info!("reading lines from stdin, one lookup per line");
            }
            for line in stdin.lock().lines() {
                let line = line?;
                println!("{}", report::render(&engine.lookup(&line), format)?);
            }
        }
    }

    Ok(())
}

/// Merge config file, environment and flags (flags win)
fn build_config(args: &CliArgs) -> Result<EngineConfig, caniuse_css::ConfigError> {
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("CANIUSE_CONFIG").map(PathBuf::from));

    let mut config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(path) = std::env::var_os("CANIUSE_DATA") {
        config.dataset_path = PathBuf::from(path);
    }
    if let Some(path) = &args.data {
        config.dataset_path = path.clone();
    }
    if let Some(policy) = args.policy {
        config.support_policy = policy;
    }

    Ok(config)
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(CliArgs),
    Help,
    Version,
}

#[derive(Debug, PartialEq)]
struct CliArgs {
    input: Option<String>,
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    policy: Option<PolicyKind>,
    json: bool,
    log_level: Level,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input: None,
            data: None,
            config: None,
            policy: None,
            json: false,
            log_level: Level::WARN,
        }
    }
}

fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--json" => parsed.json = true,
            "-v" | "--verbose" => parsed.log_level = Level::DEBUG,
            "-q" | "--quiet" => parsed.log_level = Level::ERROR,
            "-d" | "--data" => {
                let value = args.next().ok_or_else(|| "error: --data expects a value".to_string())?;
                parsed.data = Some(PathBuf::from(value));
            }
            "-c" | "--config" => {
                let value = args.next().ok_or_else(|| "error: --config expects a value".to_string())?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--policy" => {
                let value = args.next().ok_or_else(|| "error: --policy expects a value".to_string())?;
                parsed.policy = Some(parse_policy(&value)?);
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                parsed.input = Some(rest);
                break;
            }
            _ if arg.starts_with("--data=") => {
                parsed.data = Some(PathBuf::from(arg.trim_start_matches("--data=")));
            }
            _ if arg.starts_with("--config=") => {
                parsed.config = Some(PathBuf::from(arg.trim_start_matches("--config=")));
            }
            _ if arg.starts_with("--policy=") => {
                parsed.policy = Some(parse_policy(arg.trim_start_matches("--policy="))?);
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'\n\n{}", help_text()));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args.by_ref()).collect::<Vec<_>>().join(" ");
                parsed.input = Some(rest);
                break;
            }
        }
    }

    Ok(Command::Run(parsed))
}

fn parse_policy(value: &str) -> Result<PolicyKind, String> {
    value.parse().map_err(|err| format!("error: {err}"))
}

fn help_text() -> String {
    format!(
        "caniuse {version}

Look up browser support for the CSS attribute on a line.

Usage:
  caniuse [OPTIONS] [--] <line...>
  caniuse [OPTIONS] < lines.txt

Options:
  -d, --data <path>      Dataset file. Default: {default_data}
                         (or $CANIUSE_DATA)
  -c, --config <path>    YAML configuration file (or $CANIUSE_CONFIG).
  --policy <name>        Support policy: full, partial or unprefixed.
  --json                 Print one JSON object per lookup.
  -v, --verbose          Debug logging on stderr.
  -q, --quiet            Only log errors.
  -h, --help             Show this help message.
  -V, --version          Print version information.

Exit codes:
  0  Success.
  1  Dataset or configuration error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        default_data = caniuse_css::config::DEFAULT_DATASET_PATH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(list: &[&str]) -> CliArgs {
        match parse_args(args(list)).unwrap() {
            Command::Run(parsed) => parsed,
            other => panic!("Expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_line() {
        let parsed = run_args(&["flex-wrap:", "wrap;"]);
        assert_eq!(parsed.input.as_deref(), Some("flex-wrap: wrap;"));
        assert!(!parsed.json);
    }

    #[test]
    fn test_no_line_reads_stdin() {
        assert_eq!(run_args(&[]).input, None);
    }

    #[test]
    fn test_options() {
        let parsed = run_args(&["--json", "-d", "data.json", "--policy=partial", "-v", "--", "-webkit-x"]);
        assert!(parsed.json);
        assert_eq!(parsed.data, Some(PathBuf::from("data.json")));
        assert_eq!(parsed.policy, Some(PolicyKind::Partial));
        assert_eq!(parsed.log_level, Level::DEBUG);
        assert_eq!(parsed.input.as_deref(), Some("-webkit-x"));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(args(&["--help"])).unwrap(), Command::Help);
        assert_eq!(parse_args(args(&["-V"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(args(&["--data"])).unwrap_err().contains("--data expects a value"));
        assert!(parse_args(args(&["--policy", "strict"])).unwrap_err().contains("strict"));
        assert!(parse_args(args(&["--bogus"])).unwrap_err().contains("unknown option '--bogus'"));
    }

    #[test]
    fn test_flags_override_config() {
        let parsed = run_args(&["--data", "/tmp/other.json", "--policy", "unprefixed"]);
        let config = build_config(&parsed).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.support_policy, PolicyKind::Unprefixed);
    }
}
