use std::{fs::read_to_string, path::PathBuf, process, time::Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use jam::{
    config::{CheckPolicy, Config},
    parse_source, render_error, run_source,
};
use tracing::{debug, Level};

#[derive(Debug, Parser)]
#[command(name = "jam", version, about = "Runs JAM scripts")]
struct Cli {
    /// Script to run
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run the given source text instead of a file
    #[arg(short, long, value_name = "SOURCE")]
    eval: Option<String>,

    /// Execute even when the checker reports errors
    #[arg(long)]
    lenient: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long, value_name = "N")]
    max_call_depth: Option<usize>,

    #[arg(long, value_name = "N")]
    max_nesting_depth: Option<usize>,

    /// Print the parsed program and exit
    #[arg(long)]
    print_ast: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default().with_echo_output(true);

        if self.lenient {
            config = config.with_check_policy(CheckPolicy::Lenient);
        }
        if let Some(depth) = self.max_call_depth {
            config = config.with_max_call_depth(depth);
        }
        if let Some(depth) = self.max_nesting_depth {
            config = config.with_max_nesting_depth(depth);
        }

        config
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (source, file_name) = match (&cli.eval, &cli.file) {
        (Some(source), _) => (source.clone(), String::from("<eval>")),
        (None, Some(path)) => {
            let source = read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (source, file_name)
        }
        (None, None) => bail!("no script given"),
    };

    let config = cli.config();

    if cli.print_ast {
        match parse_source(&source, &config) {
            Ok(program) => {
                println!("{:#?}", program);
                return Ok(());
            }
            Err(err) => {
                eprint!("{}", render_error(&err, &source, &file_name));
                bail!("{} failed to parse", file_name);
            }
        }
    }

    let start = Instant::now();
    let report = run_source(&source, &config);
    debug!(elapsed = ?start.elapsed(), "finished");

    for diagnostic in &report.diagnostics {
        eprintln!("{}: {}", file_name, diagnostic);
    }

    match &report.error {
        Some(err) => {
            eprint!("{}", render_error(err, &source, &file_name));
            bail!("{} failed with {}", file_name, err.get_error_name())
        }
        None => Ok(()),
    }
}
