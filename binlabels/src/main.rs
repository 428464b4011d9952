//! Command-line tool for image label strings and the image label buildpack
//! steps.
//!
//! Usage: image-labels [OPTIONS] <COMMAND>
//!
//! Commands:
//!   parse [INPUT]    Parse a label string (defaults to $BP_IMAGE_LABELS)
//!       -t, --to <FORMAT>        Output format (text, toml, yaml) [default: text]
//!       -o, --output <FILE>      Write output to the given file
//!           --check              Only check the input, printing `ok`
//!   detect           Print the build plan if any label variable is set (exit 100 if none)
//!       -o, --output <FILE>      Write the plan to the given file
//!   build            Collect labels from the well-known variables and $BP_IMAGE_LABELS
//!           --buildpack <FILE>   buildpack.toml declaring the configurations
//!       -t, --to <FORMAT>        Output format (text, toml, yaml) [default: text]
//!       -o, --output <FILE>      Write output to the given file
//!
//! Options:
//!   -v, --verbose    Log parser and configuration details
//!   -h, --help       Print help
//!   -V, --version    Print version

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use liblabels::oci::IMAGE_LABELS;
use liblabels::{
    build, detect, parse_labels, BuildError, BuildResult, Buildpack, Environment,
    ProcessEnvironment,
};
use tracing::Level;

mod render;

use render::Format;

#[derive(Parser, Debug)]
#[command(
    name = "image-labels",
    version,
    about = "Parse image label strings and run the image label buildpack steps"
)]
struct Cli {
    /// Log parser and configuration details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a label string (defaults to $BP_IMAGE_LABELS)
    Parse {
        /// Label string, e.g. `key=value other="two words"`
        input: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        to: Format,

        /// Write output to the given file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only check the input (exit 0 if valid, 1 if invalid)
        #[arg(long)]
        check: bool,
    },

    /// Print the build plan if any label variable is set (exit 100 if none)
    Detect {
        /// Write the plan to the given file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collect labels from the well-known variables and $BP_IMAGE_LABELS
    Build {
        /// buildpack.toml declaring the buildpack's configurations
        #[arg(long)]
        buildpack: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        to: Format,

        /// Write output to the given file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Command::Parse {
            input,
            to,
            output,
            check,
        } => run_parse(input, to, output.as_deref(), check),
        Command::Detect { output } => run_detect(output.as_deref()),
        Command::Build {
            buildpack,
            to,
            output,
        } => run_build(buildpack.as_deref(), to, output.as_deref()),
    }
}

fn run_parse(input: Option<String>, to: Format, output: Option<&Path>, check: bool) -> ExitCode {
    let input = match input.or_else(|| ProcessEnvironment.lookup(IMAGE_LABELS)) {
        Some(input) => input,
        None => {
            eprintln!("Error: no input given and ${} is not set", IMAGE_LABELS);
            return ExitCode::FAILURE;
        }
    };

    let labels = match parse_labels(&input) {
        Ok(labels) => labels,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if check {
        println!("ok");
        return ExitCode::SUCCESS;
    }

    render_and_write(&BuildResult::from(labels), to, output)
}

fn run_detect(output: Option<&Path>) -> ExitCode {
    let result = detect(&ProcessEnvironment);
    if result.passed() {
        if let Err(code) = write_output(&result.plan_toml(), output) {
            return code;
        }
    } else {
        eprintln!(
            "No label variables set (${} or one of the $BP_OCI_* variables)",
            IMAGE_LABELS
        );
    }
    ExitCode::from(result.exit_code())
}

fn run_build(buildpack: Option<&Path>, to: Format, output: Option<&Path>) -> ExitCode {
    match collect_labels(buildpack, &ProcessEnvironment) {
        Ok(result) => render_and_write(&result, to, output),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load `buildpack` (or the built-in metadata) and run the build step.
fn collect_labels(
    buildpack: Option<&Path>,
    env: &dyn Environment,
) -> Result<BuildResult, BuildError> {
    let buildpack = match buildpack {
        Some(path) => Buildpack::load(path)?,
        None => Buildpack::builtin(),
    };
    build(&buildpack, env)
}

fn render_and_write(result: &BuildResult, to: Format, output: Option<&Path>) -> ExitCode {
    let rendered = match render::render(result, to) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match write_output(&rendered, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

fn write_output(output: &str, path: Option<&Path>) -> Result<(), ExitCode> {
    match path {
        Some(path) => fs::write(path, output).map_err(|e| {
            eprintln!("Error writing {}: {}", path.display(), e);
            ExitCode::FAILURE
        }),
        None => {
            print!("{}", output);
            // Ensure non-empty output ends with newline
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
