//! CLI entry point for headergen.
//!
//! Commands: `init`, `config`, `model` and `fields`. Per-file failures are
//! reported through the output manager and mapped to exit codes; anything
//! else bubbles up as an `anyhow` error.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use headergen::io::{ExitCode, OutputFormat, OutputManager};
use headergen::parsing::HeaderParser;
use headergen::{HeaderError, Settings, pipeline};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// C++ header model builder and code synthesizer
#[derive(Parser)]
#[command(
    name = "headergen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Model C++ class headers and synthesize regeneration fields",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create .headergen/settings.toml with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    #[command(about = "Display active settings")]
    Config,

    #[command(about = "Print the semantic model of one header")]
    Model {
        /// Header file to model
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    #[command(
        about = "Synthesize regeneration fields for headers",
        after_help = "Examples:\n  headergen fields include/Widget.h\n  headergen fields include --json --threads 4"
    )]
    Fields {
        /// Header files or directories to walk
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Number of worker threads (overrides settings)
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load settings and start logging, or report why the settings are unusable
fn configure(config: Option<&Path>, verbose: bool) -> Option<Settings> {
    let loaded = match config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Configuration error loading from {}", path.display())),
        None => Settings::load().context("Configuration error"),
    };
    match loaded {
        Ok(settings) => {
            init_logging(verbose || settings.debug);
            Some(settings)
        }
        Err(e) => {
            eprintln!("{e:#}");
            None
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            init_logging(cli.verbose);
            let path = match Settings::init_config_file(force) {
                Ok(path) => path,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(ExitCode::ConfigError);
                }
            };
            if force {
                println!("Overwrote configuration at: {}", path.display());
            } else {
                println!("Created default configuration at: {}", path.display());
            }
            Ok(ExitCode::Success)
        }

        Commands::Config => {
            let Some(settings) = configure(config, cli.verbose) else {
                return Ok(ExitCode::ConfigError);
            };
            if let Err(warning) = Settings::check_init() {
                tracing::warn!("{warning}");
            }
            println!("{}", toml::to_string_pretty(&settings)?);
            Ok(ExitCode::Success)
        }

        Commands::Model { file, json } => {
            let Some(settings) = configure(config, cli.verbose) else {
                return Ok(ExitCode::ConfigError);
            };
            let mut output = OutputManager::new(
                OutputFormat::from_json_flag(json),
                settings.output.pretty_json,
            );
            let started = Instant::now();
            let mut parser = HeaderParser::new().map_err(HeaderError::from)?;
            let name = pipeline::display_name(&file);
            let code = match pipeline::model_file(&mut parser, &file) {
                Ok(model) => {
                    let elapsed = pipeline::elapsed_ms(started.elapsed());
                    output.success(&name, model, Some(elapsed))?
                }
                Err(e) => output.error(Some(&name), &e)?,
            };
            Ok(code)
        }

        Commands::Fields {
            paths,
            json,
            threads,
        } => {
            let Some(mut settings) = configure(config, cli.verbose) else {
                return Ok(ExitCode::ConfigError);
            };
            if let Some(threads) = threads {
                settings.parallel_threads = threads;
            }
            let mut output = OutputManager::new(
                OutputFormat::from_json_flag(json),
                settings.output.pretty_json,
            );

            let processed = pipeline::process_paths(&paths, &settings)?;
            if processed.is_empty() {
                output.info("No header files found")?;
            }
            for header in &processed {
                let name = pipeline::display_name(&header.path);
                match &header.result {
                    Ok(fields) => {
                        let elapsed = pipeline::elapsed_ms(header.elapsed);
                        output.success(&name, fields, Some(elapsed))?;
                    }
                    Err(e) => {
                        output.error(Some(&name), e)?;
                    }
                }
            }
            Ok(ExitCode::from_batch(
                processed.iter().map(|header| &header.result),
            ))
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<HeaderError>() {
                Some(error) => ExitCode::from_error(error),
                None => ExitCode::GeneralError,
            }
        }
    };
    std::process::exit(code.into());
}
