//! # Command Line Interface
//!
//! This module defines command line interface for binaries. `Clap` is used
//! for easy generation of help messages and handling arguments.

use crate::config::OracleConfig;
use crate::errors::OracleError;
use crate::utils;
use clap::{Parser, Subcommand};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Bootstrap a new oracle from the anchor file. Refuses to overwrite an
    /// existing snapshot.
    Init,
    /// Submit headers one by one on top of the tip, one hex header per line.
    SubmitHeader { file: PathBuf },
    /// Submit a batch of headers, one hex header per line, forking off a
    /// stored header.
    SubmitChain { file: PathBuf },
    /// Print the current tip and settlement watermark.
    Status,
}

/// Bitcoin header oracle for derivatives settlement.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    /// TOML formatted configuration file.
    #[arg(short, long, global = true)]
    pub config_file: Option<PathBuf>,
    /// Verbosity level, ranging from 0 (none) to 5 (highest)
    #[arg(short, long, default_value_t = 3, global = true)]
    pub verbose: u8,
}

/// Parse all the command line arguments.
fn parse() -> Result<Args, OracleError> {
    parse_from(env::args())
}

/// Parse given iterator. This is good for isolated environments, like tests.
pub fn parse_from<I, T>(itr: I) -> Result<Args, OracleError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(itr) {
        Ok(c) => Ok(c),
        Err(e) => Err(OracleError::ConfigError(e.to_string())),
    }
}

/// Picks the configuration: environment variables win if they are all set,
/// then the configuration file, then defaults.
pub fn get_configuration(args: &Args) -> Result<OracleConfig, OracleError> {
    match OracleConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                "All the environment variables are set. Using them instead of configuration file..."
            );
            return Ok(config);
        }
        Err(OracleError::EnvVarNotSet(name)) => {
            tracing::debug!("{name} is not set, using configuration file...");
        }
        Err(e) => return Err(e),
    }

    match &args.config_file {
        Some(path) => OracleConfig::try_parse_file(path.clone()),
        None => {
            tracing::info!("No configuration file is provided, using defaults");
            Ok(OracleConfig::default())
        }
    }
}

/// Gets configuration from CLI, for binaries. If there are any errors, prints
/// error and exits the program.
///
/// Steps:
///
/// 1. Get CLI arguments
/// 2. Initialize logger
/// 3. Get configuration, either from environment variables or configuration
///    file
pub fn get_configuration_from_cli() -> (OracleConfig, Args) {
    let args = match parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };

    if let Err(e) = utils::initialize_logger(utils::level_filter_from_verbosity(args.verbose)) {
        eprintln!("{e}");
        exit(1);
    }

    let config = match get_configuration(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Can't read configuration: {e}");
            exit(1);
        }
    };

    (config, args)
}
