//! The command-line arguments and configuration system for [crate::run] and the `fakegen`
//! binary.

use clap::Parser;
use config::FileFormat::Toml;
use directories::ProjectDirs;
use fakegen_core::config::Config;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line arguments for the `fakegen` binary.
#[derive(Debug, Parser)]
#[command(name = "fakegen")]
#[command(about = "Generate fff.h fakes for the functions of a C header", long_about = None)]
pub struct Args {
    /// Set a configuration value; format $NAME=$VALUE.
    #[arg(long, short)]
    pub config: Vec<String>,

    /// Header to fake (or a JSON scan result with --scan-json).
    // Should always be present unless using a flag like --print-config-path
    pub input: Option<PathBuf>,

    /// File to write the fakes to. Defaults to standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Header to include from the generated file, if it is not the input.
    #[arg(long, value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// File name the include guard is derived from.
    #[arg(long, value_name = "NAME")]
    pub fake_name: Option<String>,

    /// Write only the fakes, without includes or include guard.
    #[arg(long)]
    pub bare: bool,

    /// Leave out the include guard (the includes are still written).
    #[arg(long)]
    pub no_include_guard: bool,

    /// Fail if function names would collide after bypassing definitions.
    #[arg(long)]
    pub strict_names: bool,

    /// Read the input as a JSON scan result instead of running clang.
    #[arg(long)]
    pub scan_json: bool,

    /// Also write the scan result as JSON to this file.
    #[arg(long, value_name = "FILE")]
    pub dump_scan: Option<PathBuf>,

    /// Prints out the location of the config file.
    #[arg(long)]
    pub print_config_path: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Prints out a warning message for every field in `unknown`.
pub(crate) fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => eprintln!("Warning: unknown config key {name}"),
        p => eprintln!("Warning: unknown config key {p}.{name}"),
    });
}

/// Performs parsing and validation of the config; to be called by main() before doing any work.
///
/// Returns the config, or None if a command line flag that calls for an early exit (such as
/// --print-config-path) was provided.
pub fn initialize(args: Arc<Args>) -> Result<Option<Config>, Box<dyn Error>> {
    let dirs = ProjectDirs::from("", "", "fakegen").ok_or("no home directory")?;
    if args.print_config_path {
        println!("Config file location: {:?}", config_file(dirs.config_dir()));
        return Ok(None);
    }
    let config = load_config(&args, dirs.config_dir())?;
    unknown_field_warning("", &config.unknown);
    Ok(Some(config))
}

fn load_config(args: &Args, config_dir: &Path) -> Result<Config, Box<dyn Error>> {
    let mut settings = config::Config::builder()
        .add_source(config::File::from_str(
            include_str!("../default_config.toml"),
            Toml,
        ))
        .add_source(config::File::from(config_file(config_dir)).required(false))
        .add_source(config::File::from(PathBuf::from("fakegen.toml")).required(false));
    for config_arg in &args.config {
        let Some((name, value)) = config_arg.split_once('=') else {
            return Err(format!("failed to parse config value {config_arg:?}; no '=' found").into());
        };
        settings = settings.set_override(name, value)?;
    }

    for (flag, key) in [
        (args.bare, "bare"),
        (args.strict_names, "strict_names"),
        (args.scan_json, "scan_json"),
    ] {
        if flag {
            settings = settings.set_override(key, true)?;
        }
    }
    if args.no_include_guard {
        settings = settings.set_override("include_guard", false)?;
    }
    if let Some(ref fake_name) = args.fake_name {
        settings = settings.set_override("fake_name", fake_name.as_str())?;
    }

    // The config crate does not support providing a Path in an override, and converting to a
    // string and back can be lossy. Instead, this sets a blank value and then corrects it after
    // deserialization.
    let paths = [
        ("input", &args.input),
        ("output", &args.output),
        ("header", &args.header),
        ("dump_scan", &args.dump_scan),
    ];
    for (key, path) in paths {
        if path.is_some() {
            settings = settings.set_override(key, " ")?;
        }
    }

    let mut config: Config = settings.build()?.try_deserialize()?;
    if let Some(ref input) = args.input {
        config.input = input.clone();
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if args.header.is_some() {
        config.header = args.header.clone();
    }
    if args.dump_scan.is_some() {
        config.dump_scan = args.dump_scan.clone();
    }
    Ok(config)
}

/// Returns the config file path, given the config directory.
fn config_file(config_dir: &Path) -> PathBuf {
    [config_dir, "fakegen.toml".as_ref()].iter().collect()
}
