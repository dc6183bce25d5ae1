//! treeconf CLI - Command-line interface for treeconf configuration files
//!
//! Usage:
//!   treeconf get config.yaml database.host
//!   treeconf keys config.yaml --prefix database
//!   treeconf dump config.yaml --format json
//!   treeconf check config.yaml other.yaml

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use treeconf_core::{Configuration, Properties, Value};

/// treeconf - Hierarchical YAML configuration with dotted keys
#[derive(Parser)]
#[command(name = "treeconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a specific value from the configuration
    Get {
        /// Configuration file
        file: PathBuf,

        /// Dotted key of the value (e.g., database.host)
        key: String,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Default value if key not found
        #[arg(short, long)]
        default: Option<String>,
    },

    /// List the dotted keys of the configuration
    Keys {
        /// Configuration file
        file: PathBuf,

        /// Only list keys under this prefix (shown relative to it)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Rebuild the configuration and print it
    Dump {
        /// Configuration file
        file: PathBuf,

        /// Output format: yaml, json
        #[arg(short, long, default_value = "yaml")]
        format: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that files parse as configurations
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            file,
            key,
            format,
            default,
        } => cmd_get(&file, &key, &format, default),

        Commands::Keys { file, prefix } => cmd_keys(&file, prefix.as_deref()),

        Commands::Dump {
            file,
            format,
            output,
        } => cmd_dump(&file, &format, output),

        Commands::Check { files } => cmd_check(files),
    }
}

fn load_config(file: &Path) -> Result<Configuration, String> {
    Configuration::load(file).map_err(|e| format!("Failed to load {}: {}", file.display(), e))
}

/// Render a value for the `get` command
fn render_value(value: &Value, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(value)
            .map(|s| format!("{}\n", s))
            .map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => match value {
            Value::Sequence(_) | Value::Mapping(_) => {
                serde_yaml::to_string(value).map_err(|e| e.to_string())
            }
            scalar => Ok(format!("{}\n", scalar)),
        },
    }
}

fn cmd_get(file: &Path, key: &str, format: &str, default: Option<String>) -> ExitCode {
    let config = match load_config(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match config.get_property(key) {
        Some(value) => match render_value(&value, format) {
            Ok(text) => {
                print!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                ExitCode::from(1)
            }
        },
        None => {
            if let Some(default_val) = default {
                println!("{}", default_val);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: Key '{}' not found", "Error".red(), key);
                ExitCode::from(1)
            }
        }
    }
}

fn cmd_keys(file: &Path, prefix: Option<&str>) -> ExitCode {
    let config = match load_config(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let keys = match prefix {
        Some(p) => config.subset(p).keys(),
        None => config.keys(),
    };

    for key in keys {
        println!("{}", key);
    }
    ExitCode::SUCCESS
}

fn cmd_dump(file: &Path, format: &str, output: Option<PathBuf>) -> ExitCode {
    let config = match load_config(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let result = match format {
        "json" => config.to_json().map(|s| format!("{}\n", s)),
        _ => config.to_yaml(),
    };

    match result {
        Ok(content) => {
            if let Some(output_path) = output {
                if let Err(e) = std::fs::write(&output_path, &content) {
                    eprintln!("{}: {}", "Error writing file".red(), e);
                    return ExitCode::from(2);
                }
                eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
            } else {
                print!("{}", content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        match Configuration::load(&file) {
            Ok(config) => {
                println!(
                    "{} {}: valid ({} keys)",
                    "✓".green(),
                    file.display(),
                    config.len()
                );
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
