// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "oiptypes",
    author,
    version,
    about = "Generates TypeScript declarations from OIP Arweave templates.",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Increase verbosity level (e.g., -v, -vv)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Explicit configuration file (JSON or YAML)
  #[arg(long, global = true, env = "OIP_CONFIG")]
  pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Fetch every template and write the declarations
  Generate(GenerateArgs),
  /// Fetch one template and write it with its direct dependencies
  Add(AddArgs),
  /// List the declarations found in the template blob
  List(ListArgs),
  /// Manage the configuration file
  #[command(subcommand)]
  Config(ConfigCommands),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
  /// Output directory, or output file with --single-file
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Write everything into one file instead of one file per declaration
  #[arg(long)]
  pub single_file: bool,

  /// Read templates from a local file instead of the API
  #[arg(long)]
  pub input: Option<PathBuf>,

  /// Keep every distinct version of a template (only for rendered input)
  #[arg(long)]
  pub keep_versions: bool,

  /// Skip JSDoc enhancement
  #[arg(long)]
  pub no_jsdoc: bool,

  /// JSON file with per-template descriptions used for JSDoc
  #[arg(long)]
  pub schema_docs: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
  /// Template name (e.g., post, audio)
  pub name: String,

  /// Overwrite an existing file without asking
  #[arg(short, long)]
  pub force: bool,

  /// Read the template blob from a local file instead of the API
  #[arg(long)]
  pub input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
  /// Read the template blob from a local file instead of the API
  #[arg(long)]
  pub input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
  /// Write a sample oip.config.json in the current directory
  Init {
    /// Replace an existing file
    #[arg(short, long)]
    force: bool,
  },
  /// Print the resolved configuration
  Show,
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn command_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn parses_generate_flags() {
    let cli = Cli::parse_from([
      "oiptypes",
      "-vv",
      "generate",
      "--single-file",
      "-o",
      "types/all.ts",
      "--no-jsdoc",
    ]);
    assert_eq!(cli.verbose, 2);
    let Commands::Generate(args) = cli.command else {
      panic!("expected generate");
    };
    assert!(args.single_file);
    assert!(args.no_jsdoc);
    assert_eq!(args.output, Some(PathBuf::from("types/all.ts")));
  }

  #[test]
  fn parses_nested_config_command() {
    let cli = Cli::parse_from(["oiptypes", "config", "init", "--force"]);
    assert!(matches!(cli.command, Commands::Config(ConfigCommands::Init { force: true })));
  }
}
