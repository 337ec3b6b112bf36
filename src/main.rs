// src/main.rs
mod add;
mod api;
mod cli;
mod config;
mod error;
mod extract;
mod generate;
mod jsdoc;
mod list;
mod render;
mod scanner;
mod split;
mod utils;

use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use error::TypegenError;
use log::LevelFilter;
use std::env;

fn main() -> Result<(), TypegenError> {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  let cwd = env::current_dir()?;
  let config = config::load_config(cli.config.as_deref(), &cwd)?;
  log::debug!("Resolved config: {:?}", config);

  match cli.command {
    Commands::Generate(args) => {
      generate::run_generate(args, &config, &cwd)?;
    }
    Commands::Add(args) => {
      add::run_add(args, &config, &cwd)?;
    }
    Commands::List(args) => {
      list::run_list(args, &config)?;
    }
    Commands::Config(ConfigCommands::Init { force }) => {
      config::write_sample_config(&cwd.join(config::SAMPLE_CONFIG_FILENAME), force)?;
    }
    Commands::Config(ConfigCommands::Show) => {
      println!("{}", serde_json::to_string_pretty(&config)?);
    }
  }

  Ok(())
}
