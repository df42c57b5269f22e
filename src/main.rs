//! Permalink - canonical URL resolution for content sites.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use permalink::cli::{self, Cli, Commands, common::Session};
use permalink::config::{SiteConfig, init_config};
use permalink::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Link { args } => cli::link::run_link(args, &Session::open(&config)?),
        Commands::Archive { target } => {
            cli::archive::run_archive(target, &Session::open(&config)?)
        }
        Commands::Adjacent { args } => {
            cli::adjacent::run_adjacent(args, &Session::open(&config)?)
        }
        Commands::List { json } => cli::list::run_list(*json, &Session::open(&config)?),
        Commands::Check => cli::check::run_check(&config),
    }
}
