pub mod cli;
pub mod config;
pub mod io_utils;
pub mod key;
pub mod merge;
pub mod source;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    merge::MergeOutcome,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_merge", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Merge(args) => {
            match merge::execute(&args)? {
                MergeOutcome::Written { rows, path } => {
                    info!("Merge complete: {rows} data row(s) written to {path:?}");
                }
                MergeOutcome::Skipped { table } => {
                    info!("Merge skipped: table '{table}' has no data rows; output left untouched");
                }
            }
            Ok(())
        }
    }
}
