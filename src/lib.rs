pub mod cli;
pub mod convert;
pub mod data;
pub mod ddl;
pub mod error;
pub mod grid;
pub mod io_utils;
pub mod load;
pub mod loader;
pub mod preview;
pub mod resolver;
pub mod schema;
pub mod sink;
pub mod slug;
pub mod source;
pub mod table;
pub mod types;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    convert::plan,
    load::{build_resolver, convert_options, source_options},
    source::load_grid,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_sqlite", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Load(args) => load::execute(&args),
        Commands::Probe(args) => handle_probe(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    info!("Probing '{}'", args.source.input.display());
    let mut grid = load_grid(&args.source.input, &source_options(&args.source))
        .with_context(|| format!("Reading {:?}", args.source.input))?;
    let mut resolver = build_resolver(args.on_conflict, &args.naming)?;
    let options = convert_options(args.table.clone(), &args.naming);
    let plan = plan(&mut grid, resolver.as_mut(), &options)
        .with_context(|| format!("Inferring schema from {:?}", args.source.input))?;

    for column in plan.schema.columns() {
        println!("{}\t{}", column.name, column.sql_type);
    }
    println!("{};", plan.drop_sql());
    println!("{};", plan.create_sql());

    if let Some(meta) = &args.meta {
        plan.schema
            .save(meta)
            .with_context(|| format!("Writing schema to {meta:?}"))?;
        info!(
            "Inferred schema for {} column(s) written to {:?}",
            plan.schema.len(),
            meta
        );
    }
    Ok(())
}
