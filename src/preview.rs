use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, load::source_options, source::load_grid, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let mut grid = load_grid(&args.source.input, &source_options(&args.source))
        .with_context(|| format!("Reading {:?}", args.source.input))?;
    let summary = grid.prune();
    table::print_grid(&grid, args.rows);
    info!(
        "Displayed {} of {} data row(s) from sheet '{}' ({} empty row(s), {} empty column(s) removed)",
        grid.data_rows().take(args.rows).count(),
        grid.max_row().saturating_sub(1),
        grid.title(),
        summary.rows_removed,
        summary.columns_removed
    );
    Ok(())
}
