use std::io;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{ConflictPolicy, LoadArgs, NamingArgs, SourceArgs},
    convert::{ConvertOptions, convert},
    error::ConvertError,
    resolver::{FailResolver, NameResolver, PromptResolver, RenameMapResolver, SuffixResolver},
    schema::InferOptions,
    sink::SqliteSink,
    source::{SourceOptions, load_grid},
};

pub fn execute(args: &LoadArgs) -> Result<()> {
    info!(
        "Loading '{}' into database {:?}",
        args.source.input.display(),
        args.database
    );
    let grid = load_grid(&args.source.input, &source_options(&args.source))
        .with_context(|| format!("Reading {:?}", args.source.input))?;
    let mut resolver = build_resolver(args.on_conflict, &args.naming)?;
    let mut sink = SqliteSink::open(&args.database)?;
    let options = convert_options(args.table.clone(), &args.naming);

    let report = match convert(grid, &mut sink, resolver.as_mut(), &options) {
        Ok(report) => report,
        Err(err) => {
            if let ConvertError::RowRejected { values, .. } = &err {
                eprintln!("[{}]", values.join(", "));
            }
            return Err(err)
                .with_context(|| format!("Converting {:?}", args.source.input));
        }
    };

    println!(
        "All data from sheet written to table \"{}\" in {} ({} row(s), {} column(s)).",
        report.table,
        args.database.display(),
        report.rows_inserted,
        report.schema.len()
    );
    Ok(())
}

pub(crate) fn source_options(args: &SourceArgs) -> SourceOptions {
    SourceOptions {
        sheet: args.sheet.clone(),
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
    }
}

pub(crate) fn convert_options(table_name: Option<String>, naming: &NamingArgs) -> ConvertOptions {
    ConvertOptions {
        table_name,
        infer: InferOptions {
            max_rename_attempts: naming.max_rename_attempts,
        },
    }
}

/// Builds the resolver for `policy`, consulting `--rename` entries first.
pub(crate) fn build_resolver(
    policy: ConflictPolicy,
    naming: &NamingArgs,
) -> Result<Box<dyn NameResolver>> {
    let renames = &naming.renames;
    let resolver: Box<dyn NameResolver> = match policy {
        ConflictPolicy::Prompt => Box::new(RenameMapResolver::parse_specs(
            renames,
            PromptResolver::new(io::stdin().lock(), io::stdout()),
        )?),
        ConflictPolicy::Suffix => Box::new(RenameMapResolver::parse_specs(
            renames,
            SuffixResolver::new(),
        )?),
        ConflictPolicy::Fail => Box::new(RenameMapResolver::parse_specs(renames, FailResolver)?),
    };
    Ok(resolver)
}
