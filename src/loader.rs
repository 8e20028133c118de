use log::{debug, info};

use crate::{
    ddl::insert_sql,
    error::ConvertError,
    grid::{CellValue, Grid},
    sink::Sink,
};

/// Inserts every data row of `grid` into `ident`, top to bottom.
///
/// `column_count` is the schema width and must match the grid's width so the
/// positional placeholders line up with the created columns. Stops at the
/// first row the sink rejects.
pub fn load_rows<S>(
    sink: &mut S,
    grid: &Grid,
    ident: &str,
    column_count: usize,
) -> Result<usize, ConvertError>
where
    S: Sink + ?Sized,
{
    if column_count != grid.max_column() {
        return Err(ConvertError::ColumnCountMismatch {
            schema: column_count,
            grid: grid.max_column(),
        });
    }

    let sql = insert_sql(ident, column_count);
    debug!("{sql}");
    let mut inserted = 0usize;
    for (idx, row) in grid.data_rows().enumerate() {
        sink.insert(&sql, row)
            .map_err(|reason| ConvertError::RowRejected {
                row: idx + 2,
                values: render_row(row),
                reason,
            })?;
        inserted += 1;
    }
    info!("Inserted {inserted} row(s) into \"{ident}\"");
    Ok(inserted)
}

fn render_row(row: &[CellValue]) -> Vec<String> {
    row.iter().map(|value| value.to_string()).collect()
}
