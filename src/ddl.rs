use itertools::Itertools;

use crate::{error::ConvertError, schema::Schema, slug::slugify};

/// Derives the destination table name from a sheet title.
pub fn table_identifier(title: &str) -> Result<String, ConvertError> {
    let ident = slugify(title);
    if ident.is_empty() {
        return Err(ConvertError::EmptyTableName {
            title: title.to_string(),
        });
    }
    Ok(ident)
}

/// Double-quotes an identifier, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table_sql(ident: &str) -> String {
    format!("drop table if exists {}", quote_identifier(ident))
}

pub fn create_table_sql(schema: &Schema, ident: &str) -> String {
    let columns = schema
        .columns()
        .iter()
        .map(|column| format!("{} {}", quote_identifier(&column.name), column.sql_type))
        .join(", ");
    format!("create table {} ( {} )", quote_identifier(ident), columns)
}

pub fn insert_sql(ident: &str, column_count: usize) -> String {
    let placeholders = std::iter::repeat_n("?", column_count).join(", ");
    format!(
        "insert into {} values ({})",
        quote_identifier(ident),
        placeholders
    )
}
