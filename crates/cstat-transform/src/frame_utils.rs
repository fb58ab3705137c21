//! Column checks and casts shared by the pipeline stages.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, Series};

use cstat_model::columns::ID;

use crate::error::{Result, TransformError};

/// Fails with [`TransformError::MissingColumn`] on the first absent column.
pub fn require_frame_columns(df: &DataFrame, table: &'static str, required: &[&str]) -> Result<()> {
    for column in required {
        if df.get_column_index(column).is_none() {
            return Err(TransformError::MissingColumn {
                table,
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Cast a column in place. Values that do not parse become null.
pub fn cast_column(df: &mut DataFrame, name: &str, dtype: &DataType) -> Result<()> {
    let cast = df.column(name)?.cast(dtype)?;
    df.with_column(cast)?;
    Ok(())
}

/// Drop the `id` row-index column written alongside every pipeline file.
pub fn drop_index_column(df: &mut DataFrame) -> Result<()> {
    if df.get_column_index(ID).is_some() {
        df.drop_in_place(ID)?;
    }
    Ok(())
}

/// An all-null column of the given type and length.
pub fn null_column(name: &str, len: usize, dtype: &DataType) -> Column {
    Series::full_null(name.into(), len, dtype).into_column()
}
