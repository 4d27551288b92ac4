//! Categorical encoding of text-like columns
//!
//! Every text-like column is replaced by dense integer codes so the rest of
//! the pipeline only ever deals with numbers. The encoder never mutates its
//! input: it returns a new frame together with the mappings it used.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::FairnessResult;

/// Text used for null entries once a column is coerced to text
pub const NULL_TEXT: &str = "null";

/// Bijection between the distinct text values of one column and their codes.
///
/// Codes are assigned in sorted text order, so code `i` is the `i`-th
/// smallest distinct value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnEncoding {
    values: Vec<String>,
    #[serde(skip)]
    codes: HashMap<String, u32>,
}

impl ColumnEncoding {
    /// Build the encoding from every observed value (duplicates allowed)
    pub fn fit<'a, I>(observed: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = observed.into_iter().collect();
        let values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let codes = values
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code as u32))
            .collect();

        Self { values, codes }
    }

    /// Code assigned to a text value, `None` if it was never observed
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// Text value behind a code, `None` for codes outside the encoding
    pub fn value_of(&self, code: u32) -> Option<&str> {
        self.values.get(code as usize).map(String::as_str)
    }

    /// Distinct values in code order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn transform(&self, text: &[String]) -> Vec<u32> {
        text.iter().filter_map(|v| self.code_of(v)).collect()
    }
}

/// Encodings of every column the encoder rewrote, keyed by column name
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodingMap {
    columns: BTreeMap<String, ColumnEncoding>,
}

impl EncodingMap {
    pub fn get(&self, column: &str) -> Option<&ColumnEncoding> {
        self.columns.get(column)
    }

    /// Whether the column was produced from text by the encoder
    pub fn is_encoded(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Names of the encoded columns, sorted
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn insert(&mut self, column: String, encoding: ColumnEncoding) {
        self.columns.insert(column, encoding);
    }
}

/// A dataset whose text-like columns have been replaced by integer codes
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub frame: DataFrame,
    pub encodings: EncodingMap,
}

/// Whether a column's dtype is treated as categorical text
pub fn is_text_like(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String | DataType::Categorical(..) | DataType::Enum(..) | DataType::Null
    )
}

/// Encode every text-like column of `df` into `UInt32` codes.
///
/// Numeric and boolean columns are carried over untouched. Nulls in a text
/// column become the category [`NULL_TEXT`].
pub fn encode_categoricals(df: &DataFrame) -> FairnessResult<EncodedDataset> {
    let mut frame = df.clone();
    let mut encodings = EncodingMap::default();

    let text_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| is_text_like(col.dtype()))
        .map(|col| col.name().to_string())
        .collect();

    for name in text_columns {
        let text = column_as_text(df.column(&name)?)?;
        let encoding = ColumnEncoding::fit(text.iter().map(String::as_str));
        let codes = encoding.transform(&text);

        debug!(column = %name, categories = encoding.len(), "encoded categorical column");

        frame.with_column(Column::new(name.as_str().into(), codes))?;
        encodings.insert(name, encoding);
    }

    Ok(EncodedDataset { frame, encodings })
}

/// Coerce a column to text, nulls included
fn column_as_text(col: &Column) -> FairnessResult<Vec<String>> {
    let cast = col.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(NULL_TEXT).to_string())
        .collect();
    Ok(values)
}
