use crate::domain::model::{Cell, PerformanceRecord};
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// Performance records under a fixed column list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    records: Vec<PerformanceRecord>,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RecordTable {
    pub fn new(records: Vec<PerformanceRecord>) -> Self {
        Self::with_columns(PerformanceRecord::columns(), records)
    }

    pub fn with_columns(columns: Vec<String>, records: Vec<PerformanceRecord>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PerformanceRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends `other` after the existing rows. Both tables must carry the
    /// same columns in the same order.
    pub fn append(&mut self, other: RecordTable) -> Result<()> {
        if other.columns != self.columns {
            return Err(EtlError::SchemaMismatch {
                expected: self.columns.join(", "),
                found: other.columns.join(", "),
            });
        }
        self.records.extend(other.records);
        Ok(())
    }

    /// Concatenates tables in order. An empty input gives an empty table.
    pub fn concat<I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = RecordTable>,
    {
        let mut tables = tables.into_iter();
        let mut combined = match tables.next() {
            Some(first) => first,
            None => return Ok(Self::default()),
        };
        for table in tables {
            combined.append(table)?;
        }
        Ok(combined)
    }

    pub fn render(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Csv => self.render_delimited(b','),
            OutputFormat::Tsv => self.render_delimited(b'\t'),
            OutputFormat::Json => self.render_json(),
        }
    }

    fn render_delimited(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(&self.columns)?;
        for record in &self.records {
            writer.write_record(record.cells().iter().map(format_cell))?;
        }

        writer
            .into_inner()
            .map_err(|e| EtlError::Io(e.into_error()))
    }

    fn render_json(&self) -> Result<Vec<u8>> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = self
            .records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(record.cells().into_iter().map(|cell| match cell {
                        Cell::Text(text) => serde_json::Value::from(text),
                        Cell::Number(value) => serde_json::Value::from(value),
                    }))
                    .collect()
            })
            .collect();

        Ok(serde_json::to_vec_pretty(&rows)?)
    }
}

/// Floats keep at least one fractional digit, so `9` is written as `9.0`.
fn format_cell(cell: &Cell<'_>) -> String {
    match cell {
        Cell::Text(text) => text.to_string(),
        Cell::Number(value) => format!("{:?}", value),
    }
}
