use crate::utils::error::{EtlError, Result};

/// Number of judges on a kata panel.
pub const JUDGES: usize = 7;

pub const TECHNICAL_COLUMNS: [&str; JUDGES] = ["TEC1", "TEC2", "TEC3", "TEC4", "TEC5", "TEC6", "TEC7"];
pub const ATHLETIC_COLUMNS: [&str; JUDGES] = ["ATH1", "ATH2", "ATH3", "ATH4", "ATH5", "ATH6", "ATH7"];

/// One competitor's judged performance in one pool of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub tournament: String,
    pub category: String,
    pub pool: String,
    pub name: String,
    pub nationality: String,
    pub kata: String,
    pub technical: [f64; JUDGES],
    pub athletic: [f64; JUDGES],
    pub score: f64,
}

/// Where a performance happened: tournament, category and pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolContext {
    pub tournament: String,
    pub category: String,
    pub pool: String,
}

impl PerformanceRecord {
    /// Fails unless both grade lists hold exactly one grade per judge.
    pub fn new(
        context: &PoolContext,
        name: String,
        nationality: String,
        kata: String,
        technical: Vec<f64>,
        athletic: Vec<f64>,
        score: f64,
    ) -> Result<Self> {
        let technical = grade_panel("technical", technical)?;
        let athletic = grade_panel("athletic", athletic)?;

        Ok(Self {
            tournament: context.tournament.clone(),
            category: context.category.clone(),
            pool: context.pool.clone(),
            name,
            nationality,
            kata,
            technical,
            athletic,
            score,
        })
    }

    /// Column names in output order.
    pub fn columns() -> Vec<String> {
        ["Tournament", "Category", "Pool", "Name", "Nationality", "Kata"]
            .into_iter()
            .chain(TECHNICAL_COLUMNS)
            .chain(ATHLETIC_COLUMNS)
            .chain(["Score"])
            .map(str::to_string)
            .collect()
    }

    /// Cell values aligned with [`PerformanceRecord::columns`].
    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = vec![
            Cell::Text(&self.tournament),
            Cell::Text(&self.category),
            Cell::Text(&self.pool),
            Cell::Text(&self.name),
            Cell::Text(&self.nationality),
            Cell::Text(&self.kata),
        ];
        cells.extend(self.technical.iter().copied().map(Cell::Number));
        cells.extend(self.athletic.iter().copied().map(Cell::Number));
        cells.push(Cell::Number(self.score));
        cells
    }
}

fn grade_panel(dimension: &str, grades: Vec<f64>) -> Result<[f64; JUDGES]> {
    let count = grades.len();
    <[f64; JUDGES]>::try_from(grades).map_err(|_| EtlError::InvalidRecord {
        message: format!("expected {} {} grades, got {}", JUDGES, dimension, count),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// Outcome of interpreting one result row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Performed(PerformanceRecord),
    /// Registered but never graded: no kata announced or no grade sub-rows.
    Incomplete { name: String },
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: crate::domain::table::RecordTable,
    pub output: Vec<u8>,
}
