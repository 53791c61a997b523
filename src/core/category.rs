//! Category draws pages: one category/round, split into pool tables whose
//! result rows carry the judges' grades.

use crate::core::parse::{parse_competitor, parse_decimal, pool_label, split_header};
use crate::domain::model::{
    PerformanceRecord, PoolContext, RowOutcome, ATHLETIC_COLUMNS, JUDGES, TECHNICAL_COLUMNS,
};
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static NEWS_HEADER: LazyLock<Selector> = LazyLock::new(|| css("div.newsheader"));
static DRAW_TABLE: LazyLock<Selector> = LazyLock::new(|| css("table.moduletable_draw"));
// Both stripe colours are ordinary result rows.
static RESULT_ROW: LazyLock<Selector> =
    LazyLock::new(|| css("tr.dctabrowwhite, tr.dctabrowgreen"));
static ROW: LazyLock<Selector> = LazyLock::new(|| css("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| css("td"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| css("b"));

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// One pool of a category bracket.
#[derive(Debug, Clone)]
pub struct PoolTable<'a> {
    pub label: String,
    pub rows: Vec<ElementRef<'a>>,
}

/// Context and pool tables of one category/round page.
#[derive(Debug, Clone)]
pub struct CategoryPage<'a> {
    pub tournament: String,
    pub category: String,
    pub pool_tables: Vec<PoolTable<'a>>,
}

impl<'a> CategoryPage<'a> {
    pub fn parse(document: &'a Html) -> Result<Self> {
        let header = document
            .select(&NEWS_HEADER)
            .next()
            .ok_or_else(|| EtlError::malformed("no newsheader block on category page"))?;
        let (tournament, category) = split_header(&text_of(header))?;

        let pool_tables = document
            .select(&DRAW_TABLE)
            .map(PoolTable::parse)
            .collect::<Result<Vec<_>>>()?;
        if pool_tables.is_empty() {
            return Err(EtlError::malformed(format!(
                "no draw tables on category page {} - {}",
                tournament, category
            )));
        }

        Ok(Self {
            tournament,
            category,
            pool_tables,
        })
    }

    /// Every graded performance on the page, pool by pool in row order.
    pub fn performances(&self) -> Result<Vec<PerformanceRecord>> {
        let mut records = Vec::new();

        for pool in &self.pool_tables {
            let context = PoolContext {
                tournament: self.tournament.clone(),
                category: self.category.clone(),
                pool: pool.label.clone(),
            };

            for row in &pool.rows {
                match interpret_row(*row, &context)? {
                    RowOutcome::Performed(record) => records.push(record),
                    RowOutcome::Incomplete { name } => {
                        tracing::debug!(
                            category = %self.category,
                            pool = %pool.label,
                            competitor = %name,
                            "Skipping competitor without grades"
                        );
                    }
                }
            }
        }

        Ok(records)
    }
}

impl<'a> PoolTable<'a> {
    fn parse(table: ElementRef<'a>) -> Result<Self> {
        let heading = table
            .select(&ROW)
            .next()
            .ok_or_else(|| EtlError::malformed("draw table without rows"))?;
        let label = pool_label(&text_of(heading))?;
        let rows = table.select(&RESULT_ROW).collect();

        Ok(Self { label, rows })
    }
}

/// Reads one result row.
///
/// Rows without a kata or without both grade sub-rows belong to competitors
/// who were registered but never graded and come back as
/// [`RowOutcome::Incomplete`].
pub fn interpret_row(row: ElementRef<'_>, context: &PoolContext) -> Result<RowOutcome> {
    let competitor = row.select(&BOLD).next().ok_or_else(|| {
        EtlError::malformed(format!("result row in pool {} has no competitor", context.pool))
    })?;
    let (name, nationality) = parse_competitor(&text_of(competitor))?;

    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let kata = cells
        .get(2)
        .map(|cell| text_of(*cell).trim().to_string())
        .ok_or_else(|| EtlError::malformed(format!("result row for {} has no kata cell", name)))?;

    let sub_rows: Vec<ElementRef<'_>> = row.select(&ROW).collect();
    if kata.is_empty() || sub_rows.len() < 2 {
        return Ok(RowOutcome::Incomplete { name });
    }

    let technical = judge_grades(sub_rows[0], &TECHNICAL_COLUMNS, &name)?;
    let athletic = judge_grades(sub_rows[1], &ATHLETIC_COLUMNS, &name)?;

    // Non-empty: the kata cell exists.
    let score_cell = cells[cells.len() - 1];
    let score = parse_decimal(&text_of(score_cell), "Score")?;

    PerformanceRecord::new(context, name, nationality, kata, technical, athletic, score)
        .map(RowOutcome::Performed)
}

/// Label cell, one cell per judge, then the panel subtotal.
fn judge_grades(
    sub_row: ElementRef<'_>,
    columns: &[&str; JUDGES],
    name: &str,
) -> Result<Vec<f64>> {
    let cells: Vec<ElementRef<'_>> = sub_row.select(&CELL).collect();
    if cells.len() < JUDGES + 1 {
        return Err(EtlError::malformed(format!(
            "grade row for {} has {} cells, expected at least {}",
            name,
            cells.len(),
            JUDGES + 1
        )));
    }

    cells[1..=JUDGES]
        .iter()
        .zip(columns)
        .map(|(cell, column)| parse_decimal(&text_of(*cell), column))
        .collect()
}

/// Parses a fetched category page and extracts its performances.
pub fn extract_round(content: &[u8]) -> Result<Vec<PerformanceRecord>> {
    let document = Html::parse_document(&String::from_utf8_lossy(content));
    CategoryPage::parse(&document)?.performances()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade_row(label: &str, grades: [&str; 7], subtotal: &str) -> String {
        let cells: String = grades.iter().map(|g| format!("<td>{}</td>", g)).collect();
        format!("<tr><td>{}</td>{}<td>{}</td></tr>", label, cells, subtotal)
    }

    fn result_row(
        class: &str,
        competitor: &str,
        kata: &str,
        grades: Option<(String, String)>,
        score: &str,
    ) -> String {
        let panel = match grades {
            Some((tec, ath)) => format!("<table>{}{}</table>", tec, ath),
            None => String::new(),
        };
        format!(
            r#"<tr class="{}"><td>1</td><td><b>{}</b></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            class, competitor, kata, panel, score
        )
    }

    fn graded(tec: [&str; 7], ath: [&str; 7]) -> Option<(String, String)> {
        Some((grade_row("TEC", tec, "25,5"), grade_row("ATH", ath, "25,2")))
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body>
            <div class="newsheader">Karate1 Premier League - Salzburg 2020 - Female Kata :</div>
            <table class="moduletable_draw">
              <tr><th colspan="5">Pool: 1 / 4</th></tr>
              {}
            </table>
            </body></html>"#,
            rows.join("\n")
        )
    }

    const TEC: [&str; 7] = ["8,5", "8,4", "8,6", "8,5", "8,5", "8,3", "8,7"];
    const ATH: [&str; 7] = ["8,4", "8,4", "8,5", "8,3", "8,6", "8,4", "8,4"];

    #[test]
    fn test_extracts_graded_row() {
        let html = page(&[result_row(
            "dctabrowwhite",
            "SATO Mia (Tokyo, JPN)",
            "002 Anan Dai",
            graded(TEC, ATH),
            "24,06",
        )]);
        let records = extract_round(html.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.tournament, "Karate1 Premier League - Salzburg 2020");
        assert_eq!(record.category, "Female Kata");
        assert_eq!(record.pool, "1 / 4");
        assert_eq!(record.name, "SATO Mia");
        assert_eq!(record.nationality, "JPN");
        assert_eq!(record.kata, "002 Anan Dai");
        assert_eq!(record.technical, [8.5, 8.4, 8.6, 8.5, 8.5, 8.3, 8.7]);
        assert_eq!(record.athletic, [8.4, 8.4, 8.5, 8.3, 8.6, 8.4, 8.4]);
        assert_eq!(record.score, 24.06);
    }

    #[test]
    fn test_both_stripes_are_result_rows() {
        let html = page(&[
            result_row(
                "dctabrowwhite",
                "SATO Mia (Tokyo, JPN)",
                "002 Anan Dai",
                graded(TEC, ATH),
                "24,06",
            ),
            result_row(
                "dctabrowgreen",
                "BOTTARO Viviana (Rome, ITA)",
                "039 Suparinpei",
                graded(ATH, TEC),
                "24,10",
            ),
        ]);
        let records = extract_round(html.as_bytes()).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["SATO Mia", "BOTTARO Viviana"]);
    }

    #[test]
    fn test_incomplete_rows_are_omitted_without_affecting_others() {
        let complete = [
            result_row(
                "dctabrowwhite",
                "SATO Mia (Tokyo, JPN)",
                "002 Anan Dai",
                graded(TEC, ATH),
                "24,06",
            ),
            result_row(
                "dctabrowwhite",
                "BOTTARO Viviana (Rome, ITA)",
                "039 Suparinpei",
                graded(ATH, TEC),
                "24,10",
            ),
        ];
        let expected = extract_round(page(&complete).as_bytes()).unwrap();

        let with_gaps = [
            complete[0].clone(),
            result_row("dctabrowgreen", "NO SHOW Ana (Lima, PER)", "", None, ""),
            result_row("dctabrowgreen", "LATE Kim (Seoul, KOR)", "013 Gojushiho", None, ""),
            complete[1].clone(),
        ];
        let records = extract_round(page(&with_gaps).as_bytes()).unwrap();

        assert_eq!(records, expected);
        assert!(records.iter().all(|r| !r.kata.is_empty()));
    }

    #[test]
    fn test_single_grade_row_is_incomplete() {
        let context = PoolContext {
            tournament: "T".to_string(),
            category: "C".to_string(),
            pool: "1".to_string(),
        };
        let html = page(&[result_row(
            "dctabrowwhite",
            "SATO Mia (Tokyo, JPN)",
            "002 Anan Dai",
            Some((grade_row("TEC", TEC, "25,5"), String::new())),
            "24,06",
        )]);
        let document = Html::parse_document(&html);
        let page = CategoryPage::parse(&document).unwrap();

        let outcome = interpret_row(page.pool_tables[0].rows[0], &context).unwrap();
        assert_eq!(outcome, RowOutcome::Incomplete { name: "SATO Mia".to_string() });
    }

    #[test]
    fn test_bad_grade_is_an_error() {
        let mut tec = TEC;
        tec[3] = "DSQ";
        let html = page(&[result_row(
            "dctabrowwhite",
            "SATO Mia (Tokyo, JPN)",
            "002 Anan Dai",
            graded(tec, ATH),
            "24,06",
        )]);

        let err = extract_round(html.as_bytes()).unwrap_err();
        assert!(matches!(err, EtlError::NumericConversion { ref field, .. } if field == "TEC4"));
    }

    #[test]
    fn test_bad_score_is_an_error() {
        let html = page(&[result_row(
            "dctabrowwhite",
            "SATO Mia (Tokyo, JPN)",
            "002 Anan Dai",
            graded(TEC, ATH),
            "DSQ",
        )]);

        let err = extract_round(html.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::NumericConversion { ref field, ref value } if field == "Score" && value == "DSQ"
        ));
    }

    #[test]
    fn test_row_without_competitor_is_malformed() {
        let row = format!(
            r#"<tr class="dctabrowwhite"><td>1</td><td>SATO Mia (Tokyo, JPN)</td><td>002 Anan Dai</td><td><table>{}{}</table></td><td>24,06</td></tr>"#,
            grade_row("TEC", TEC, "25,5"),
            grade_row("ATH", ATH, "25,2")
        );

        let err = extract_round(page(&[row]).as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedPage { ref message } if message.contains("has no competitor")
        ));
    }

    #[test]
    fn test_short_grade_row_is_malformed() {
        let short = "<tr><td>TEC</td><td>8,5</td><td>8,4</td></tr>".to_string();
        let html = page(&[result_row(
            "dctabrowwhite",
            "SATO Mia (Tokyo, JPN)",
            "002 Anan Dai",
            Some((short, grade_row("ATH", ATH, "25,2"))),
            "24,06",
        )]);

        let err = extract_round(html.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedPage { ref message }
                if message == "grade row for SATO Mia has 3 cells, expected at least 8"
        ));
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let html = r#"<table class="moduletable_draw"><tr><td>Pool: 1</td></tr></table>"#;
        let err = extract_round(html.as_bytes()).unwrap_err();
        assert!(matches!(err, EtlError::MalformedPage { .. }));
    }

    #[test]
    fn test_missing_draw_tables_is_malformed() {
        let html = r#"<div class="newsheader">Karate1 - Female Kata</div>"#;
        let err = extract_round(html.as_bytes()).unwrap_err();
        assert!(matches!(err, EtlError::MalformedPage { .. }));
    }

    #[test]
    fn test_reparsing_is_deterministic() {
        let html = page(&[
            result_row(
                "dctabrowwhite",
                "SATO Mia (Tokyo, JPN)",
                "002 Anan Dai",
                graded(TEC, ATH),
                "24,06",
            ),
            result_row(
                "dctabrowgreen",
                "BOTTARO Viviana (Rome, ITA)",
                "039 Suparinpei",
                graded(ATH, TEC),
                "24,10",
            ),
        ]);
        assert_eq!(
            extract_round(html.as_bytes()).unwrap(),
            extract_round(html.as_bytes()).unwrap()
        );
    }
}
