//! CSV report generator.
//!
//! One row per entity with a score and confidence column per axis,
//! suitable for spreadsheet import and data analysis pipelines.

use super::{ordered_results, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::scoring::ScoringRun;

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate_run_report(
        &self,
        run: &ScoringRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let rows = ordered_results(run, config)?;
        let mut content = String::new();

        let mut header = vec!["entity_id".to_string(), "name".to_string()];
        if config.rank_by.is_some() {
            header.push("rank".to_string());
        }
        for axis in &run.axes {
            header.push(format!("{}_score", escape_header(axis)));
            header.push(format!("{}_confidence", escape_header(axis)));
        }
        if config.min_confidence.is_some() {
            header.push("low_confidence".to_string());
        }
        content.push_str(&header.join(","));
        content.push('\n');

        for (rank, result) in rows {
            let mut fields = vec![
                result.entity_id.to_string(),
                format!("\"{}\"", escape_csv(&result.name)),
            ];
            if config.rank_by.is_some() {
                fields.push(rank.map(|r| r.to_string()).unwrap_or_default());
            }
            for axis in &run.axes {
                fields.push(fmt_cell(result.score(axis), 2));
                fields.push(fmt_cell(result.confidence(axis), 4));
            }
            if config.min_confidence.is_some() {
                fields.push(config.is_low_confidence(result.min_confidence()).to_string());
            }
            content.push_str(&fields.join(","));
            content.push('\n');
        }

        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

fn fmt_cell(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.precision$}"))
}

/// Escape a string for CSV (double quotes become two double quotes)
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace('\n', " ")
}

fn escape_header(s: &str) -> String {
    s.replace([',', '"', '\n'], "_")
}
