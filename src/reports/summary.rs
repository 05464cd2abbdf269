//! Summary report generator for shell output.
//!
//! Renders an aligned table with one row per entity and a
//! `score (confidence)` column per axis.

use super::{ordered_results, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::scoring::ScoringRun;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 28;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_run_report(
        &self,
        run: &ScoringRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let rows = ordered_results(run, config)?;
        let mut lines = Vec::new();

        let title = config.title.as_deref().unwrap_or("Composite Scores");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        if let Some(path) = &config.metadata.dataset_path {
            lines.push(format!("{}  {path}", self.color("Dataset:", "cyan")));
        }
        if let Some(tier) = &config.metadata.tier {
            lines.push(format!("{}  {tier}", self.color("Tier:", "cyan")));
        }
        if !config.metadata.dropped_metrics.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Dropped:", "cyan"),
                config.metadata.dropped_metrics.join(", ")
            ));
        }
        lines.push(String::new());

        let axis_widths: Vec<usize> = run.axes.iter().map(|a| a.width().max(16)).collect();

        let mut header = String::new();
        if config.rank_by.is_some() {
            header.push_str(&pad_left("#", 4));
            header.push_str("  ");
        }
        header.push_str(&pad_left("id", 8));
        header.push_str("  ");
        header.push_str(&pad_right("name", NAME_WIDTH));
        for (axis, width) in run.axes.iter().zip(&axis_widths) {
            header.push_str("  ");
            header.push_str(&pad_left(axis, *width));
        }
        lines.push(self.color(header.trim_end(), "bold"));

        for (rank, result) in &rows {
            let mut line = String::new();
            if config.rank_by.is_some() {
                let rank = rank.map_or_else(|| "-".to_string(), |r| r.to_string());
                line.push_str(&pad_left(&rank, 4));
                line.push_str("  ");
            }
            line.push_str(&pad_left(&result.entity_id.to_string(), 8));
            line.push_str("  ");
            line.push_str(&pad_right(&truncate_str(&result.name, NAME_WIDTH), NAME_WIDTH));
            for (axis, width) in run.axes.iter().zip(&axis_widths) {
                let cell = match (result.score(axis), result.confidence(axis)) {
                    (Some(score), Some(confidence)) => format!("{score:.1} ({confidence:.2})"),
                    (Some(score), None) => format!("{score:.1}"),
                    _ => "-".to_string(),
                };
                let cell = pad_left(&cell, *width);
                line.push_str("  ");
                if config.is_low_confidence(result.confidence(axis)) {
                    line.push_str(&self.color(&cell, "yellow"));
                } else {
                    line.push_str(&cell);
                }
            }
            lines.push(line.trim_end().to_string());
        }

        lines.push(String::new());
        lines.push(format!(
            "{} entities, {} axes, fingerprint {}",
            run.len(),
            run.axes.len(),
            self.color(&run.fingerprint, "dim")
        ));
        if let Some(threshold) = config.min_confidence {
            let below = run.below_confidence(threshold).count();
            let text = format!("{below} below confidence {threshold:.2}");
            if below > 0 {
                lines.push(self.color(&text, "yellow"));
            } else {
                lines.push(self.color(&text, "green"));
            }
        }

        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Truncate a string with ellipsis, using Unicode display width for accuracy.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let truncated: String = s
        .chars()
        .take_while(|ch| {
            let w = ch.width().unwrap_or(0);
            if width + w > budget {
                return false;
            }
            width += w;
            true
        })
        .collect();
    format!("{truncated}...")
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(s.width())))
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{s}", " ".repeat(width.saturating_sub(s.width())))
}
