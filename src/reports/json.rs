//! JSON report generator.

use super::{ordered_results, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::scoring::{rank, MetricTrace, RankedEntity, ScoringRun};
use indexmap::IndexMap;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_run_report(
        &self,
        run: &ScoringRun,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut rankings = IndexMap::new();
        for axis in &run.axes {
            let ranked = rank(run, axis).map_err(|e| ReportError::ConfigError(e.to_string()))?;
            rankings.insert(axis.as_str(), ranked);
        }

        let results = ordered_results(run, config)?
            .into_iter()
            .map(|(_, r)| JsonEntity {
                entity_id: r.entity_id,
                name: &r.name,
                axis_scores: &r.axis_scores,
                confidence: &r.confidence,
                low_confidence: config
                    .min_confidence
                    .map(|_| config.is_low_confidence(r.min_confidence())),
                traces: config.include_traces.then_some(r.traces.as_slice()),
            })
            .collect();

        let below_confidence = config.min_confidence.map(|threshold| {
            run.below_confidence(threshold)
                .map(|r| r.entity_id)
                .collect()
        });

        let report = JsonRunReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                },
                title: config.title.as_deref(),
                fingerprint: &run.fingerprint,
                dataset: config.metadata.dataset_path.as_deref(),
                config: config.metadata.config_path.as_deref(),
                tier: config.metadata.tier.as_deref(),
                dropped_metrics: &config.metadata.dropped_metrics,
                entity_count: run.len(),
                axes: &run.axes,
            },
            rankings,
            below_confidence,
            results,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonRunReport<'a> {
    metadata: JsonReportMetadata<'a>,
    rankings: IndexMap<&'a str, Vec<RankedEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    below_confidence: Option<Vec<u64>>,
    results: Vec<JsonEntity<'a>>,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    fingerprint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty")]
    dropped_metrics: &'a [String],
    entity_count: usize,
    axes: &'a [String],
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonEntity<'a> {
    entity_id: u64,
    name: &'a str,
    axis_scores: &'a IndexMap<String, Option<f64>>,
    confidence: &'a IndexMap<String, Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    low_confidence: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traces: Option<&'a [MetricTrace]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_run;

    fn report(config: &ReportConfig) -> serde_json::Value {
        let json = JsonReporter::new()
            .generate_run_report(&sample_run(), config)
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_report_structure() {
        let value = report(&ReportConfig::default());
        assert_eq!(value["metadata"]["tool"]["name"], "composite-scorer");
        assert_eq!(value["metadata"]["fingerprint"], "00000000deadbeef");
        assert_eq!(value["metadata"]["entity_count"], 3);
        assert!(value.get("below_confidence").is_none());

        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["entity_id"], 1);
        assert_eq!(results[1]["axis_scores"]["quality"], serde_json::Value::Null);
        assert!(results[0].get("traces").is_none());
    }

    #[test]
    fn test_rankings_per_axis() {
        let value = report(&ReportConfig::default());
        let value_ranking = value["rankings"]["value"].as_array().unwrap();
        assert_eq!(value_ranking[0]["entity_id"], 2);
        assert_eq!(value_ranking[0]["rank"], 1);
        assert_eq!(value_ranking[2]["rank"], serde_json::Value::Null);

        let quality_ranking = value["rankings"]["quality"].as_array().unwrap();
        assert_eq!(quality_ranking[0]["entity_id"], 1);
    }

    #[test]
    fn test_traces_and_confidence_flags() {
        let config = ReportConfig::default()
            .with_traces(true)
            .min_confidence(Some(0.5));
        let value = report(&config);
        assert_eq!(value["below_confidence"], serde_json::json!([1, 3]));
        let results = value["results"].as_array().unwrap();
        assert_eq!(results[0]["low_confidence"], true);
        assert_eq!(results[1]["low_confidence"], false);
        assert!(results[0]["traces"].is_array());
    }

    #[test]
    fn test_compact_output() {
        let json = JsonReporter::new()
            .pretty(false)
            .generate_run_report(&sample_run(), &ReportConfig::default())
            .unwrap();
        assert!(!json.contains('\n'));
    }
}
