//! Catalog command handler.
//!
//! Implements the `catalog` subcommand: list the metrics a tier may use.

use crate::catalog::{MetricCatalog, MetricDefinition, Tier};
use crate::pipeline::{write_output, OutputTarget};
use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run the catalog command.
pub fn run_catalog(tier: Option<Tier>, format: ReportFormat, output_file: Option<PathBuf>) -> Result<()> {
    let catalog = MetricCatalog::standard();
    let definitions: Vec<&MetricDefinition> = match tier {
        Some(tier) => catalog.accessible_to(tier),
        None => catalog.iter().collect(),
    };

    let text = match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(&definitions).context("failed to serialize catalog")? + "\n"
        }
        ReportFormat::Csv => format_catalog_csv(&definitions),
        ReportFormat::Summary => format_catalog_table(&definitions, tier),
    };

    write_output(&text, &OutputTarget::from_option(output_file), false)
}

fn direction(definition: &MetricDefinition) -> &'static str {
    if definition.higher_is_better {
        "higher"
    } else {
        "lower"
    }
}

fn format_catalog_table(definitions: &[&MetricDefinition], tier: Option<Tier>) -> String {
    let id_width = definitions.iter().map(|d| d.id.len()).max().unwrap_or(2).max(2);
    let label_width = definitions
        .iter()
        .map(|d| d.label.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut lines = Vec::with_capacity(definitions.len() + 3);
    lines.push(format!(
        "{:<id_width$}  {:<label_width$}  {:<17}  {:<6}  tier",
        "id", "label", "category", "better"
    ));
    for d in definitions {
        lines.push(format!(
            "{:<id_width$}  {:<label_width$}  {:<17}  {:<6}  {}",
            d.id,
            d.label,
            d.category.name(),
            direction(d),
            d.min_tier
        ));
    }
    lines.push(String::new());
    match tier {
        Some(tier) => lines.push(format!("{} metrics available at tier {tier}", definitions.len())),
        None => lines.push(format!("{} metrics", definitions.len())),
    }
    lines.join("\n") + "\n"
}

fn format_catalog_csv(definitions: &[&MetricDefinition]) -> String {
    let mut content = String::from("id,label,category,higher_is_better,min_tier\n");
    for d in definitions {
        content.push_str(&format!(
            "{},\"{}\",{},{},{}\n",
            d.id,
            d.label.replace('"', "\"\""),
            d.category.name(),
            d.higher_is_better,
            d.min_tier
        ));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;

    #[test]
    fn test_catalog_table_for_tier() {
        let catalog = MetricCatalog::standard();
        let definitions = catalog.accessible_to(Tier::Free);
        let table = format_catalog_table(&definitions, Some(Tier::Free));
        assert!(table.contains(ids::MARKET_CAP));
        assert!(!table.contains(ids::AISC_LAST_YEAR));
        assert!(table.ends_with(&format!("{} metrics available at tier free\n", definitions.len())));
    }

    #[test]
    fn test_catalog_csv() {
        let catalog = MetricCatalog::standard();
        let definitions: Vec<&MetricDefinition> = catalog.iter().collect();
        let csv = format_catalog_csv(&definitions);
        assert_eq!(csv.lines().count(), definitions.len() + 1);
        assert!(csv.contains("costs.aisc_last_year,\"AISC (last year)\",Costs,false,pro"));
    }

    #[test]
    fn test_catalog_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        run_catalog(Some(Tier::Pro), ReportFormat::Json, Some(path.clone())).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let listed: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert!(listed.contains(&ids::AISC_LAST_YEAR));
        assert!(!listed.contains(&"costs.aisc_future"));
    }
}
