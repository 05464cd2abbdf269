//! The standard precious-metals company metric registry.

use indexmap::IndexMap;

use super::definition::{MetricCategory, MetricDefinition, MetricUnit, Tier};
use super::registry::MetricCatalog;

/// Identifiers of metrics referenced by built-in defaults.
pub mod ids {
    pub const MARKET_CAP: &str = "financials.market_cap_value";
    pub const ENTERPRISE_VALUE: &str = "financials.enterprise_value_value";
    pub const CASH: &str = "financials.cash_value";
    pub const DEBT: &str = "financials.debt_value";
    pub const NET_FINANCIAL_ASSETS: &str = "financials.net_financial_assets";
    pub const FREE_CASH_FLOW: &str = "financials.free_cash_flow";
    pub const EV_PER_RESOURCE_OZ: &str = "valuation.ev_per_resource_oz_all";
    pub const EV_PER_RESERVE_OZ: &str = "valuation.ev_per_reserve_oz_all";
    pub const RESERVES_TOTAL: &str = "reserves.reserves_total_aueq_moz";
    pub const RESOURCES_TOTAL: &str = "resources.resources_total_aueq_moz";
    pub const MEASURED_INDICATED_TOTAL: &str = "resources.mi_total_aueq_moz";
    pub const CURRENT_PRODUCTION: &str = "production.current_production_total_aueq_koz";
    pub const AISC_LAST_YEAR: &str = "costs.aisc_last_year";
    pub const OPERATING_MARGIN: &str = "financials.operating_margin";
    pub const PRICE_TO_BOOK: &str = "valuation.price_to_book";
    pub const EV_TO_EBITDA: &str = "valuation.ev_to_ebitda";
}

use MetricCategory as C;
use MetricUnit as U;
use Tier as T;

/// (id, label, category, unit, higher_is_better, min_tier)
const STANDARD_METRICS: &[(&str, &str, MetricCategory, MetricUnit, bool, Tier)] = &[
    // Financials
    (ids::MARKET_CAP, "Market Cap", C::Financials, U::Currency, true, T::Free),
    (ids::ENTERPRISE_VALUE, "Enterprise Value", C::Financials, U::Currency, true, T::Free),
    (ids::CASH, "Cash", C::Financials, U::Currency, true, T::Free),
    (ids::DEBT, "Debt", C::Financials, U::Currency, false, T::Free),
    (ids::NET_FINANCIAL_ASSETS, "Net Financial Assets", C::Financials, U::Currency, true, T::Free),
    (ids::FREE_CASH_FLOW, "Free Cash Flow", C::Financials, U::Currency, true, T::Pro),
    ("financials.revenue_value", "Revenue", C::Financials, U::Currency, true, T::Free),
    ("financials.ebitda", "EBITDA", C::Financials, U::Currency, true, T::Pro),
    ("financials.net_income_value", "Net Income", C::Financials, U::Currency, true, T::Pro),
    (ids::OPERATING_MARGIN, "Operating Margin", C::Financials, U::Percent, true, T::Pro),
    // Capital structure
    ("capital_structure.existing_shares", "Shares Outstanding", C::CapitalStructure, U::Count, false, T::Free),
    ("capital_structure.fully_diluted_shares", "Fully Diluted Shares", C::CapitalStructure, U::Count, false, T::Pro),
    ("capital_structure.insider_ownership_pct", "Insider Ownership", C::CapitalStructure, U::Percent, true, T::Premium),
    // Valuation
    (ids::EV_PER_RESOURCE_OZ, "EV / Resource oz", C::Valuation, U::CurrencyPerOunce, false, T::Pro),
    (ids::EV_PER_RESERVE_OZ, "EV / Reserve oz", C::Valuation, U::CurrencyPerOunce, false, T::Pro),
    ("valuation.mkt_cap_per_resource_oz_all", "Market Cap / Resource oz", C::Valuation, U::CurrencyPerOunce, false, T::Pro),
    ("valuation.mkt_cap_per_reserve_oz_all", "Market Cap / Reserve oz", C::Valuation, U::CurrencyPerOunce, false, T::Pro),
    ("valuation.ev_per_production_oz", "EV / Production oz", C::Valuation, U::CurrencyPerOunce, false, T::Premium),
    (ids::PRICE_TO_BOOK, "Price / Book", C::Valuation, U::Ratio, false, T::Free),
    (ids::EV_TO_EBITDA, "EV / EBITDA", C::Valuation, U::Ratio, false, T::Pro),
    // Reserves
    (ids::RESERVES_TOTAL, "Total Reserves (AuEq)", C::Reserves, U::MillionOunces, true, T::Free),
    ("reserves.reserves_precious_aueq_moz", "Precious Reserves (AuEq)", C::Reserves, U::MillionOunces, true, T::Pro),
    ("reserves.reserve_life_years", "Reserve Life", C::Reserves, U::Years, true, T::Premium),
    // Resources
    (ids::RESOURCES_TOTAL, "Total Resources (AuEq)", C::Resources, U::MillionOunces, true, T::Free),
    (ids::MEASURED_INDICATED_TOTAL, "Measured & Indicated (AuEq)", C::Resources, U::MillionOunces, true, T::Pro),
    ("resources.inferred_total_aueq_moz", "Inferred (AuEq)", C::Resources, U::MillionOunces, true, T::Pro),
    ("resources.potential_total_aueq_moz", "Potential (AuEq)", C::Resources, U::MillionOunces, true, T::Premium),
    ("resources.mineable_total_aueq_moz", "Mineable (AuEq)", C::Resources, U::MillionOunces, true, T::Premium),
    // Production
    (ids::CURRENT_PRODUCTION, "Current Production (AuEq)", C::Production, U::ThousandOunces, true, T::Free),
    ("production.future_production_total_aueq_koz", "Future Production (AuEq)", C::Production, U::ThousandOunces, true, T::Premium),
    ("production.production_growth_pct", "Production Growth", C::Production, U::Percent, true, T::Premium),
    // Costs
    (ids::AISC_LAST_YEAR, "AISC (last year)", C::Costs, U::CurrencyPerOunce, false, T::Pro),
    ("costs.aisc_future", "AISC (future)", C::Costs, U::CurrencyPerOunce, false, T::Premium),
    ("costs.aic_last_year", "AIC (last year)", C::Costs, U::CurrencyPerOunce, false, T::Pro),
    ("costs.construction_costs", "Construction Costs", C::Costs, U::Currency, false, T::Premium),
    ("costs.tco_current", "Total Cost of Ownership", C::Costs, U::CurrencyPerOunce, false, T::Premium),
];

impl MetricCatalog {
    /// Build the standard registry.
    #[must_use]
    pub fn standard() -> Self {
        let definitions: IndexMap<String, MetricDefinition> = STANDARD_METRICS
            .iter()
            .map(|&(id, label, category, unit, higher_is_better, min_tier)| {
                (
                    id.to_string(),
                    MetricDefinition::new(id, label, category, unit, higher_is_better, min_tier),
                )
            })
            .collect();
        Self { definitions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_standard_ids_unique() {
        let unique: HashSet<_> = STANDARD_METRICS.iter().map(|m| m.0).collect();
        assert_eq!(unique.len(), STANDARD_METRICS.len());
        assert_eq!(MetricCatalog::standard().len(), STANDARD_METRICS.len());
    }

    #[test]
    fn test_referenced_ids_registered() {
        let catalog = MetricCatalog::standard();
        for id in [
            ids::MARKET_CAP,
            ids::ENTERPRISE_VALUE,
            ids::CASH,
            ids::DEBT,
            ids::NET_FINANCIAL_ASSETS,
            ids::FREE_CASH_FLOW,
            ids::EV_PER_RESOURCE_OZ,
            ids::EV_PER_RESERVE_OZ,
            ids::RESERVES_TOTAL,
            ids::RESOURCES_TOTAL,
            ids::MEASURED_INDICATED_TOTAL,
            ids::CURRENT_PRODUCTION,
            ids::AISC_LAST_YEAR,
            ids::OPERATING_MARGIN,
            ids::PRICE_TO_BOOK,
            ids::EV_TO_EBITDA,
        ] {
            assert!(catalog.contains(id), "{id} missing from standard catalog");
        }
    }

    #[test]
    fn test_cost_metrics_are_lower_is_better() {
        let catalog = MetricCatalog::standard();
        for def in catalog.by_category(MetricCategory::Costs) {
            assert!(!def.higher_is_better, "{} should be lower-is-better", def.id);
        }
    }

    #[test]
    fn test_every_tier_has_metrics() {
        let catalog = MetricCatalog::standard();
        let free = catalog.accessible_to(Tier::Free).len();
        let pro = catalog.accessible_to(Tier::Pro).len();
        let premium = catalog.accessible_to(Tier::Premium).len();
        assert!(free > 0);
        assert!(free < pro);
        assert!(pro < premium);
        assert_eq!(premium, catalog.len());
    }
}
