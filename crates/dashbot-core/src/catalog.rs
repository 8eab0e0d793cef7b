//! Dashboard catalog: report links, table identifiers and filter vocabularies.
//!
//! Entry, dimension and value order is significant. The phrase matcher reports
//! matches in declaration order, so the first declared entry wins when a
//! caller only keeps one.

use crate::error::{AppError, Result};
use crate::types::DashboardName;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A filterable axis of a dashboard's table and its allowed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Dimension {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One dashboard as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardEntry {
    /// Canonical name, must already be normalized
    pub name: DashboardName,
    /// Label offered to the user
    pub label: String,
    /// Base report URL; `None` means the dashboard is not wired to a report
    #[serde(default)]
    pub url: Option<String>,
    /// Table identifier used in filter clauses
    pub table: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

impl DashboardEntry {
    /// Create an entry whose name is derived from its label
    pub fn new(label: impl Into<String>, table: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            name: DashboardName::normalize(&label),
            label,
            url: None,
            table: table.into(),
            dimensions: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Look up a dimension by its exact configured name
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn dimension_names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    fn validate(&self) -> Result<()> {
        if !self.name.is_normalized() {
            return Err(AppError::validation(format!(
                "dashboard name '{}' is not normalized (expected '{}')",
                self.name,
                DashboardName::normalize(self.name.as_str())
            )));
        }

        if DashboardName::normalize(&self.label) != self.name {
            return Err(AppError::validation(format!(
                "dashboard '{}' is offered as '{}', which would select '{}'",
                self.name,
                self.label,
                DashboardName::normalize(&self.label)
            )));
        }

        if self.table.trim().is_empty() {
            return Err(AppError::validation(format!(
                "dashboard '{}' has an empty table identifier",
                self.name
            )));
        }

        if matches!(&self.url, Some(url) if url.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "dashboard '{}' has an empty url",
                self.name
            )));
        }

        let mut seen_dimensions = HashSet::new();
        for dimension in &self.dimensions {
            if dimension.name.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "dashboard '{}' has an unnamed dimension",
                    self.name
                )));
            }
            if !seen_dimensions.insert(dimension.name.as_str()) {
                return Err(AppError::validation(format!(
                    "dashboard '{}' declares dimension '{}' twice",
                    self.name, dimension.name
                )));
            }

            let mut seen_values = HashSet::new();
            for value in &dimension.values {
                if value.is_empty() {
                    return Err(AppError::validation(format!(
                        "dimension '{}' of dashboard '{}' has an empty value",
                        dimension.name, self.name
                    )));
                }
                if !seen_values.insert(value.as_str()) {
                    return Err(AppError::validation(format!(
                        "dimension '{}' of dashboard '{}' declares value '{}' twice",
                        dimension.name, self.name, value
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Validated, ordered set of dashboards
#[derive(Debug, Clone)]
pub struct DashboardCatalog {
    entries: Vec<DashboardEntry>,
    index: HashMap<DashboardName, usize>,
}

impl DashboardCatalog {
    /// Build a catalog, rejecting misconfigured entries up front
    pub fn new(entries: Vec<DashboardEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            entry.validate()?;
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(AppError::validation(format!(
                    "dashboard '{}' is configured twice",
                    entry.name
                )));
            }
        }

        debug!(dashboards = entries.len(), "Dashboard catalog loaded");

        Ok(Self { entries, index })
    }

    /// Catalog of the dashboards shipped with the bot
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_entries())
    }

    pub fn get(&self, name: &DashboardName) -> Option<&DashboardEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &DashboardName) -> bool {
        self.index.contains_key(name)
    }

    pub fn entries(&self) -> &[DashboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in declaration order
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Table identifier used in filter clauses for this dashboard
    pub fn table(&self, name: &DashboardName) -> Option<&str> {
        self.get(name).map(|e| e.table.as_str())
    }

    pub fn link_resolver(&self) -> LinkResolver {
        LinkResolver::from_catalog(self)
    }
}

/// Maps a dashboard to its base report URL.
///
/// A missing link is an ordinary outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    links: HashMap<DashboardName, String>,
}

impl LinkResolver {
    pub fn from_catalog(catalog: &DashboardCatalog) -> Self {
        let links = catalog
            .entries()
            .iter()
            .filter_map(|e| e.url.clone().map(|url| (e.name.clone(), url)))
            .collect();
        Self { links }
    }

    pub fn resolve(&self, name: &DashboardName) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }
}

fn power_bi_report(group: &str, section: &str) -> String {
    format!("https://app.powerbi.com/groups/me/reports/{group}/{section}?experience=power-bi")
}

pub(crate) fn builtin_entries() -> Vec<DashboardEntry> {
    const SALES_GROUP: &str = "07353a90-7b2a-44fe-92d3-d6b8565fa43e";
    const OPERATIONS_GROUP: &str = "b5d3ec85-a88d-4241-8dca-61c3852e3f66";

    vec![
        DashboardEntry::new("Sales Revenue", "PRILFY2023")
            .with_url(power_bi_report(SALES_GROUP, "ReportSection8da7d6bdc07307d92cd8"))
            .with_dimension(Dimension::new("Company", ["DEW", "ICON", "PRIL"]))
            .with_dimension(Dimension::new("Segment", ["Select all", "Other Sales", "Sleeper"]))
            .with_dimension(Dimension::new(
                "Sales Group",
                [
                    "Asset Sales",
                    "Scrap Sales",
                    "Sleeper Sales",
                    "Sleeper Transportation Income",
                    "Traded Goods Sales",
                ],
            ))
            .with_dimension(Dimension::new("Year", ["2022", "2023"])),
        DashboardEntry::new("Cost Analysis", "CostAnalysisTable").with_url(power_bi_report(
            OPERATIONS_GROUP,
            "ReportSection76e661661e1efa82616c",
        )),
        DashboardEntry::new("Production", "ProductionTable").with_url(power_bi_report(
            OPERATIONS_GROUP,
            "ReportSection0b965e5f0ff4c1d12917",
        )),
        DashboardEntry::new("Raw Material", "RawMaterialTable")
            .with_url(power_bi_report(OPERATIONS_GROUP, "ReportSectionfbdc3e3fdaae956b9024"))
            .with_dimension(Dimension::new(
                "Plant",
                [
                    "Anara",
                    "BBSR",
                    "Bhurwal",
                    "BLSPR CP",
                    "BLSPR LL",
                    "Gaya",
                    "Hubli",
                    "Mirza",
                    "Pathri",
                    "Sholaka",
                    "TMQ",
                    "Udvada",
                    "Wadiyaram",
                ],
            )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = DashboardCatalog::builtin().unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.labels(),
            vec!["Sales Revenue", "Cost Analysis", "Production", "Raw Material"]
        );

        let sales = catalog.get(&DashboardName::from("Sales Revenue")).unwrap();
        assert_eq!(sales.table, "PRILFY2023");
        assert_eq!(
            sales.dimension_names(),
            vec!["Company", "Segment", "Sales Group", "Year"]
        );
        assert_eq!(
            sales.dimension("Company").unwrap().values,
            vec!["DEW", "ICON", "PRIL"]
        );

        let production = catalog.get(&DashboardName::from("production")).unwrap();
        assert!(production.dimensions.is_empty());
        assert_eq!(catalog.table(&production.name), Some("ProductionTable"));
    }

    #[test]
    fn test_link_resolver() {
        let resolver = DashboardCatalog::builtin().unwrap().link_resolver();

        let link = resolver.resolve(&DashboardName::from("raw_material")).unwrap();
        assert!(link.starts_with("https://app.powerbi.com/groups/me/reports/"));
        assert!(link.ends_with("?experience=power-bi"));

        assert_eq!(resolver.resolve(&DashboardName::from("inventory")), None);
    }

    #[test]
    fn test_entry_without_url_is_not_resolved() {
        let catalog =
            DashboardCatalog::new(vec![DashboardEntry::new("Inventory", "InventoryTable")])
                .unwrap();
        let name = DashboardName::from("inventory");

        assert!(catalog.contains(&name));
        assert_eq!(catalog.link_resolver().resolve(&name), None);
    }

    #[test]
    fn test_rejects_duplicate_dashboard() {
        let result = DashboardCatalog::new(vec![
            DashboardEntry::new("Production", "A"),
            DashboardEntry::new("production", "B"),
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_dimension() {
        let entry = DashboardEntry::new("Production", "ProductionTable")
            .with_dimension(Dimension::new("Plant", ["Gaya"]))
            .with_dimension(Dimension::new("Plant", ["Hubli"]));
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_value() {
        let entry = DashboardEntry::new("Production", "ProductionTable")
            .with_dimension(Dimension::new("Plant", ["Gaya", "Gaya"]));
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_value() {
        let entry = DashboardEntry::new("Production", "ProductionTable")
            .with_dimension(Dimension::new("Plant", ["Gaya", ""]));
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_unnamed_dimension() {
        let entry = DashboardEntry::new("Production", "ProductionTable")
            .with_dimension(Dimension::new(" ", ["Gaya"]));
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_url() {
        let entry = DashboardEntry::new("Production", "ProductionTable").with_url("  ");
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_label_selecting_another_dashboard() {
        let mut entry = DashboardEntry::new("Sales Revenue", "PRILFY2023");
        entry.label = "Sales Revenues".to_string();

        let err = DashboardCatalog::new(vec![entry]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("sales_revenues"));
    }

    #[test]
    fn test_accepts_label_with_punctuation() {
        let mut entry = DashboardEntry::new("Production", "ProductionTable");
        entry.label = "Production.".to_string();
        assert!(DashboardCatalog::new(vec![entry]).is_ok());
    }

    #[test]
    fn test_rejects_empty_table() {
        let entry = DashboardEntry::new("Production", "  ");
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_unnormalized_name() {
        let mut entry = DashboardEntry::new("Production", "ProductionTable");
        entry.name = serde_json::from_str("\"Production Line\"").unwrap();
        assert!(matches!(DashboardCatalog::new(vec![entry]), Err(AppError::Validation(_))));
    }
}
