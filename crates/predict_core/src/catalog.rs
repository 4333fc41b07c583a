use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const JOB_MARKET: &str = "Job Market (Industry Trend Analysis)";
pub const GAS_PRICES: &str = "Gas Prices (Industry Trend Analysis)";
pub const E_COMMERCE: &str = "E-commerce (Price Prediction)";
pub const REAL_ESTATE: &str = "RealEstate";

/// How responses for a domain are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DomainStyle {
    /// Free text, optionally a table for queries flagged `tabular`.
    #[default]
    Prose,
    /// Job-listing records, structured or embedded in text.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub id: String,
    /// The backend answers this query with a caption/rows/summary block.
    #[serde(default)]
    pub tabular: bool,
}

impl QuerySpec {
    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tabular: false,
        }
    }

    pub fn table(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tabular: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub name: String,
    #[serde(default)]
    pub style: DomainStyle,
    pub queries: Vec<QuerySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("domain {0:?} has no queries")]
    EmptyDomain(String),
    #[error("domain {0:?} is listed more than once")]
    DuplicateDomain(String),
    #[error("query {query:?} is listed more than once in domain {domain:?}")]
    DuplicateQuery { domain: String, query: String },
}

/// Static mapping of domain to its ordered, non-empty list of queries.
///
/// Construction validates the mapping, and deserialization goes through the
/// same validation, so every domain a catalog knows has at least one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DomainSpec>", into = "Vec<DomainSpec>")]
pub struct DomainCatalog {
    domains: Vec<DomainSpec>,
}

impl DomainCatalog {
    pub fn new(domains: Vec<DomainSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for domain in &domains {
            if domain.queries.is_empty() {
                return Err(CatalogError::EmptyDomain(domain.name.clone()));
            }
            if !seen.insert(domain.name.as_str()) {
                return Err(CatalogError::DuplicateDomain(domain.name.clone()));
            }
            let mut queries = HashSet::new();
            for query in &domain.queries {
                if !queries.insert(query.id.as_str()) {
                    return Err(CatalogError::DuplicateQuery {
                        domain: domain.name.clone(),
                        query: query.id.clone(),
                    });
                }
            }
        }
        Ok(Self { domains })
    }

    /// The domains and queries the prediction backend serves out of the box.
    pub fn builtin() -> Self {
        Self {
            domains: vec![
                DomainSpec {
                    name: JOB_MARKET.to_string(),
                    style: DomainStyle::Listing,
                    queries: vec![
                        QuerySpec::text("Job Market Query 1 Software Engineering"),
                        QuerySpec::text("Job Market Query 2 Data Science"),
                        QuerySpec::text("Job Market Query 3 DevOps"),
                    ],
                },
                DomainSpec {
                    name: GAS_PRICES.to_string(),
                    style: DomainStyle::Prose,
                    queries: vec![
                        QuerySpec::text("Gas Prices Query 1"),
                        QuerySpec::table("Gas Prices Query 2 Yearly Averages"),
                    ],
                },
                DomainSpec {
                    name: E_COMMERCE.to_string(),
                    style: DomainStyle::Prose,
                    queries: vec![
                        QuerySpec::text("Airfare Inflation Rate Query 1"),
                        QuerySpec::table("E-commerce Query 2 Book Prices"),
                    ],
                },
                DomainSpec {
                    name: REAL_ESTATE.to_string(),
                    style: DomainStyle::Prose,
                    queries: vec![
                        QuerySpec::text("Real Estate Query 1 Philadelphia"),
                        QuerySpec::text("Real Estate Query 2 New York"),
                    ],
                },
            ],
        }
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.name.as_str())
    }

    pub fn first_domain(&self) -> Option<&str> {
        self.domains.first().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Ordered queries for `domain`; empty for a domain the catalog does not know.
    pub fn queries_for(&self, domain: &str) -> Vec<&str> {
        self.find(domain)
            .map(|d| d.queries.iter().map(|q| q.id.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.find(domain).is_some()
    }

    pub fn contains(&self, domain: &str, query: &str) -> bool {
        self.find_query(domain, query).is_some()
    }

    pub fn style(&self, domain: &str) -> Option<DomainStyle> {
        self.find(domain).map(|d| d.style)
    }

    pub fn is_listing(&self, domain: &str) -> bool {
        self.style(domain) == Some(DomainStyle::Listing)
    }

    /// True only when `query` belongs to `domain` and is flagged tabular.
    pub fn is_tabular(&self, domain: &str, query: &str) -> bool {
        self.find_query(domain, query).is_some_and(|q| q.tabular)
    }

    fn find(&self, domain: &str) -> Option<&DomainSpec> {
        self.domains.iter().find(|d| d.name == domain)
    }

    fn find_query(&self, domain: &str, query: &str) -> Option<&QuerySpec> {
        self.find(domain)
            .and_then(|d| d.queries.iter().find(|q| q.id == query))
    }
}

impl Default for DomainCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<DomainSpec>> for DomainCatalog {
    type Error = CatalogError;

    fn try_from(domains: Vec<DomainSpec>) -> Result<Self, Self::Error> {
        Self::new(domains)
    }
}

impl From<DomainCatalog> for Vec<DomainSpec> {
    fn from(catalog: DomainCatalog) -> Self {
        catalog.domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = DomainCatalog::builtin();
        let rebuilt = DomainCatalog::new(builtin.domains.clone()).unwrap();
        assert_eq!(rebuilt, builtin);
    }

    #[test]
    fn duplicate_query_within_domain_is_rejected() {
        let err = DomainCatalog::new(vec![DomainSpec {
            name: "d".into(),
            style: DomainStyle::Prose,
            queries: vec![QuerySpec::text("q"), QuerySpec::table("q")],
        }])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateQuery {
                domain: "d".into(),
                query: "q".into()
            }
        );
    }
}
