use std::sync::Arc;

use thiserror::Error;

use crate::catalog::DomainCatalog;

/// A (domain, query) pair that is known to belong together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub domain: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("query {query:?} is not offered for domain {domain:?}")]
    InvalidSelection { domain: String, query: String },
    #[error("unknown domain {0:?}")]
    UnknownDomain(String),
}

/// Current domain/query choice, always consistent with the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    catalog: Arc<DomainCatalog>,
    current: Option<Selection>,
}

impl SelectionState {
    /// Starts on the first domain and its first query, the same way the
    /// selectors are populated on page load.
    pub fn new(catalog: Arc<DomainCatalog>) -> Self {
        let current = catalog.first_domain().and_then(|domain| {
            catalog.queries_for(domain).first().map(|query| Selection {
                domain: domain.to_string(),
                query: query.to_string(),
            })
        });
        Self { catalog, current }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn queries_for(&self, domain: &str) -> Vec<&str> {
        self.catalog.queries_for(domain)
    }

    /// Queries of the currently selected domain.
    pub fn current_queries(&self) -> Vec<&str> {
        self.current
            .as_ref()
            .map(|s| self.catalog.queries_for(&s.domain))
            .unwrap_or_default()
    }

    /// Selects an explicit pair. On error the previous selection is kept.
    pub fn select(&mut self, domain: &str, query: &str) -> Result<&Selection, SelectionError> {
        if !self.catalog.contains(domain, query) {
            return Err(SelectionError::InvalidSelection {
                domain: domain.to_string(),
                query: query.to_string(),
            });
        }
        Ok(self.current.insert(Selection {
            domain: domain.to_string(),
            query: query.to_string(),
        }))
    }

    /// Switches domain and defaults the query to the first one offered.
    ///
    /// Returns the new pair so the caller can notify whoever submits the form.
    pub fn select_domain(&mut self, domain: &str) -> Result<&Selection, SelectionError> {
        let first = self
            .catalog
            .queries_for(domain)
            .first()
            .map(|q| q.to_string())
            .ok_or_else(|| SelectionError::UnknownDomain(domain.to_string()))?;
        Ok(self.current.insert(Selection {
            domain: domain.to_string(),
            query: first,
        }))
    }

    /// Selects a query within the current domain.
    pub fn select_query(&mut self, query: &str) -> Result<&Selection, SelectionError> {
        let domain = match &self.current {
            Some(current) => current.domain.clone(),
            None => {
                return Err(SelectionError::InvalidSelection {
                    domain: String::new(),
                    query: query.to_string(),
                })
            }
        };
        self.select(&domain, query)
    }

    /// Like [`select`](Self::select) but recovers from a mismatched query by
    /// falling back to the first query of `domain`.
    pub fn select_or_fallback(
        &mut self,
        domain: &str,
        query: &str,
    ) -> Result<&Selection, SelectionError> {
        if self.catalog.contains(domain, query) {
            return self.select(domain, query);
        }
        self.select_domain(domain)
    }
}
