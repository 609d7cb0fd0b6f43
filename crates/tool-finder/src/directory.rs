use std::sync::Arc;
use std::time::Duration;

use tool_finder_core::catalog::Catalog;
use tool_finder_core::filter::{facet_counts, FacetCounts};
use tool_finder_core::handoff::HandoffStore;
use tool_finder_core::mcp_api::{CategoryListResponse, CategorySummary};
use tool_finder_core::model::Category;

/// Read-only catalog plus the process-wide handoff channel. Shared by the
/// MCP server and the HTTP API; page state lives in `session`.
#[derive(Clone)]
pub struct Directory {
    pub catalog: Arc<Catalog>,
    /// Filter panel counts, computed once over the unfiltered catalog.
    pub facets: Arc<FacetCounts>,
    pub handoff: HandoffStore,
    pub submit_delay: Duration,
}

impl Directory {
    pub fn new(catalog: Catalog, handoff: HandoffStore, submit_delay: Duration) -> Self {
        let facets = facet_counts(catalog.tools());
        Self {
            catalog: Arc::new(catalog),
            facets: Arc::new(facets),
            handoff,
            submit_delay,
        }
    }

    /// Every category in panel order, including empty ones.
    pub fn category_list(&self) -> CategoryListResponse {
        let categories = Category::ALL
            .into_iter()
            .map(|category| CategorySummary {
                category,
                tool_count: self.facets.category(category),
            })
            .collect();
        CategoryListResponse {
            categories,
            stats: self.catalog.stats(),
        }
    }
}
