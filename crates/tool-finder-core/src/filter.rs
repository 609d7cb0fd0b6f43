/// Search, facet filtering and sorting over the in-memory catalog.
///
/// Every operation here is a linear, order-preserving pass followed by a
/// stable sort; nothing can fail and an empty result is a valid outcome.
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Category, Platform, PricingType, SortKey, Tool};

/// Tools page filter state. `Default` is "no filters, sort by popularity".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterState {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub pricing: BTreeSet<PricingType>,
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub sort_by: SortKey,
}

impl FilterState {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    pub fn toggle_pricing(&mut self, pricing: PricingType) {
        if !self.pricing.remove(&pricing) {
            self.pricing.insert(pricing);
        }
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.sort_by = sort_by;
    }

    /// "Clear all" in the filter panel. Search text and sort order survive.
    pub fn clear_filters(&mut self) {
        self.category = None;
        self.pricing.clear();
        self.platforms.clear();
    }

    pub fn has_active_filters(&self) -> bool {
        self.category.is_some() || !self.pricing.is_empty() || !self.platforms.is_empty()
    }

    fn normalized_query(&self) -> Option<String> {
        let q = self.query.trim();
        (!q.is_empty()).then(|| q.to_lowercase())
    }
}

pub fn apply_filters<'a>(tools: &'a [Tool], state: &FilterState) -> Vec<&'a Tool> {
    let query = state.normalized_query();

    let mut filtered: Vec<&Tool> = tools
        .iter()
        .filter(|t| query.as_deref().map_or(true, |q| matches_query(t, q)))
        .filter(|t| state.category.map_or(true, |c| t.category == c))
        .filter(|t| state.pricing.is_empty() || state.pricing.contains(&t.pricing.kind))
        .filter(|t| {
            state.platforms.is_empty() || state.platforms.iter().any(|p| t.supports(*p))
        })
        .collect();

    sort_tools(&mut filtered, state.sort_by);
    filtered
}

/// Stable sort; ties keep catalog order.
pub fn sort_tools(tools: &mut [&Tool], sort_by: SortKey) {
    match sort_by {
        SortKey::Popularity => {
            tools.sort_by(|a, b| desc(a.popularity_score(), b.popularity_score()))
        }
        SortKey::Rating => tools.sort_by(|a, b| desc(a.rating, b.rating)),
        SortKey::Name => tools.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Price => tools.sort_by(|a, b| {
            a.starting_price_or_zero()
                .partial_cmp(&b.starting_price_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Case-insensitive first, then exact, so "copy.ai" and "Copy.ai" stay adjacent.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn matches_query(tool: &Tool, query: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(query);
    hit(&tool.name)
        || hit(&tool.description)
        || hit(tool.category.name())
        || tool.tags.iter().any(|t| hit(t))
        || tool.features.iter().any(|f| hit(f))
}

/// Compare page picker: name/description search, optional category,
/// already-selected tools excluded, capped at `limit`, catalog order.
pub fn candidate_search<'a>(
    tools: &'a [Tool],
    query: &str,
    category: Option<Category>,
    exclude: &[&str],
    limit: usize,
) -> Vec<&'a Tool> {
    let query = query.trim().to_lowercase();
    tools
        .iter()
        .filter(|t| {
            query.is_empty()
                || t.name.to_lowercase().contains(&query)
                || t.description.to_lowercase().contains(&query)
        })
        .filter(|t| category.map_or(true, |c| t.category == c))
        .filter(|t| !exclude.contains(&t.id.as_str()))
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FacetCounts {
    pub total: usize,
    pub categories: BTreeMap<Category, usize>,
    pub pricing: BTreeMap<PricingType, usize>,
    pub platforms: BTreeMap<Platform, usize>,
}

impl FacetCounts {
    pub fn category(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    pub fn pricing(&self, pricing: PricingType) -> usize {
        self.pricing.get(&pricing).copied().unwrap_or(0)
    }

    pub fn platform(&self, platform: Platform) -> usize {
        self.platforms.get(&platform).copied().unwrap_or(0)
    }
}

/// Option counts for the filter panel, over whatever slice is passed in.
pub fn facet_counts(tools: &[Tool]) -> FacetCounts {
    let mut counts = FacetCounts {
        total: tools.len(),
        ..FacetCounts::default()
    };
    for tool in tools {
        *counts.categories.entry(tool.category).or_default() += 1;
        *counts.pricing.entry(tool.pricing.kind).or_default() += 1;
        for platform in &tool.platforms {
            *counts.platforms.entry(*platform).or_default() += 1;
        }
    }
    counts
}
