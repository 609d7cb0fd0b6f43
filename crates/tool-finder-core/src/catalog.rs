/// The static tool catalog.
///
/// The bundled JSON is compiled into the binary; `CATALOG_PATH` may point to a
/// replacement file with the same shape. Records are validated once at load
/// time and never mutated afterwards.
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::model::Tool;

const BUNDLED_CATALOG: &str = include_str!("../data/tools.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<Tool>,
    fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogStats {
    pub tool_count: usize,
    pub category_count: usize,
    pub total_reviews: u64,
    pub average_rating: f64,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CoreError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::CatalogIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        let tools: Vec<Tool> = serde_json::from_str(content)?;
        validate(&tools)?;
        Ok(Self {
            tools,
            fingerprint: fingerprint(content),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_tools(tools: Vec<Tool>) -> Result<Self, CoreError> {
        validate(&tools)?;
        let json = serde_json::to_string(&tools)?;
        Ok(Self {
            fingerprint: fingerprint(&json),
            tools,
        })
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// Exact id first, then ignoring ASCII case.
    pub fn find(&self, id: &str) -> Option<&Tool> {
        let id = id.trim();
        self.get(id)
            .or_else(|| self.tools.iter().find(|t| t.id.eq_ignore_ascii_case(id)))
    }

    /// Looks up each id in order; unknown ids are skipped.
    pub fn resolve<I, S>(&self, ids: I) -> Vec<&Tool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.find(id.as_ref()))
            .collect()
    }

    /// The first `n` tools in catalog order.
    pub fn featured(&self, n: usize) -> &[Tool] {
        &self.tools[..n.min(self.tools.len())]
    }

    pub fn stats(&self) -> CatalogStats {
        let categories: BTreeSet<_> = self.tools.iter().map(|t| t.category).collect();
        let total_reviews = self.tools.iter().map(|t| u64::from(t.review_count)).sum();
        let average_rating = if self.tools.is_empty() {
            0.0
        } else {
            let sum: f64 = self.tools.iter().map(|t| t.rating).sum();
            (sum / self.tools.len() as f64 * 100.0).round() / 100.0
        };
        CatalogStats {
            tool_count: self.tools.len(),
            category_count: categories.len(),
            total_reviews,
            average_rating,
        }
    }

    /// SHA-256 of the catalog source, lowercase hex.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn validate(tools: &[Tool]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for tool in tools {
        if tool.id.trim().is_empty() {
            return Err(CoreError::InvalidCatalog("tool with empty id".to_string()));
        }
        if tool.name.trim().is_empty() {
            return Err(CoreError::InvalidCatalog(format!("tool {} has an empty name", tool.id)));
        }
        if !seen.insert(tool.id.to_ascii_lowercase()) {
            return Err(CoreError::InvalidCatalog(format!("duplicate tool id: {}", tool.id)));
        }
        if !tool.rating.is_finite() || !(0.0..=5.0).contains(&tool.rating) {
            return Err(CoreError::InvalidCatalog(format!(
                "tool {} has rating {} outside [0, 5]",
                tool.id, tool.rating
            )));
        }
        if let Some(price) = tool.pricing.starting_price {
            if !tool.pricing.kind.carries_price() {
                return Err(CoreError::InvalidCatalog(format!(
                    "tool {} is {} but declares a starting price",
                    tool.id,
                    tool.pricing.kind.id()
                )));
            }
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::InvalidCatalog(format!(
                    "tool {} has invalid starting price {price}",
                    tool.id
                )));
            }
        }
    }
    Ok(())
}

fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{BillingPeriod, Category, Platform, Pricing, PricingType, Tool};

    pub fn tool(id: &str, name: &str, category: Category, rating: f64) -> Tool {
        Tool {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            short_description: format!("{name} in short"),
            category,
            subcategory: None,
            website: format!("https://{id}.example"),
            pricing: Pricing {
                kind: PricingType::Freemium,
                starting_price: Some(10.0),
                currency: "USD".to_string(),
                billing_period: BillingPeriod::Monthly,
            },
            features: vec!["Feature one".to_string()],
            platforms: vec![Platform::Web],
            rating,
            review_count: 100,
            pros: vec![],
            cons: vec![],
            use_cases: vec![],
            tags: vec![],
            is_popular: false,
            is_trending: false,
        }
    }
}
