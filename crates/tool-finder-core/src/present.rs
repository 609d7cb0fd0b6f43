/// View models for the Tools and Compare pages.
///
/// These are pure projections of catalog records and page state. They carry
/// everything a renderer needs (labels, tones, truncated lists) so that no
/// renderer has to look anything up by string.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::compare::ComparisonSet;
use crate::filter::{FacetCounts, FilterState};
use crate::model::{BillingPeriod, Category, Platform, Pricing, PricingType, Tool};

const CARD_FEATURES: usize = 3;
const TABLE_FEATURES: usize = 5;
const TABLE_PROS_CONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Green,
    Blue,
    Orange,
    Purple,
}

impl BadgeTone {
    /// Accent color used by cards and the showcase.
    pub fn hex(self) -> &'static str {
        match self {
            BadgeTone::Green => "#22c55e",
            BadgeTone::Blue => "#3b82f6",
            BadgeTone::Orange => "#f97316",
            BadgeTone::Purple => "#a855f7",
        }
    }
}

impl From<PricingType> for BadgeTone {
    fn from(kind: PricingType) -> Self {
        match kind {
            PricingType::Free => BadgeTone::Green,
            PricingType::Freemium => BadgeTone::Blue,
            PricingType::Paid => BadgeTone::Orange,
            PricingType::Enterprise => BadgeTone::Purple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PricingBadge {
    Free,
    Freemium,
    Paid {
        price: Option<f64>,
        billing_period: BillingPeriod,
    },
    Enterprise,
}

impl PricingBadge {
    pub fn label(&self) -> String {
        match self {
            PricingBadge::Free => "Free".to_string(),
            PricingBadge::Freemium => "Freemium".to_string(),
            PricingBadge::Paid {
                price: Some(price),
                billing_period,
            } => {
                let suffix = match billing_period {
                    BillingPeriod::Monthly => "mo",
                    _ => "yr",
                };
                format!("${}/{suffix}", format_price(*price))
            }
            PricingBadge::Paid { price: None, .. } => "Paid".to_string(),
            PricingBadge::Enterprise => "Enterprise".to_string(),
        }
    }

    pub fn tone(&self) -> BadgeTone {
        match self {
            PricingBadge::Free => BadgeTone::Green,
            PricingBadge::Freemium => BadgeTone::Blue,
            PricingBadge::Paid { .. } => BadgeTone::Orange,
            PricingBadge::Enterprise => BadgeTone::Purple,
        }
    }
}

impl From<&Pricing> for PricingBadge {
    fn from(pricing: &Pricing) -> Self {
        match pricing.kind {
            PricingType::Free => PricingBadge::Free,
            PricingType::Freemium => PricingBadge::Freemium,
            PricingType::Paid => PricingBadge::Paid {
                price: pricing.starting_price,
                billing_period: pricing.billing_period,
            },
            PricingType::Enterprise => PricingBadge::Enterprise,
        }
    }
}

/// Rendered badge: label plus tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BadgeView {
    pub label: String,
    pub tone: BadgeTone,
}

impl From<&Pricing> for BadgeView {
    fn from(pricing: &Pricing) -> Self {
        let badge = PricingBadge::from(pricing);
        Self {
            label: badge.label(),
            tone: badge.tone(),
        }
    }
}

/// Compare page pricing text.
pub fn pricing_display(tool: &Tool) -> String {
    PricingBadge::from(&tool.pricing).label()
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Trending,
    Popular,
    None,
}

impl Highlight {
    pub fn of(tool: &Tool) -> Self {
        if tool.is_trending {
            Highlight::Trending
        } else if tool.is_popular {
            Highlight::Popular
        } else {
            Highlight::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolCard {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub rating: f64,
    pub review_count: u32,
    pub pricing: BadgeView,
    pub category: Category,
    pub features: Vec<String>,
    /// Count of features beyond the ones shown, rendered as "+N more".
    pub more_features: usize,
    pub platforms: Vec<Platform>,
    pub highlight: Highlight,
    pub website: String,
    pub is_comparing: bool,
}

impl ToolCard {
    pub fn new(tool: &Tool, is_comparing: bool) -> Self {
        Self {
            id: tool.id.clone(),
            name: tool.name.clone(),
            short_description: tool.short_description.clone(),
            rating: tool.rating,
            review_count: tool.review_count,
            pricing: BadgeView::from(&tool.pricing),
            category: tool.category,
            features: tool.features.iter().take(CARD_FEATURES).cloned().collect(),
            more_features: tool.features.len().saturating_sub(CARD_FEATURES),
            platforms: tool.platforms.clone(),
            highlight: Highlight::of(tool),
            website: tool.website.clone(),
            is_comparing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
}

impl EmptyState {
    pub fn no_tools() -> Self {
        Self {
            title: "No tools found".to_string(),
            hint: "Try adjusting your filters or search criteria".to_string(),
        }
    }

    pub fn no_candidates() -> Self {
        Self {
            title: "No tools found matching your search criteria.".to_string(),
            hint: "Try adjusting your search or category filter.".to_string(),
        }
    }
}

/// Tools page result area. Layout changes with `view_mode`; content does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolGrid {
    pub view_mode: ViewMode,
    pub result_count: usize,
    pub comparing_count: usize,
    pub cards: Vec<ToolCard>,
    pub empty: Option<EmptyState>,
}

impl ToolGrid {
    pub fn new(tools: &[&Tool], selection: &ComparisonSet, view_mode: ViewMode) -> Self {
        let cards: Vec<ToolCard> = tools
            .iter()
            .map(|t| ToolCard::new(t, selection.contains(&t.id)))
            .collect();
        Self {
            view_mode,
            result_count: cards.len(),
            comparing_count: selection.len(),
            empty: cards.is_empty().then(EmptyState::no_tools),
            cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    pub count: usize,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<BadgeTone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterPanel {
    pub result_count: usize,
    pub show_clear_all: bool,
    /// "All Categories" entry; selected when no category is chosen.
    pub all_categories: FilterOption,
    pub categories: Vec<FilterOption>,
    pub pricing: Vec<FilterOption>,
    pub platforms: Vec<FilterOption>,
}

impl FilterPanel {
    pub fn new(counts: &FacetCounts, state: &FilterState, result_count: usize) -> Self {
        let all_categories = FilterOption {
            id: "all".to_string(),
            label: "All Categories".to_string(),
            count: counts.total,
            selected: state.category.is_none(),
            tone: None,
        };
        let categories = Category::ALL
            .into_iter()
            .map(|c| FilterOption {
                id: c.name().to_string(),
                label: c.name().to_string(),
                count: counts.category(c),
                selected: state.category == Some(c),
                tone: None,
            })
            .collect();
        let pricing = PricingType::ALL
            .into_iter()
            .map(|p| FilterOption {
                id: p.id().to_string(),
                label: p.label().to_string(),
                count: counts.pricing(p),
                selected: state.pricing.contains(&p),
                tone: Some(BadgeTone::from(p)),
            })
            .collect();
        let platforms = Platform::ALL
            .into_iter()
            .map(|p| FilterOption {
                id: p.id().to_string(),
                label: p.label().to_string(),
                count: counts.platform(p),
                selected: state.platforms.contains(&p),
                tone: None,
            })
            .collect();
        Self {
            result_count,
            show_clear_all: state.has_active_filters(),
            all_categories,
            categories,
            pricing,
            platforms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonColumn {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub rating: f64,
    pub review_count: u32,
    pub pricing: String,
    pub category: Category,
    pub subcategory: Option<String>,
    pub platforms: Vec<Platform>,
    pub features: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub website: String,
}

impl From<&Tool> for ComparisonColumn {
    fn from(tool: &Tool) -> Self {
        Self {
            id: tool.id.clone(),
            name: tool.name.clone(),
            short_description: tool.short_description.clone(),
            rating: tool.rating,
            review_count: tool.review_count,
            pricing: pricing_display(tool),
            category: tool.category,
            subcategory: tool.subcategory.clone(),
            platforms: tool.platforms.clone(),
            features: tool.features.iter().take(TABLE_FEATURES).cloned().collect(),
            pros: tool.pros.iter().take(TABLE_PROS_CONS).cloned().collect(),
            cons: tool.cons.iter().take(TABLE_PROS_CONS).cloned().collect(),
            website: tool.website.clone(),
        }
    }
}

/// Compare page: one column per selected tool, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonTable {
    pub heading: String,
    pub selected: usize,
    pub limit_reached: bool,
    pub columns: Vec<ComparisonColumn>,
}

impl ComparisonTable {
    pub fn new(selection: &ComparisonSet) -> Self {
        let n = selection.len();
        let heading = match n {
            0 => "Select Tools to Compare".to_string(),
            1 => "Comparing 1 tool".to_string(),
            _ => format!("Comparing {n} tools"),
        };
        Self {
            heading,
            selected: n,
            limit_reached: selection.is_full(),
            columns: selection.tools().iter().map(ComparisonColumn::from).collect(),
        }
    }
}
