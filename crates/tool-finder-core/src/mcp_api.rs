use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogStats;
use crate::compare::{ComparisonSet, Notice, MAX_COMPARE};
use crate::filter::FilterState;
use crate::model::{Category, Platform, PricingType, SortKey, Tool};
use crate::present::{BadgeView, ComparisonTable, EmptyState, FilterPanel, Highlight, ToolCard, ToolGrid, ViewMode};
use crate::showcase::{AnimationStyle, Layout};
use crate::submission::{FieldError, Receipt};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BrowseToolsParams {
    /// Free-text search over name, description, category, tags and features.
    /// An empty string clears the search.
    pub query: Option<String>,
    /// Category display name such as "Development", or "all" to clear.
    pub category: Option<String>,
    /// Pricing types to keep (e.g. ["free", "freemium"]). An empty list clears.
    pub pricing: Option<Vec<PricingType>>,
    /// Platforms to keep; a tool matches if it supports any of them. An empty list clears.
    pub platforms: Option<Vec<Platform>>,
    /// popularity (default), rating, name or price.
    pub sort_by: Option<SortKey>,
    /// grid (default) or list.
    pub view_mode: Option<ViewMode>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetToolParams {
    /// Tool identifier such as "chatgpt" or "github-copilot".
    pub tool_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompareToolParams {
    /// Tool identifier to add, toggle or remove.
    pub tool_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct OpenComparisonParams {
    /// Token returned by start_comparison. Omit to open an empty comparison.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CandidateSearchParams {
    /// Matches tool name or description.
    pub query: Option<String>,
    /// Category display name, or "all".
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ShowcaseParams {
    /// orbit (default), float, flip or pulse.
    pub style: Option<AnimationStyle>,
    /// Ring (default radius 4) or grid layout.
    pub layout: Option<Layout>,
    /// Number of featured tools (default 6).
    pub max_cards: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BrowseToolsResponse {
    pub filters: FilterState,
    pub grid: ToolGrid,
    pub panel: FilterPanel,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolDetailResponse {
    pub tool: Tool,
    pub pricing: BadgeView,
    pub highlight: Highlight,
}

impl From<&Tool> for ToolDetailResponse {
    fn from(tool: &Tool) -> Self {
        Self {
            tool: tool.clone(),
            pricing: BadgeView::from(&tool.pricing),
            highlight: Highlight::of(tool),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    pub category: Category,
    pub tool_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategorySummary>,
    pub stats: CatalogStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectedTool {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectionResponse {
    pub selected: Vec<SelectedTool>,
    pub limit: usize,
    pub ready_to_compare: bool,
    pub notice: Option<Notice>,
}

impl SelectionResponse {
    pub fn new(selection: &ComparisonSet, notice: Option<Notice>) -> Self {
        Self {
            selected: selection
                .tools()
                .iter()
                .map(|t| SelectedTool {
                    id: t.id.clone(),
                    name: t.name.clone(),
                })
                .collect(),
            limit: MAX_COMPARE,
            ready_to_compare: selection.ready_to_compare(),
            notice,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StartComparisonResponse {
    pub token: String,
    pub tool_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonResponse {
    pub table: ComparisonTable,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CandidatesResponse {
    pub candidates: Vec<ToolCard>,
    pub empty: Option<EmptyState>,
    /// When true the picker is hidden: remove a tool to add another.
    pub limit_reached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmitToolResponse {
    pub accepted: bool,
    pub receipt: Option<Receipt>,
    pub errors: Vec<FieldError>,
}

/// Parses an optional category filter; "all" and blank mean no filter.
pub fn parse_category_filter(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse::<Category>().map(Some).map_err(|e| {
            let available: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
            format!("{e}. Available categories: {}", available.join(", "))
        }),
    }
}
