use tool_finder_core::compare::ComparisonSet;
use tool_finder_core::filter::FilterState;
use tool_finder_core::model::Category;
use tool_finder_core::present::ViewMode;

/// Tools page state. Starts with no filters, popularity sort, grid view and
/// an empty selection.
#[derive(Debug, Default)]
pub struct BrowseSession {
    pub filters: FilterState,
    pub view_mode: ViewMode,
    pub selection: ComparisonSet,
}

/// Compare page state, independent of the Tools page selection.
#[derive(Debug, Default)]
pub struct CompareSession {
    pub selection: ComparisonSet,
    pub query: String,
    pub category: Option<Category>,
}

/// One per MCP session.
#[derive(Debug, Default)]
pub struct Session {
    pub browse: BrowseSession,
    pub compare: CompareSession,
}
