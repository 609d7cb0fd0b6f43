/// MCP server for the AI tool directory.
///
/// Tools page:
/// - `browse_tools`, `reset_filters`: search, filter and sort the catalog
/// - `toggle_compare`, `remove_from_compare`, `clear_compare`: selection
/// - `start_comparison`: hand the selection to the Compare page
///
/// Compare page:
/// - `open_comparison`, `search_compare_candidates`, `add_to_comparison`,
///   `remove_from_comparison`
///
/// Elsewhere: `get_tool`, `list_categories`, `featured_showcase`, `submit_tool`.
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use tool_finder_core::compare::{AddOutcome, Notice, ToggleOutcome};
use tool_finder_core::filter::{apply_filters, candidate_search};
use tool_finder_core::mcp_api::{
    parse_category_filter, BrowseToolsParams, BrowseToolsResponse, CandidateSearchParams,
    CandidatesResponse, CategoryListResponse, CompareToolParams,
    ComparisonResponse, GetToolParams, OpenComparisonParams, SelectionResponse, ShowcaseParams,
    StartComparisonResponse, SubmitToolResponse, ToolDetailResponse,
};
use tool_finder_core::model::Tool;
use tool_finder_core::present::{ComparisonTable, EmptyState, FilterPanel, ToolCard, ToolGrid};
use tool_finder_core::showcase::{Showcase, ShowcaseConfig};
use tool_finder_core::submission::{self, Submission};

use crate::directory::Directory;
use crate::session::Session;

const CANDIDATE_LIMIT: usize = 12;

#[derive(Clone)]
pub struct ToolFinderServer {
    directory: Directory,
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<ToolFinderServer>,
}

impl ToolFinderServer {
    pub fn new(directory: Directory) -> Self {
        Self {
            directory,
            session: Arc::new(Mutex::new(Session::default())),
            tool_router: Self::tool_router(),
        }
    }

    /// Same catalog and handoff channel, fresh page state.
    pub fn fork(&self) -> Self {
        Self::new(self.directory.clone())
    }

    fn lookup(&self, tool_id: &str) -> Result<&Tool, String> {
        let tool_id = required_id(tool_id)?;
        self.directory
            .catalog
            .find(tool_id)
            .ok_or_else(|| format!("tool not found: {tool_id}"))
    }

    fn candidates(&self, session: &Session) -> CandidatesResponse {
        let compare = &session.compare;
        let exclude = compare.selection.ids();
        let limit_reached = compare.selection.is_full();
        let candidates: Vec<ToolCard> = if limit_reached {
            Vec::new()
        } else {
            candidate_search(
                self.directory.catalog.tools(),
                &compare.query,
                compare.category,
                &exclude,
                CANDIDATE_LIMIT,
            )
            .into_iter()
            .map(|t| ToolCard::new(t, false))
            .collect()
        };
        CandidatesResponse {
            empty: (candidates.is_empty() && !limit_reached).then(EmptyState::no_candidates),
            candidates,
            limit_reached,
        }
    }
}

fn required_id(tool_id: &str) -> Result<&str, String> {
    let tool_id = tool_id.trim();
    if tool_id.is_empty() {
        return Err("tool_id must not be empty".to_string());
    }
    Ok(tool_id)
}

fn comparison(session: &Session, notice: Option<Notice>) -> ComparisonResponse {
    ComparisonResponse {
        table: ComparisonTable::new(&session.compare.selection),
        notice,
    }
}

#[tool_router]
impl ToolFinderServer {
    #[tool(description = "Search, filter and sort the AI tool catalog (Tools page). Only the fields you pass change; the rest of the page's filter state is kept. Returns matching tool cards in order plus the filter panel with option counts.")]
    async fn browse_tools(
        &self,
        Parameters(params): Parameters<BrowseToolsParams>,
    ) -> Result<Json<BrowseToolsResponse>, String> {
        let category = match params.category.as_deref() {
            Some(raw) => Some(parse_category_filter(Some(raw))?),
            None => None,
        };

        let mut session = self.session.lock().await;
        let browse = &mut session.browse;
        if let Some(query) = params.query {
            browse.filters.set_query(query);
        }
        if let Some(category) = category {
            browse.filters.set_category(category);
        }
        if let Some(pricing) = params.pricing {
            browse.filters.pricing = pricing.into_iter().collect();
        }
        if let Some(platforms) = params.platforms {
            browse.filters.platforms = platforms.into_iter().collect();
        }
        if let Some(sort_by) = params.sort_by {
            browse.filters.set_sort(sort_by);
        }
        if let Some(view_mode) = params.view_mode {
            browse.view_mode = view_mode;
        }

        let results = apply_filters(self.directory.catalog.tools(), &browse.filters);
        debug!(results = results.len(), filters = ?browse.filters, "browse_tools");

        Ok(Json(BrowseToolsResponse {
            filters: browse.filters.clone(),
            grid: ToolGrid::new(&results, &browse.selection, browse.view_mode),
            panel: FilterPanel::new(&self.directory.facets, &browse.filters, results.len()),
        }))
    }

    #[tool(description = "Clear the category, pricing and platform filters on the Tools page. The search text and sort order are kept.")]
    async fn reset_filters(&self) -> Result<Json<BrowseToolsResponse>, String> {
        let mut session = self.session.lock().await;
        let browse = &mut session.browse;
        browse.filters.clear_filters();
        let results = apply_filters(self.directory.catalog.tools(), &browse.filters);
        Ok(Json(BrowseToolsResponse {
            filters: browse.filters.clone(),
            grid: ToolGrid::new(&results, &browse.selection, browse.view_mode),
            panel: FilterPanel::new(&self.directory.facets, &browse.filters, results.len()),
        }))
    }

    #[tool(description = "Get the full record of one AI tool by ID (e.g. 'chatgpt', 'midjourney'): description, pricing, features, platforms, rating, pros, cons, use cases and tags.")]
    async fn get_tool(
        &self,
        Parameters(params): Parameters<GetToolParams>,
    ) -> Result<Json<ToolDetailResponse>, String> {
        let tool = self.lookup(&params.tool_id)?;
        Ok(Json(ToolDetailResponse::from(tool)))
    }

    #[tool(description = "List catalog categories with tool counts, plus overall catalog statistics.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        Ok(Json(self.directory.category_list()))
    }

    #[tool(description = "Tools page compare button: add the tool to the comparison selection, or remove it if already selected. At most 3 tools can be selected; a 4th is rejected with a notice.")]
    async fn toggle_compare(
        &self,
        Parameters(params): Parameters<CompareToolParams>,
    ) -> Result<Json<SelectionResponse>, String> {
        let tool = self.lookup(&params.tool_id)?;
        let mut session = self.session.lock().await;
        let selection = &mut session.browse.selection;
        let notice = match selection.toggle(tool) {
            ToggleOutcome::Added | ToggleOutcome::Removed => None,
            ToggleOutcome::LimitReached => Some(Notice::limit_reached()),
        };
        Ok(Json(SelectionResponse::new(selection, notice)))
    }

    #[tool(description = "Remove a tool from the Tools page comparison selection. Removing a tool that is not selected is a no-op.")]
    async fn remove_from_compare(
        &self,
        Parameters(params): Parameters<CompareToolParams>,
    ) -> Result<Json<SelectionResponse>, String> {
        let tool_id = required_id(&params.tool_id)?;
        let mut session = self.session.lock().await;
        let selection = &mut session.browse.selection;
        selection.remove(tool_id);
        Ok(Json(SelectionResponse::new(selection, None)))
    }

    #[tool(description = "Clear the Tools page comparison selection.")]
    async fn clear_compare(&self) -> Result<Json<SelectionResponse>, String> {
        let mut session = self.session.lock().await;
        session.browse.selection.clear();
        Ok(Json(SelectionResponse::new(&session.browse.selection, None)))
    }

    #[tool(description = "Compare Now: hand the Tools page selection (2 or 3 tools) to the Compare page. Returns a one-time token for open_comparison.")]
    async fn start_comparison(&self) -> Result<Json<StartComparisonResponse>, String> {
        let session = self.session.lock().await;
        let selection = &session.browse.selection;
        if !selection.ready_to_compare() {
            return Err("select at least 2 tools to compare".to_string());
        }
        let token = self.directory.handoff.put(selection).await;
        info!(tools = selection.len(), "comparison handed off");
        Ok(Json(StartComparisonResponse {
            token,
            tool_count: selection.len(),
        }))
    }

    #[tool(description = "Open the Compare page. With a token from start_comparison, loads that selection (tokens work once). Without a token, or with an expired one, the comparison starts empty.")]
    async fn open_comparison(
        &self,
        Parameters(params): Parameters<OpenComparisonParams>,
    ) -> Result<Json<ComparisonResponse>, String> {
        let received = match params.token.as_deref() {
            Some(token) => self.directory.handoff.take(token).await,
            None => Default::default(),
        };
        let mut session = self.session.lock().await;
        session.compare.selection = received;
        Ok(Json(comparison(&session, None)))
    }

    #[tool(description = "Compare page picker: search tools by name or description, optionally within a category ('all' for every category). Already selected tools are excluded; at most 12 results.")]
    async fn search_compare_candidates(
        &self,
        Parameters(params): Parameters<CandidateSearchParams>,
    ) -> Result<Json<CandidatesResponse>, String> {
        let category = parse_category_filter(params.category.as_deref())?;
        let mut session = self.session.lock().await;
        if let Some(query) = params.query {
            session.compare.query = query;
        }
        if params.category.is_some() {
            session.compare.category = category;
        }
        Ok(Json(self.candidates(&session)))
    }

    #[tool(description = "Add a tool to the Compare page. Rejected with a notice when 3 tools are already being compared.")]
    async fn add_to_comparison(
        &self,
        Parameters(params): Parameters<CompareToolParams>,
    ) -> Result<Json<ComparisonResponse>, String> {
        let tool = self.lookup(&params.tool_id)?;
        let mut session = self.session.lock().await;
        let notice = match session.compare.selection.add(tool.clone()) {
            AddOutcome::Added => Some(Notice::added(&tool.name)),
            AddOutcome::AlreadyPresent => None,
            AddOutcome::LimitReached => Some(Notice::limit_reached()),
        };
        Ok(Json(comparison(&session, notice)))
    }

    #[tool(description = "Remove a tool from the Compare page.")]
    async fn remove_from_comparison(
        &self,
        Parameters(params): Parameters<CompareToolParams>,
    ) -> Result<Json<ComparisonResponse>, String> {
        let tool_id = required_id(&params.tool_id)?;
        let mut session = self.session.lock().await;
        session.compare.selection.remove(tool_id);
        Ok(Json(comparison(&session, None)))
    }

    #[tool(description = "Landing page featured tools: the first tools of the catalog laid out as an animated card scene. Each card links to the tool's website.")]
    async fn featured_showcase(
        &self,
        Parameters(params): Parameters<ShowcaseParams>,
    ) -> Result<Json<Showcase>, String> {
        let mut config = ShowcaseConfig::default();
        if let Some(style) = params.style {
            config.style = style;
        }
        if let Some(layout) = params.layout {
            config.layout = layout;
        }
        if let Some(max_cards) = params.max_cards {
            config.max_cards = max_cards;
        }
        Ok(Json(Showcase::build(&self.directory.catalog, config)))
    }

    #[tool(description = "Submit a new AI tool for review. Validates the form and returns a confirmation or the list of field errors. Submissions are not stored.")]
    async fn submit_tool(
        &self,
        Parameters(form): Parameters<Submission>,
    ) -> Result<Json<SubmitToolResponse>, String> {
        let response = match submission::submit(&form, self.directory.submit_delay).await {
            Ok(receipt) => SubmitToolResponse {
                accepted: true,
                receipt: Some(receipt),
                errors: Vec::new(),
            },
            Err(errors) => SubmitToolResponse {
                accepted: false,
                receipt: None,
                errors,
            },
        };
        Ok(Json(response))
    }
}

#[tool_handler]
impl ServerHandler for ToolFinderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tool-finder".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "AI Tool Finder: a directory of {} AI tools. Use browse_tools to search and \
                 filter, get_tool for details, toggle_compare then start_comparison to hand up \
                 to 3 tools to the Compare page, and open_comparison with the returned token to \
                 see them side by side.",
                self.directory.catalog.len()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tool_finder_core::catalog::Catalog;
    use tool_finder_core::handoff::HandoffStore;
    use tool_finder_core::model::{Category, SortKey};

    use super::*;

    fn server() -> ToolFinderServer {
        let directory = Directory::new(
            Catalog::bundled().unwrap(),
            HandoffStore::local(60),
            Duration::ZERO,
        );
        ToolFinderServer::new(directory)
    }

    fn ids(server: &ToolFinderServer, n: usize) -> Vec<String> {
        server
            .directory
            .catalog
            .tools()
            .iter()
            .take(n)
            .map(|t| t.id.clone())
            .collect()
    }

    async fn toggle(server: &ToolFinderServer, id: &str) -> SelectionResponse {
        server
            .toggle_compare(Parameters(CompareToolParams {
                tool_id: id.to_string(),
            }))
            .await
            .unwrap()
            .0
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = ToolFinderServer::tool_router().list_all();
        for name in [
            "browse_tools",
            "reset_filters",
            "get_tool",
            "list_categories",
            "toggle_compare",
            "remove_from_compare",
            "clear_compare",
            "start_comparison",
            "open_comparison",
            "search_compare_candidates",
            "add_to_comparison",
            "remove_from_comparison",
            "featured_showcase",
            "submit_tool",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn browse_keeps_filter_state_between_calls() {
        let server = server();
        let first = server
            .browse_tools(Parameters(BrowseToolsParams {
                category: Some("Development".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap()
            .0;
        assert!(first.grid.result_count > 0);
        assert!(first.grid.cards.iter().all(|c| c.category == Category::Development));

        let second = server
            .browse_tools(Parameters(BrowseToolsParams {
                sort_by: Some(SortKey::Rating),
                ..Default::default()
            }))
            .await
            .unwrap()
            .0;
        assert_eq!(second.filters.category, Some(Category::Development));
        assert_eq!(second.grid.result_count, first.grid.result_count);
        for pair in second.grid.cards.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }

        let reset = server.reset_filters().await.unwrap().0;
        assert_eq!(reset.grid.result_count, server.directory.catalog.len());
        assert_eq!(reset.filters.sort_by, SortKey::Rating);
    }

    #[tokio::test]
    async fn browse_rejects_unknown_category() {
        let err = server()
            .browse_tools(Parameters(BrowseToolsParams {
                category: Some("Audio".to_string()),
                ..Default::default()
            }))
            .await
            .err()
            .expect("tool call should fail");
        assert!(err.contains("unknown category"));
    }

    #[tokio::test]
    async fn selection_is_capped_with_notice() {
        let server = server();
        let ids = ids(&server, 4);
        for id in &ids[..3] {
            assert!(toggle(&server, id).await.notice.is_none());
        }
        let rejected = toggle(&server, &ids[3]).await;
        assert_eq!(rejected.selected.len(), 3);
        assert_eq!(rejected.notice, Some(Notice::limit_reached()));

        let after_toggle_off = toggle(&server, &ids[0]).await;
        assert_eq!(after_toggle_off.selected.len(), 2);
    }

    #[tokio::test]
    async fn handoff_reaches_compare_page_once() {
        let server = server();
        let ids = ids(&server, 2);
        toggle(&server, &ids[0]).await;
        assert!(server.start_comparison().await.is_err());
        toggle(&server, &ids[1]).await;

        let started = server.start_comparison().await.unwrap().0;
        assert_eq!(started.tool_count, 2);

        let compare_page = server.fork();
        let opened = compare_page
            .open_comparison(Parameters(OpenComparisonParams {
                token: Some(started.token.clone()),
            }))
            .await
            .unwrap()
            .0;
        let opened_ids: Vec<_> = opened.table.columns.iter().map(|c| c.id.clone()).collect();
        assert_eq!(opened_ids, ids);

        let reopened = compare_page
            .open_comparison(Parameters(OpenComparisonParams {
                token: Some(started.token),
            }))
            .await
            .unwrap()
            .0;
        assert!(reopened.table.columns.is_empty());
    }

    #[tokio::test]
    async fn compare_page_picker_and_limit() {
        let server = server();
        let ids = ids(&server, 4);
        for id in &ids[..3] {
            let added = server
                .add_to_comparison(Parameters(CompareToolParams {
                    tool_id: id.clone(),
                }))
                .await
                .unwrap()
                .0;
            assert_eq!(added.notice.map(|n| n.title), Some("Tool added to comparison".to_string()));
        }
        let full = server
            .add_to_comparison(Parameters(CompareToolParams {
                tool_id: ids[3].clone(),
            }))
            .await
            .unwrap()
            .0;
        assert!(full.table.limit_reached);
        assert_eq!(full.notice, Some(Notice::limit_reached()));

        let picker = server
            .search_compare_candidates(Parameters(CandidateSearchParams::default()))
            .await
            .unwrap()
            .0;
        assert!(picker.limit_reached);
        assert!(picker.candidates.is_empty());

        server
            .remove_from_comparison(Parameters(CompareToolParams {
                tool_id: ids[0].clone(),
            }))
            .await
            .unwrap();
        let picker = server
            .search_compare_candidates(Parameters(CandidateSearchParams {
                query: None,
                category: Some("all".to_string()),
            }))
            .await
            .unwrap()
            .0;
        assert_eq!(picker.candidates.len(), CANDIDATE_LIMIT);
        assert!(picker.candidates.iter().all(|c| c.id != ids[1] && c.id != ids[2]));
    }

    #[tokio::test]
    async fn forked_sessions_do_not_share_state() {
        let server = server();
        let id = ids(&server, 1).remove(0);
        toggle(&server, &id).await;
        let other = server.fork();
        let cleared = other.clear_compare().await.unwrap().0;
        assert!(cleared.selected.is_empty());
        let mine = server.session.lock().await;
        assert_eq!(mine.browse.selection.len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = server()
            .get_tool(Parameters(GetToolParams {
                tool_id: "nope".to_string(),
            }))
            .await
            .err()
            .expect("tool call should fail");
        assert_eq!(err, "tool not found: nope");

        let err = server()
            .remove_from_compare(Parameters(CompareToolParams {
                tool_id: "  ".to_string(),
            }))
            .await
            .err()
            .expect("tool call should fail");
        assert_eq!(err, "tool_id must not be empty");
    }
}
