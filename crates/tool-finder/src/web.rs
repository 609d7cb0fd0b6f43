/// JSON API for the browser front end.
///
/// Routes are stateless: page state (filters, view mode, selection) travels
/// in the query string and the server only derives views from it.
use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tool_finder_core::catalog::CatalogStats;
use tool_finder_core::compare::ComparisonSet;
use tool_finder_core::filter::{apply_filters, FilterState};
use tool_finder_core::mcp_api::{BrowseToolsResponse, CategoryListResponse, ToolDetailResponse};
use tool_finder_core::model::{Category, Platform, PricingType, SortKey};
use tool_finder_core::present::{ComparisonTable, FilterPanel, ToolGrid, ViewMode};
use tool_finder_core::showcase::{Showcase, ShowcaseConfig};
use tool_finder_core::submission::{self, FieldError, Receipt, Submission};

use crate::directory::Directory;

const MISSION: &str = "We believe AI tools should be accessible to everyone. Our mission is to \
    democratize AI by helping people discover the perfect tools for their unique needs, whether \
    you're a creative professional, developer, business owner, or someone just getting started \
    with AI technology.";

pub fn router(directory: Directory) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{id}", get(get_tool))
        .route("/api/categories", get(list_categories))
        .route("/api/showcase", get(showcase))
        .route("/api/about", get(about))
        .route("/api/compare/handoff", post(create_handoff))
        .route("/api/compare/handoff/{token}", get(take_handoff))
        .route("/api/submissions", post(submit))
        .with_state(directory)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    tools: usize,
    catalog_fingerprint: String,
}

async fn health(State(directory): State<Directory>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        tools: directory.catalog.len(),
        catalog_fingerprint: directory.catalog.fingerprint().to_string(),
    })
}

/// Comma-separated lists; unknown values are dropped.
#[derive(Debug, Default, Deserialize)]
struct ToolsQuery {
    q: Option<String>,
    category: Option<String>,
    pricing: Option<String>,
    platforms: Option<String>,
    sort: Option<String>,
    view: Option<String>,
    compare: Option<String>,
}

impl ToolsQuery {
    fn filter_state(&self) -> FilterState {
        FilterState {
            query: self.q.clone().unwrap_or_default(),
            category: parse_one::<Category>(self.category.as_deref()),
            pricing: parse_list::<PricingType>(self.pricing.as_deref()).collect(),
            platforms: parse_list::<Platform>(self.platforms.as_deref()).collect(),
            sort_by: parse_one::<SortKey>(self.sort.as_deref()).unwrap_or_default(),
        }
    }

    fn view_mode(&self) -> ViewMode {
        match self.view.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("list") => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }
}

fn parse_one<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn parse_list<T: FromStr>(raw: Option<&str>) -> impl Iterator<Item = T> + '_ {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
}

fn split_ids(raw: Option<&str>) -> Vec<&str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

async fn list_tools(
    State(directory): State<Directory>,
    Query(query): Query<ToolsQuery>,
) -> Json<BrowseToolsResponse> {
    let filters = query.filter_state();
    let selection = ComparisonSet::from_tools(
        directory
            .catalog
            .resolve(split_ids(query.compare.as_deref()))
            .into_iter()
            .cloned(),
    );
    let results = apply_filters(directory.catalog.tools(), &filters);
    debug!(results = results.len(), filters = ?filters, "list_tools");

    Json(BrowseToolsResponse {
        grid: ToolGrid::new(&results, &selection, query.view_mode()),
        panel: FilterPanel::new(&directory.facets, &filters, results.len()),
        filters,
    })
}

async fn get_tool(
    State(directory): State<Directory>,
    Path(id): Path<String>,
) -> Result<Json<ToolDetailResponse>, StatusCode> {
    directory
        .catalog
        .find(&id)
        .map(|tool| Json(ToolDetailResponse::from(tool)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_categories(State(directory): State<Directory>) -> Json<CategoryListResponse> {
    Json(directory.category_list())
}

async fn showcase(State(directory): State<Directory>) -> Json<Showcase> {
    Json(Showcase::build(&directory.catalog, ShowcaseConfig::default()))
}

#[derive(Debug, Serialize)]
struct AboutResponse {
    title: &'static str,
    mission: &'static str,
    stats: CatalogStats,
    categories: Vec<Category>,
}

async fn about(State(directory): State<Directory>) -> Json<AboutResponse> {
    let categories = directory
        .category_list()
        .categories
        .into_iter()
        .filter(|c| c.tool_count > 0)
        .map(|c| c.category)
        .collect();
    Json(AboutResponse {
        title: "About AI Tool Finder",
        mission: MISSION,
        stats: directory.catalog.stats(),
        categories,
    })
}

#[derive(Debug, Deserialize)]
struct HandoffRequest {
    ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HandoffResponse {
    token: String,
    tool_count: usize,
}

async fn create_handoff(
    State(directory): State<Directory>,
    Json(request): Json<HandoffRequest>,
) -> Result<Json<HandoffResponse>, StatusCode> {
    let selection =
        ComparisonSet::from_tools(directory.catalog.resolve(&request.ids).into_iter().cloned());
    if !selection.ready_to_compare() {
        debug!(requested = request.ids.len(), resolved = selection.len(), "handoff rejected");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let token = directory.handoff.put(&selection).await;
    info!(tools = selection.len(), "comparison handed off");
    Ok(Json(HandoffResponse {
        token,
        tool_count: selection.len(),
    }))
}

async fn take_handoff(
    State(directory): State<Directory>,
    Path(token): Path<String>,
) -> Json<ComparisonTable> {
    let selection = directory.handoff.take(&token).await;
    Json(ComparisonTable::new(&selection))
}

async fn submit(
    State(directory): State<Directory>,
    Json(form): Json<Submission>,
) -> Result<Json<Receipt>, (StatusCode, Json<Vec<FieldError>>)> {
    submission::submit(&form, directory.submit_delay)
        .await
        .map(Json)
        .map_err(|errors| (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use tool_finder_core::catalog::Catalog;
    use tool_finder_core::handoff::HandoffStore;

    use super::*;

    fn app() -> (Router, Directory) {
        let directory = Directory::new(
            Catalog::bundled().unwrap(),
            HandoffStore::local(60),
            Duration::ZERO,
        );
        (router(directory.clone()), directory)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_catalog() {
        let (app, directory) = app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["tools"], directory.catalog.len());
    }

    #[tokio::test]
    async fn tools_query_filters_and_marks_selection() {
        let (app, directory) = app();
        let first = directory.catalog.tools()[0].id.clone();
        let uri = format!("/api/tools?pricing=free,bogus&sort=rating&view=list&compare={first},nope");
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filters"]["pricing"], serde_json::json!(["free"]));
        assert_eq!(body["grid"]["view_mode"], "list");
        assert_eq!(body["grid"]["comparing_count"], 1);
        let cards = body["grid"]["cards"].as_array().unwrap();
        assert!(!cards.is_empty());
        assert_eq!(cards.len(), body["grid"]["result_count"].as_u64().unwrap() as usize);
    }

    #[tokio::test]
    async fn unparseable_values_are_ignored() {
        let (app, directory) = app();
        let (status, body) = send(&app, get("/api/tools?category=Audio&sort=loudest")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["grid"]["result_count"], directory.catalog.len());
    }

    #[tokio::test]
    async fn unknown_tool_is_404() {
        let (app, directory) = app();
        let (status, _) = send(&app, get("/api/tools/not-a-tool")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = &directory.catalog.tools()[0].id;
        let (status, body) = send(&app, get(&format!("/api/tools/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tool"]["id"], id.as_str());
    }

    #[tokio::test]
    async fn handoff_is_one_shot() {
        let (app, directory) = app();
        let ids: Vec<_> = directory.catalog.tools()[..2].iter().map(|t| t.id.clone()).collect();

        let (status, _) = send(
            &app,
            post_json("/api/compare/handoff", serde_json::json!({ "ids": [ids[0]] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            post_json("/api/compare/handoff", serde_json::json!({ "ids": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let uri = format!("/api/compare/handoff/{token}");
        let (_, table) = send(&app, get(&uri)).await;
        assert_eq!(table["selected"], 2);
        let (_, table) = send(&app, get(&uri)).await;
        assert_eq!(table["selected"], 0);
    }

    #[tokio::test]
    async fn submissions_validate() {
        let (app, _) = app();
        let (status, body) = send(&app, post_json("/api/submissions", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body[0]["field"], "name");

        let form = serde_json::json!({
            "name": "Acme Writer",
            "website": "https://acme.example",
            "short_description": "Writes things",
            "description": "Writes many things",
            "category": "Text & Writing",
            "pricing_type": "free",
            "submitter_name": "Sam",
            "submitter_email": "sam@acme.example",
        });
        let (status, body) = send(&app, post_json("/api/submissions", form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tool_name"], "Acme Writer");
    }

    #[tokio::test]
    async fn about_and_categories() {
        let (app, directory) = app();
        let (_, about) = send(&app, get("/api/about")).await;
        assert_eq!(about["stats"]["tool_count"], directory.catalog.len());
        let (_, categories) = send(&app, get("/api/categories")).await;
        assert_eq!(categories["categories"].as_array().unwrap().len(), Category::ALL.len());
        let (_, showcase) = send(&app, get("/api/showcase")).await;
        assert_eq!(showcase["cards"].as_array().unwrap().len(), 6);
    }
}
