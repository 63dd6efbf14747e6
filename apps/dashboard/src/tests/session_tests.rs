use std::sync::Arc;

use super::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use client_core::ApiClient;
use serde_json::{json, Value};
use shared::domain::{Bus, Garage};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    async fn push(&self, route: impl Into<String>) {
        self.0.lock().await.push(route.into());
    }

    async fn recorded(&self) -> Vec<String> {
        self.0.lock().await.clone()
    }
}

fn garage_rows() -> Value {
    json!([
        {"id": 1, "garageName": "Ikitelli", "garageCode": "IKT", "coordinate": "41.06,28.80"},
        {"id": 2, "garageName": "Anadolu", "garageCode": "AND", "coordinate": "40.98,29.12"}
    ])
}

async fn list_garages(State(calls): State<Calls>) -> Json<Value> {
    calls.push("list").await;
    Json(garage_rows())
}

async fn search_garages(
    State(calls): State<Calls>,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    let term = query.get("term").cloned().unwrap_or_default();
    calls.push(format!("search:{term}")).await;
    let results = if term == "IKT" {
        json!([garage_rows()[0].clone()])
    } else {
        json!([])
    };
    let count = results.as_array().map_or(0, Vec::len);
    Json(json!({
        "results": results,
        "count": count,
        "totalCount": count,
        "page": 0,
        "size": 20,
        "searchTerm": term,
        "hasMatches": count > 0
    }))
}

async fn refresh_garages(State(calls): State<Calls>) -> Json<Value> {
    calls.push("refresh").await;
    Json(json!([garage_rows()[1].clone()]))
}

async fn list_buses_fails() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream down")
}

async fn spawn_fleet_server() -> (Arc<ApiClient>, Calls) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let calls = Calls::default();
    let app = Router::new()
        .route("/api/garages", get(list_garages))
        .route("/api/garages/search", get(search_garages))
        .route("/api/garages/refresh", get(refresh_garages))
        .route("/api/buses", get(list_buses_fails))
        .with_state(calls.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = ApiClient::new(format!("http://{addr}/api")).expect("client");
    (Arc::new(client), calls)
}

async fn run_to_string<E: Tabular>(
    controller: &ListController<E>,
    mode: PageMode,
    input: Option<&[u8]>,
) -> String {
    let mut out = Vec::new();
    run_page(controller, mode, input, &mut out)
        .await
        .expect("run page");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn parses_interactive_commands() {
    assert_eq!(Input::parse(":quit"), Input::Quit);
    assert_eq!(Input::parse(" :q \r"), Input::Quit);
    assert_eq!(Input::parse(":refresh"), Input::Refresh);
    assert_eq!(Input::parse(""), Input::Search(""));
    assert_eq!(Input::parse("34 ABC\r"), Input::Search("34 ABC"));
}

#[tokio::test]
async fn list_mode_renders_table_without_footer() {
    let (api, calls) = spawn_fleet_server().await;
    let controller = ListController::<Garage>::new(api);

    let text = run_to_string(&controller, PageMode::List, None).await;
    assert!(text.starts_with("ID | Garage Name | Garage Code | Coordinates\n"));
    assert!(text.contains("Ikitelli"));
    assert!(text.contains("Anadolu"));
    assert!(!text.contains("Showing"));
    assert_eq!(calls.recorded().await, ["list"]);
}

#[tokio::test]
async fn search_without_matches_renders_empty_state() {
    let (api, _calls) = spawn_fleet_server().await;
    let controller = ListController::<Garage>::new(api);

    let text = run_to_string(&controller, PageMode::Search("zzz-no-match".into()), None).await;
    assert_eq!(
        text,
        "No results found\nNo garages found matching \"zzz-no-match\"\n"
    );
}

#[tokio::test]
async fn refresh_mode_hits_refresh_endpoint() {
    let (api, calls) = spawn_fleet_server().await;
    let controller = ListController::<Garage>::new(api);

    let text = run_to_string(&controller, PageMode::Refresh, None).await;
    assert!(text.contains("Anadolu"));
    assert!(!text.contains("Ikitelli"));
    assert_eq!(calls.recorded().await, ["refresh"]);
}

#[tokio::test]
async fn interactive_lines_drive_search_list_and_refresh() {
    let (api, calls) = spawn_fleet_server().await;
    let controller = ListController::<Garage>::new(api);

    let input = b"IKT\n\n:refresh\n:quit\nnever-sent\n".as_slice();
    let text = run_to_string(&controller, PageMode::List, Some(input)).await;

    assert_eq!(
        calls.recorded().await,
        ["list", "search:IKT", "list", "refresh"]
    );
    assert!(text.contains("Showing 1 of 1 results for \"IKT\""));
    assert_eq!(text.matches("Showing").count(), 1);
    assert!(text.contains(":quit exits"));
}

#[tokio::test]
async fn interactive_session_ends_at_eof() {
    let (api, calls) = spawn_fleet_server().await;
    let controller = ListController::<Garage>::new(api);

    let input = b"   \n".as_slice();
    run_to_string(&controller, PageMode::List, Some(input)).await;
    assert_eq!(calls.recorded().await, ["list", "list"]);
}

#[tokio::test]
async fn failed_load_renders_message_and_still_succeeds() {
    let (api, _calls) = spawn_fleet_server().await;
    let controller = ListController::<Bus>::new(api);

    let text = run_to_string(&controller, PageMode::List, None).await;
    assert_eq!(text, "Failed to load buses. Please try again later.\n");
}
