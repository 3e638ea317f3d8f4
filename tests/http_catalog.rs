//! `HttpCatalog` against a fake REST catalog served by axum on an
//! ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use movie_scout::config::CatalogConfig;
use movie_scout::http_catalog::HttpCatalog;
use movie_scout_core::catalog::CatalogService;
use movie_scout_core::import::{ImportPhase, ImportWorkflow};
use movie_scout_core::models::Candidate;

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl Recorder {
    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default();
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push((target, auth));
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }

    fn last_target(&self) -> String {
        self.requests().last().map(|(t, _)| t.clone()).unwrap_or_default()
    }
}

async fn actor(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Json<serde_json::Value> {
    rec.record(&uri, &headers);
    Json(json!([{ "id": 7, "name": format!("{} (found)", name), "birthday": "1942-07-13" }]))
}

async fn movie(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Path(title): Path<String>,
) -> Json<serde_json::Value> {
    rec.record(&uri, &headers);
    Json(json!([{ "id": 11, "title": title, "releaseDate": "1982-06-25", "categoryIds": [878] }]))
}

async fn pages(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Json<serde_json::Value> {
    rec.record(&uri, &headers);
    Json(json!([{ "id": 21, "title": "Paged" }]))
}

async fn generes(State(rec): State<Recorder>, uri: Uri, headers: HeaderMap) -> Json<serde_json::Value> {
    rec.record(&uri, &headers);
    Json(json!([{ "id": 878, "name": "Science Fiction" }, { "id": 18, "name": "Drama" }]))
}

async fn genere(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    rec.record(&uri, &headers);
    if id == 13 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "category store unavailable").into_response();
    }
    Json(json!([{ "id": 31, "title": "Filtered", "categoryIds": [id] }])).into_response()
}

async fn import_search(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Path(_query): Path<String>,
) -> Json<serde_json::Value> {
    rec.record(&uri, &headers);
    Json(json!([
        { "title": "Blade Runner", "releaseDate": "1982-06-25" },
        { "title": "Blade Runner 2049", "releaseDate": "2017-10-06" }
    ]))
}

async fn import_confirm(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Path((_query, ordinal)): Path<(String, usize)>,
) -> Json<bool> {
    rec.record(&uri, &headers);
    Json(ordinal < 2)
}

async fn serve() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/rest/actor/{name}", get(actor))
        .route("/rest/movie/pages", get(pages))
        .route("/rest/movie/generes", get(generes))
        .route("/rest/movie/genere/id/{id}", get(genere))
        .route("/rest/movie/import/{query}", get(import_search))
        .route("/rest/movie/import/{query}/number/{ordinal}", get(import_confirm))
        .route("/rest/movie/{title}", get(movie))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}/rest", port), recorder)
}

fn catalog(base_url: &str, token: Option<&str>) -> HttpCatalog {
    let config = CatalogConfig {
        backend: "http".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
        token: None,
        fixture: None,
    };
    HttpCatalog::new(&config, token.map(str::to_string)).unwrap()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn person_lookup_sends_bearer_token_and_encodes_name() {
    let (base, rec) = serve().await;
    let catalog = catalog(&base, Some("secret-token"));

    let people = catalog.find_person_by_name("harrison ford").await.unwrap();
    assert_eq!(people.len(), 1);
    match &people[0] {
        Candidate::Person(p) => {
            assert_eq!(p.id, 7);
            assert_eq!(p.name, "harrison ford (found)");
        }
        other => panic!("expected a person, got {:?}", other),
    }

    let requests = rec.requests();
    assert_eq!(requests[0].0, "/rest/actor/harrison%20ford");
    assert_eq!(requests[0].1.as_deref(), Some("Bearer secret-token"));
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let (base, rec) = serve().await;
    let catalog = catalog(&base, None);

    let titles = catalog.find_title_by_name("alien").await.unwrap();
    assert!(matches!(&titles[0], Candidate::Title(t) if t.title == "alien"));
    assert_eq!(rec.requests()[0], ("/rest/movie/alien".to_string(), None));
}

#[tokio::test]
async fn catalog_page_uses_query_parameter() {
    let (base, rec) = serve().await;
    let catalog = catalog(&base, None);

    let items = catalog.fetch_catalog_page(3).await.unwrap();
    assert_eq!(items[0].id, 21);
    assert_eq!(rec.last_target(), "/rest/movie/pages?page=3");
}

#[tokio::test]
async fn category_endpoints() {
    let (base, rec) = serve().await;
    let catalog = catalog(&base, None);

    let categories = catalog.fetch_category_list().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(rec.last_target(), "/rest/movie/generes");

    let items = catalog.fetch_items_by_category(878).await.unwrap();
    assert_eq!(items[0].category_ids, vec![878]);
    assert_eq!(rec.last_target(), "/rest/movie/genere/id/878");
}

#[tokio::test]
async fn error_status_is_surfaced_with_body() {
    let (base, _rec) = serve().await;
    let catalog = catalog(&base, None);

    let err = catalog.fetch_items_by_category(13).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {}", message);
    assert!(message.contains("category store unavailable"));
}

#[tokio::test]
async fn import_keeps_plus_separator_in_path() {
    let (base, rec) = serve().await;
    let catalog = catalog(&base, None);

    let found = catalog.search_external_title("blade+runner").await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(rec.last_target(), "/rest/movie/import/blade+runner");

    assert!(catalog.confirm_import("blade+runner", 1).await.unwrap());
    assert_eq!(rec.last_target(), "/rest/movie/import/blade+runner/number/1");

    assert!(!catalog.confirm_import("blade+runner", 5).await.unwrap());
}

#[tokio::test]
async fn import_workflow_over_http() {
    let (base, rec) = serve().await;
    let workflow = ImportWorkflow::new(Arc::new(catalog(&base, Some("t"))));

    assert_eq!(
        workflow.submit_query("blade runner").await,
        ImportPhase::CandidatesReady
    );
    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.candidates.len(), 2);
    assert_eq!(snapshot.candidates[1].title.title, "Blade Runner 2049");

    assert_eq!(workflow.select_candidate(1).await, Ok(ImportPhase::Done));
    assert_eq!(rec.last_target(), "/rest/movie/import/blade+runner/number/1");
}

#[tokio::test]
async fn unreachable_catalog_is_an_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let catalog = catalog(&format!("http://127.0.0.1:{}/rest", port), None);

    assert!(catalog.fetch_category_list().await.is_err());
}
