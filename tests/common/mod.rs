//! In-process stand-in for the content REST API.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use garage_storefront::{ApiClient, ClientConfig};
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

pub const CREATED_AT: &str = "2025-01-02T10:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Parts,
    Videos,
    Articles,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub body: String,
}

impl Failure {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub file_name: Option<String>,
    pub size: usize,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct Stub {
    pub parts: Vec<Value>,
    pub videos: Vec<Value>,
    pub articles: Vec<Value>,
    next_id: i64,
    pub list_hits: HashMap<Kind, usize>,
    /// `(method path, body)` of every JSON write.
    pub writes: Vec<(String, Value)>,
    pub article_queries: Vec<HashMap<String, String>>,
    pub uploads: Vec<UploadRecord>,
    /// Answer for the next request of any kind, consumed once.
    pub fail_next: Option<Failure>,
    pub list_delay: Option<Duration>,
}

impl Stub {
    fn items(&mut self, kind: Kind) -> &mut Vec<Value> {
        match kind {
            Kind::Parts => &mut self.parts,
            Kind::Videos => &mut self.videos,
            Kind::Articles => &mut self.articles,
        }
    }

    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn hits(&self, kind: Kind) -> usize {
        self.list_hits.get(&kind).copied().unwrap_or_default()
    }

    pub fn seed(&mut self, kind: Kind, mut item: Value) -> i64 {
        let id = self.assign_id();
        item["id"] = json!(id);
        self.items(kind).push(item);
        id
    }
}

pub type SharedStub = Arc<Mutex<Stub>>;

pub struct StubServer {
    pub base_url: String,
    pub state: SharedStub,
    handle: JoinHandle<()>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl StubServer {
    pub async fn spawn() -> Self {
        let state = SharedStub::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().unwrap();
        let app = Router::new().nest("/api", router(state.clone()));
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("client")
    }

    pub async fn stub(&self) -> tokio::sync::MutexGuard<'_, Stub> {
        self.state.lock().await
    }
}

fn router(state: SharedStub) -> Router {
    Router::new()
        .route(
            "/parts",
            get(|State(s): State<SharedStub>| list(s, Kind::Parts)).post(
                |State(s): State<SharedStub>, Json(b): Json<Value>| create(s, Kind::Parts, b),
            ),
        )
        .route(
            "/parts/:id",
            get(|State(s): State<SharedStub>, Path(id): Path<i64>| fetch_one(s, Kind::Parts, id))
                .put(
                    |State(s): State<SharedStub>, Path(id): Path<i64>, Json(b): Json<Value>| {
                        update(s, Kind::Parts, id, b)
                    },
                )
                .delete(|State(s): State<SharedStub>, Path(id): Path<i64>| {
                    remove(s, Kind::Parts, id)
                }),
        )
        .route(
            "/videos",
            get(|State(s): State<SharedStub>| list(s, Kind::Videos)).post(
                |State(s): State<SharedStub>, Json(b): Json<Value>| create(s, Kind::Videos, b),
            ),
        )
        .route("/videos/upload", post(upload))
        .route(
            "/videos/:id",
            put(
                |State(s): State<SharedStub>, Path(id): Path<i64>, Json(b): Json<Value>| {
                    update(s, Kind::Videos, id, b)
                },
            )
            .delete(|State(s): State<SharedStub>, Path(id): Path<i64>| remove(s, Kind::Videos, id)),
        )
        .route(
            "/articles",
            get(list_articles).post(|State(s): State<SharedStub>, Json(b): Json<Value>| {
                create(s, Kind::Articles, b)
            }),
        )
        .route(
            "/articles/:id",
            get(|State(s): State<SharedStub>, Path(id): Path<i64>| fetch_one(s, Kind::Articles, id))
                .put(
                    |State(s): State<SharedStub>, Path(id): Path<i64>, Json(b): Json<Value>| {
                        update(s, Kind::Articles, id, b)
                    },
                )
                .delete(|State(s): State<SharedStub>, Path(id): Path<i64>| {
                    remove(s, Kind::Articles, id)
                }),
        )
        .route("/articles/:id/sections", post(add_section))
        .with_state(state)
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Not found" })),
    )
        .into_response()
}

fn failure(stub: &mut Stub) -> Option<Response> {
    stub.fail_next
        .take()
        .map(|failure| (failure.status, failure.body).into_response())
}

async fn list(state: SharedStub, kind: Kind) -> Response {
    let delay = {
        let mut stub = state.lock().await;
        *stub.list_hits.entry(kind).or_default() += 1;
        if let Some(response) = failure(&mut stub) {
            return response;
        }
        stub.list_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let mut stub = state.lock().await;
    ok(Value::Array(stub.items(kind).clone()))
}

async fn list_articles(
    State(state): State<SharedStub>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    {
        let mut stub = state.lock().await;
        stub.article_queries.push(query.clone());
    }
    let response = list(state, Kind::Articles).await;
    if query.get("published").map(String::as_str) != Some("true") {
        return response;
    }
    ok(only_published(response).await)
}

async fn only_published(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    let published = body["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item["published"] == json!(true))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Value::Array(published)
}

async fn fetch_one(state: SharedStub, kind: Kind, id: i64) -> Response {
    let mut stub = state.lock().await;
    if let Some(response) = failure(&mut stub) {
        return response;
    }
    match stub.items(kind).iter().find(|item| item["id"] == json!(id)) {
        Some(item) => ok(item.clone()),
        None => not_found(),
    }
}

async fn create(state: SharedStub, kind: Kind, mut body: Value) -> Response {
    let mut stub = state.lock().await;
    stub.writes.push((format!("POST {kind:?}"), body.clone()));
    if let Some(response) = failure(&mut stub) {
        return response;
    }

    if kind == Kind::Parts {
        let duplicate = stub.parts.iter().any(|part| {
            part["name"] == body["name"]
                && part["brand"] == body["brand"]
                && part["model"] == body["model"]
        });
        if duplicate {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Validation error",
                    "errorType": "SequelizeUniqueConstraintError",
                    "field": "name"
                })),
            )
                .into_response();
        }
    }
    if kind == Kind::Videos {
        body["createdAt"] = json!(CREATED_AT);
    }

    let id = stub.assign_id();
    body["id"] = json!(id);
    stub.items(kind).push(body.clone());
    (StatusCode::CREATED, Json(json!({ "success": true, "data": body }))).into_response()
}

async fn update(state: SharedStub, kind: Kind, id: i64, body: Value) -> Response {
    let mut stub = state.lock().await;
    stub.writes.push((format!("PUT {kind:?} {id}"), body.clone()));
    if let Some(response) = failure(&mut stub) {
        return response;
    }
    let Some(item) = stub.items(kind).iter_mut().find(|item| item["id"] == json!(id)) else {
        return not_found();
    };
    if let (Some(target), Some(fields)) = (item.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    ok(item.clone())
}

async fn remove(state: SharedStub, kind: Kind, id: i64) -> Response {
    let mut stub = state.lock().await;
    stub.writes.push((format!("DELETE {kind:?} {id}"), Value::Null));
    if let Some(response) = failure(&mut stub) {
        return response;
    }
    let items = stub.items(kind);
    let before = items.len();
    items.retain(|item| item["id"] != json!(id));
    if items.len() == before {
        return not_found();
    }
    Json(json!({ "success": true, "message": "deleted" })).into_response()
}

async fn add_section(
    State(state): State<SharedStub>,
    Path(id): Path<i64>,
    Json(section): Json<Value>,
) -> Response {
    let mut stub = state.lock().await;
    stub.writes.push((format!("POST section {id}"), section.clone()));
    if let Some(response) = failure(&mut stub) {
        return response;
    }
    let Some(article) = stub.articles.iter_mut().find(|item| item["id"] == json!(id)) else {
        return not_found();
    };
    if !article["sections"].is_array() {
        article["sections"] = json!([]);
    }
    if let Some(sections) = article["sections"].as_array_mut() {
        sections.push(section);
    }
    ok(article.clone())
}

async fn upload(State(state): State<SharedStub>, mut multipart: Multipart) -> Response {
    let mut record = UploadRecord {
        file_name: None,
        size: 0,
        title: String::new(),
        description: String::new(),
    };
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default().to_string().as_str() {
            "video" => {
                record.file_name = field.file_name().map(str::to_string);
                record.size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            }
            "title" => record.title = field.text().await.unwrap_or_default(),
            "description" => record.description = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let mut stub = state.lock().await;
    if let Some(response) = failure(&mut stub) {
        return response;
    }
    let id = stub.assign_id();
    let video = json!({
        "id": id,
        "videoUrl": format!("/api/videos/stream/{id}"),
        "title": record.title,
        "description": record.description,
        "createdAt": CREATED_AT,
    });
    stub.uploads.push(record);
    stub.videos.push(video.clone());
    (StatusCode::CREATED, Json(json!({ "success": true, "data": video }))).into_response()
}
