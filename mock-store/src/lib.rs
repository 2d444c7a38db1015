//! In-memory stand-in for a PostgREST table endpoint.
//!
//! Serves `/rest/v1/{table}` for any table name with the subset of the
//! protocol the store client speaks: `select=*`, `column=eq.value` filters,
//! `Prefer: return=representation`, and `apikey` authentication. Rows are
//! untyped JSON objects keyed by an integer `id` the store assigns.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub type Row = Map<String, Value>;

#[derive(Debug, Default)]
pub struct TableData {
    next_id: i64,
    rows: BTreeMap<i64, Row>,
}

impl TableData {
    fn allocate_id(&mut self, requested: Option<i64>) -> Result<i64, Fault> {
        let id = match requested {
            Some(id) => id,
            None => self.next_id.checked_add(1).ok_or_else(|| {
                Fault::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "2200H",
                    "nextval: reached maximum value of sequence",
                )
            })?,
        };
        self.next_id = self.next_id.max(id);
        Ok(id)
    }
}

#[derive(Clone)]
pub struct MockStore {
    tables: Arc<RwLock<HashMap<String, TableData>>>,
    api_key: Option<Arc<str>>,
}

impl MockStore {
    /// A store that accepts any caller.
    pub fn open() -> Self {
        Self {
            tables: Arc::default(),
            api_key: None,
        }
    }

    /// A store that rejects requests whose `apikey` header differs from `key`.
    pub fn with_api_key(key: &str) -> Self {
        Self {
            tables: Arc::default(),
            api_key: Some(Arc::from(key)),
        }
    }

    /// Number of rows currently held in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }

    pub fn router(self) -> Router {
        Router::new()
            .route(
                "/rest/v1/{table}",
                get(select_rows)
                    .post(insert_rows)
                    .patch(update_rows)
                    .delete(delete_rows),
            )
            .with_state(self)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Fault> {
        let Some(expected) = self.api_key.as_deref() else {
            return Ok(());
        };
        match headers.get("apikey").and_then(|v| v.to_str().ok()) {
            Some(given) if given == expected => Ok(()),
            _ => Err(Fault::new(StatusCode::UNAUTHORIZED, "PGRST301", "Invalid API key")),
        }
    }
}

pub fn app() -> Router {
    MockStore::open().router()
}

pub async fn run(listener: TcpListener, store: MockStore) -> Result<(), std::io::Error> {
    axum::serve(listener, store.router()).await
}

/// PostgREST-shaped error body.
#[derive(Debug)]
struct Fault {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Fault {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.code,
            "message": self.message,
            "details": null,
            "hint": null,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Equality filters parsed from `column=eq.value` query pairs.
#[derive(Debug, Default)]
struct Filters(Vec<(String, String)>);

impl Filters {
    fn parse(query: Vec<(String, String)>) -> Result<Self, Fault> {
        let mut filters = Vec::new();
        for (column, expr) in query {
            if column == "select" {
                if expr != "*" {
                    return Err(Fault::new(
                        StatusCode::BAD_REQUEST,
                        "PGRST100",
                        "only select=* is supported",
                    ));
                }
                continue;
            }
            let Some(value) = expr.strip_prefix("eq.") else {
                return Err(Fault::new(
                    StatusCode::BAD_REQUEST,
                    "PGRST100",
                    format!("failed to parse filter ({expr})"),
                ));
            };
            filters.push((column, value.to_string()));
        }
        Ok(Self(filters))
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn matches(&self, row: &Row) -> bool {
        self.0.iter().all(|(column, expected)| {
            row.get(column)
                .is_some_and(|value| render(value) == *expected)
        })
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn wants_representation(headers: &HeaderMap) -> bool {
    headers
        .get_all("prefer")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(',').any(|p| p.trim() == "return=representation"))
}

fn respond(headers: &HeaderMap, status: StatusCode, rows: Vec<Row>) -> Response {
    if wants_representation(headers) {
        (status, Json(rows)).into_response()
    } else if status == StatusCode::OK {
        StatusCode::NO_CONTENT.into_response()
    } else {
        status.into_response()
    }
}

async fn select_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, Fault> {
    store.authorize(&headers)?;
    let filters = Filters::parse(query)?;
    let tables = store.tables.read().await;
    let rows = tables
        .get(&table)
        .map(|t| {
            t.rows
                .values()
                .filter(|row| filters.matches(row))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn insert_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Response, Fault> {
    store.authorize(&headers)?;
    let incoming = match payload {
        Value::Object(row) => vec![row],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(Fault::new(StatusCode::BAD_REQUEST, "PGRST102", "expected JSON objects")),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(Fault::new(StatusCode::BAD_REQUEST, "PGRST102", "expected a JSON object"));
        }
    };

    let mut tables = store.tables.write().await;
    let data = tables.entry(table).or_default();
    let mut created = Vec::with_capacity(incoming.len());
    for mut row in incoming {
        let requested = row.get("id").and_then(Value::as_i64);
        if requested.is_some_and(|id| data.rows.contains_key(&id)) {
            return Err(Fault::new(
                StatusCode::CONFLICT,
                "23505",
                "duplicate key value violates unique constraint",
            ));
        }
        let id = data.allocate_id(requested)?;
        row.insert("id".to_string(), Value::from(id));
        data.rows.insert(id, row.clone());
        created.push(row);
    }
    Ok(respond(&headers, StatusCode::CREATED, created))
}

async fn update_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Response, Fault> {
    store.authorize(&headers)?;
    let filters = Filters::parse(query)?;
    let Value::Object(changes) = payload else {
        return Err(Fault::new(StatusCode::BAD_REQUEST, "PGRST102", "expected a JSON object"));
    };

    let mut tables = store.tables.write().await;
    let mut updated = Vec::new();
    if let Some(data) = tables.get_mut(&table) {
        for row in data.rows.values_mut().filter(|row| filters.matches(row)) {
            for (column, value) in &changes {
                if column != "id" {
                    row.insert(column.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
    }
    Ok(respond(&headers, StatusCode::OK, updated))
}

async fn delete_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, Fault> {
    store.authorize(&headers)?;
    let filters = Filters::parse(query)?;
    if filters.is_empty() {
        return Err(Fault::new(
            StatusCode::BAD_REQUEST,
            "21000",
            "DELETE requires a WHERE clause",
        ));
    }

    let mut tables = store.tables.write().await;
    let mut removed = Vec::new();
    if let Some(data) = tables.get_mut(&table) {
        let ids: Vec<i64> = data
            .rows
            .iter()
            .filter(|(_, row)| filters.matches(row))
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            if let Some(row) = data.rows.remove(&id) {
                removed.push(row);
            }
        }
    }
    Ok(respond(&headers, StatusCode::OK, removed))
}
