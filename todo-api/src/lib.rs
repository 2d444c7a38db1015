//! REST front for todo items kept in a remote table store.
//!
//! # Overview
//! `app` builds the axum router for `/api/todo`; `run` serves it until the
//! shutdown future resolves. All persistence goes through one shared
//! `store_client::Table` carried in `AppState`.
//!
//! # Design
//! - Handlers validate input through `ApiPath`/`ApiJson` and return
//!   `Result<_, TodoError>`; `TodoError` alone decides status codes.
//! - The store client is built once in `main` and injected; it is never
//!   rebuilt while the process runs.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod model;

use std::future::Future;

use axum::{routing::get, Router};
use store_client::{StoreClient, Table};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::TodoError;
pub use model::TodoItem;

pub const TODO_BASE_PATH: &str = "/api/todo";

#[derive(Debug, Clone)]
pub struct AppState {
    pub todos: Table,
}

impl AppState {
    pub fn new(client: &StoreClient, table: &str) -> Self {
        Self {
            todos: client.from_table(table),
        }
    }
}

pub fn app(state: AppState) -> Router {
    use handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};

    Router::new()
        .route(TODO_BASE_PATH, get(list_todos).post(create_todo))
        .route(&format!("{TODO_BASE_PATH}/"), get(list_todos).post(create_todo))
        .route(
            &format!("{TODO_BASE_PATH}/{{id}}"),
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
