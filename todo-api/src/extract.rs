//! `Path` and `Json` extractors whose rejections render as `TodoError`, so a
//! malformed id or body gets the same error body as every other failure.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::Json;

use crate::error::TodoError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(TodoError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(TodoError))]
pub struct ApiJson<T>(pub T);
