//! Stateless PostgREST request builder and response parser.
//!
//! # Design
//! `Endpoint` holds only the REST base URL and the access key and carries no
//! mutable state between calls. Each primitive is split into a `build_*`
//! method that produces an `HttpRequest` and the shared `parse_rows` function
//! that consumes an `HttpResponse`. Every write asks the store to echo the
//! affected rows (`Prefer: return=representation`) so callers can tell
//! "nothing matched" apart from success.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{AccessKey, StoreConfig};
use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const REST_PATH: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Equality filter on a single column, rendered as `column=eq.value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: String,
    value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }

    fn to_query(&self) -> String {
        format!(
            "{}=eq.{}",
            urlencoding::encode(&self.column),
            urlencoding::encode(&self.value)
        )
    }
}

/// Builds requests against `{url}/rest/v1/{table}`.
#[derive(Debug, Clone)]
pub struct Endpoint {
    rest_url: String,
    key: AccessKey,
}

impl Endpoint {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            rest_url: format!("{}/{REST_PATH}", config.url.trim().trim_end_matches('/')),
            key: config.key.clone(),
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    pub fn build_select(&self, table: &str, filter: Option<&Filter>) -> HttpRequest {
        let mut url = format!("{}?select=*", self.table_url(table));
        if let Some(filter) = filter {
            url.push('&');
            url.push_str(&filter.to_query());
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.auth_headers(),
            body: None,
        }
    }

    pub fn build_insert<T: Serialize>(&self, table: &str, row: &T) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.table_url(table),
            headers: self.write_headers(),
            body: Some(encode(row)?),
        })
    }

    pub fn build_update<T: Serialize>(
        &self,
        table: &str,
        filter: &Filter,
        changes: &T,
    ) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            url: format!("{}?{}", self.table_url(table), filter.to_query()),
            headers: self.write_headers(),
            body: Some(encode(changes)?),
        })
    }

    pub fn build_delete(&self, table: &str, filter: &Filter) -> HttpRequest {
        let mut headers = self.auth_headers();
        headers.push(("Prefer".to_string(), RETURN_REPRESENTATION.to_string()));
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}?{}", self.table_url(table), filter.to_query()),
            headers,
            body: None,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, urlencoding::encode(table))
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("apikey".to_string(), self.key.expose().to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.key.expose()),
            ),
        ]
    }

    fn write_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.auth_headers();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        headers.push(("Prefer".to_string(), RETURN_REPRESENTATION.to_string()));
        headers
    }
}

/// Decode the row set returned by any primitive.
///
/// An empty 2xx body (e.g. `Prefer: return=minimal`) is an empty row set.
pub fn parse_rows<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, StoreError> {
    if !response.is_success() {
        return Err(StoreError::Status {
            status: response.status,
            body: response.body,
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&response.body).map_err(|e| StoreError::Decode(e.to_string()))
}

fn encode<T: Serialize>(row: &T) -> Result<String, StoreError> {
    serde_json::to_string(row).map_err(|e| StoreError::Encode(e.to_string()))
}
