//! Todo item in its three shapes: the JSON the API speaks, the request body it
//! accepts, and the rows it reads from and writes to the store.
//!
//! The API uses camelCase field names; the store table uses snake_case
//! columns. Writes never carry `id` (the store assigns it on insert and the
//! path supplies it on update) and updates never carry `created_at`.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Store column holding the primary key.
pub const ID_COLUMN: &str = "id";

/// A todo item as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update.
///
/// Every field is optional. `id`, `createdAt` and `updatedAt` may be present
/// but are ignored: the store assigns ids and the server owns timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoInput {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_completed: bool,
}

/// A row read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoRow {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
    #[serde(deserialize_with = "store_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "store_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            is_completed: row.is_completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert payload. Both timestamps carry the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTodoRow {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTodoRow {
    pub fn stamped(input: TodoInput, now: DateTime<Utc>) -> Self {
        Self {
            title: input.title,
            description: input.description,
            is_completed: input.is_completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update payload. Overwrites every user-editable column, so an omitted
/// `description` is written as null and an omitted `isCompleted` as false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoChanges {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl TodoChanges {
    pub fn stamped(input: TodoInput, now: DateTime<Utc>) -> Self {
        Self {
            title: input.title,
            description: input.description,
            is_completed: input.is_completed,
            updated_at: now,
        }
    }
}

/// Current time at the store's precision (Postgres keeps microseconds), so
/// the values echoed back equal the values sent.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// `timestamptz` columns come back with an offset, `timestamp` columns without.
fn store_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_store_timestamp(&raw).map_err(de::Error::custom)
}

fn parse_store_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn item_serializes_camel_case() {
        let item = TodoItem {
            id: 1,
            title: "buy milk".to_string(),
            description: None,
            is_completed: false,
            created_at: at(0),
            updated_at: at(0),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["updatedAt"], "1970-01-01T00:00:00Z");
        assert!(json["description"].is_null());
        assert!(json.get("is_completed").is_none());
    }

    #[test]
    fn input_defaults_missing_fields() {
        let input: TodoInput = serde_json::from_str(r#"{"title":"buy milk"}"#).unwrap();
        assert_eq!(input.title, "buy milk");
        assert_eq!(input.description, None);
        assert!(!input.is_completed);
    }

    #[test]
    fn input_ignores_id_and_timestamps() {
        let input: TodoInput = serde_json::from_str(
            r#"{"id":99,"title":"t","isCompleted":true,"createdAt":"2000-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(input.title, "t");
        assert!(input.is_completed);
    }

    #[test]
    fn input_accepts_null_title() {
        let input: TodoInput = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(input.title, "");
    }

    #[test]
    fn input_rejects_wrong_types() {
        let result: Result<TodoInput, _> = serde_json::from_str(r#"{"isCompleted":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_row_stamps_both_timestamps_and_has_no_id() {
        let row = NewTodoRow::stamped(
            TodoInput { title: "a".to_string(), ..TodoInput::default() },
            at(10),
        );
        assert_eq!(row.created_at, row.updated_at);
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["is_completed"], false);
    }

    #[test]
    fn changes_overwrite_description_and_skip_created_at() {
        let changes = TodoChanges::stamped(
            TodoInput { title: "a".to_string(), is_completed: true, ..TodoInput::default() },
            at(20),
        );
        let json = serde_json::to_value(&changes).unwrap();
        assert!(json["description"].is_null());
        assert!(json.get("created_at").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["is_completed"], true);
    }

    #[test]
    fn row_parses_timestamptz_and_plain_timestamp() {
        let row: TodoRow = serde_json::from_str(
            r#"{"id":3,"title":"x","description":null,"is_completed":null,
                "created_at":"2024-05-01T12:00:00.123456+00:00",
                "updated_at":"2024-05-01T12:30:00.5"}"#,
        )
        .unwrap();
        assert!(!row.is_completed);
        assert_eq!(row.created_at.to_rfc3339(), "2024-05-01T12:00:00.123456+00:00");
        assert_eq!(row.updated_at.to_rfc3339(), "2024-05-01T12:30:00.500+00:00");
    }

    #[test]
    fn row_rejects_garbage_timestamp() {
        let result: Result<TodoRow, _> = serde_json::from_str(
            r#"{"id":3,"created_at":"yesterday","updated_at":"today"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn now_is_truncated_to_microseconds() {
        let ts = now();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
