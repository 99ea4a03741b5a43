// SPDX-License-Identifier: PMPL-1.0-or-later
//! Response bodies of the backend under test

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// `GET /health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub version: String,
    #[serde(default)]
    pub endpoints: Map<String, Value>,
}

/// `POST /api/auth/request-code`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodeRequestResponse {
    pub message: String,
    pub email: String,
}

/// `POST /api/likes/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

/// Body of a 4xx response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

/// Item identifier; the backend has served both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A public item as returned by `GET /api/items`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
}

impl Item {
    /// Decode one raw listing entry. Only `id` is required; `type`, `title`
    /// and `likes` are `None` when absent or of another JSON type, and a
    /// numeric string is accepted for `likes`.
    pub fn from_raw(raw: &Map<String, Value>) -> Option<Self> {
        let id = raw.get("id").and_then(|id| ItemId::deserialize(id).ok())?;
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            id,
            kind: text("type"),
            title: text("title"),
            likes: raw.get("likes").and_then(count),
        })
    }

    /// Like count, treating an absent field as zero.
    pub fn like_count(&self) -> i64 {
        self.likes.unwrap_or(0)
    }
}

/// `GET /api/items`, kept as raw JSON objects so the structural check can
/// inspect which keys are present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<Map<String, Value>>,
}

/// Fields every item must carry.
pub const REQUIRED_ITEM_FIELDS: [&str; 5] = ["id", "type", "title", "createdAt", "isPublic"];

impl ItemsResponse {
    /// The entry at `index`, decoded. `None` past the end of the listing; an
    /// entry without a usable `id` is an error.
    pub fn item(&self, index: usize) -> Option<Result<Item>> {
        self.items
            .get(index)
            .map(|raw| Item::from_raw(raw).ok_or_else(|| CheckError::missing("id")))
    }
}

fn count(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Names from [`REQUIRED_ITEM_FIELDS`] absent in `item`.
pub fn missing_fields(item: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_ITEM_FIELDS
        .iter()
        .copied()
        .filter(|field| !item.contains_key(*field))
        .collect()
}
