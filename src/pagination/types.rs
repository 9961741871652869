//! Pagination types

use crate::error::{Error, Result};
use crate::http::RawResponse;
use crate::types::{Item, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size requested on continuation calls
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Pager settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// `limit` sent with every continuation request.
    /// The first request never carries one.
    pub page_size: u32,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One fetched response unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in response order
    pub items: Vec<Item>,
    /// Token for the next page; `None` at the end of the sequence
    pub next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    data: PageData,
}

#[derive(Deserialize)]
struct PageData {
    #[serde(default)]
    items: JsonValue,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl Page {
    /// Decode a `{ "data": { "items": ..., "next_cursor": ... } }` body.
    ///
    /// `items` may be an array or an object whose values are the items.
    /// An empty cursor string counts as no cursor.
    pub fn from_response(response: &RawResponse) -> Result<Self> {
        let envelope: Envelope = response.json()?;
        let items = match envelope.data.items {
            JsonValue::Null => Vec::new(),
            JsonValue::Array(items) => items,
            JsonValue::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            other => {
                return Err(Error::decode(format!(
                    "data.items must be an array or object, got {other}"
                )))
            }
        };
        let next_cursor = envelope.data.next_cursor.filter(|c| !c.is_empty());
        Ok(Self { items, next_cursor })
    }
}

/// Why a query stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoneReason {
    /// The last page had no cursor
    Exhausted,
    /// Exit-on-first-match found its item
    MatchFound,
    /// A continuation page could not be fetched or decoded
    FetchFailed,
    /// The API handed back a cursor that was already consumed
    CursorRepeated,
}

impl DoneReason {
    /// Whether every relevant page was visited
    pub fn is_complete(self) -> bool {
        matches!(self, DoneReason::Exhausted | DoneReason::MatchFound)
    }
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DoneReason::Exhausted => "exhausted",
            DoneReason::MatchFound => "match found",
            DoneReason::FetchFailed => "fetch failed",
            DoneReason::CursorRepeated => "cursor repeated",
        };
        f.write_str(s)
    }
}

/// Pager state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PagerState {
    /// Requesting a page; `None` means the base URL
    Fetching(Option<String>),
    /// Applying the filter to a fetched page
    Filtering(Page),
    /// Moving on to the given cursor
    Advancing(String),
    /// Terminal
    Done(DoneReason),
}

/// Items accumulated by one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Matching items in first-seen order
    pub items: Vec<Item>,
    /// Why the query stopped
    pub reason: DoneReason,
    /// Number of pages fetched successfully
    pub pages: u32,
}

impl QueryResult {
    /// Whether the result covers every page that needed visiting
    pub fn is_complete(&self) -> bool {
        self.reason.is_complete()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item was collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the items
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
