//! Cursor pagination
//!
//! Walks a cursor-linked sequence of pages, filtering items as it goes.
//!
//! # Overview
//!
//! The first page is requested from the bare resource URL. Each response
//! carries `data.next_cursor`; while it holds a token the pager requests
//! `?cursor=<token>&limit=<page_size>`. Failures on continuation pages end
//! the walk with a partial result instead of an error, and the reason the
//! walk ended is reported alongside the items.

mod pager;
mod types;

pub use pager::CursorPager;
pub use types::{DoneReason, Page, PagerConfig, PagerState, QueryResult, DEFAULT_PAGE_SIZE};

#[cfg(test)]
mod tests;
