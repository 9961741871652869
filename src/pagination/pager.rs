//! Cursor pager implementation

use super::types::{DoneReason, Page, PagerConfig, PagerState, QueryResult};
use crate::error::Result;
use crate::filter::{CompiledFilter, FilterCompiler, FilterSet};
use crate::http::{HttpCaller, ParamBuilder, RequestParams};
use crate::types::{Item, Method};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Drives GET requests along a cursor chain
pub struct CursorPager<'a> {
    caller: &'a dyn HttpCaller,
    params: &'a ParamBuilder,
    config: PagerConfig,
}

impl<'a> CursorPager<'a> {
    /// Create a pager over the given transport and parameter builder
    pub fn new(caller: &'a dyn HttpCaller, params: &'a ParamBuilder) -> Self {
        Self {
            caller,
            params,
            config: PagerConfig::default(),
        }
    }

    /// Set pager configuration
    #[must_use]
    pub fn with_config(mut self, config: PagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get pager configuration
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Collect items from `url` and its continuation pages.
    ///
    /// With `exit_on_first_match`, the walk stops at the first item matching
    /// `filters`. Without filtering (no non-empty clause) every item is kept
    /// and the flag has no effect.
    ///
    /// Only a failure on the first page is returned as an error. Later
    /// failures end the walk with [`DoneReason::FetchFailed`].
    pub async fn run(
        &self,
        url: &str,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        let params = self.params.build(Method::GET, None);
        let compiled = FilterCompiler::compile(filters);

        let mut items = Vec::new();
        let mut pages = 0u32;
        let mut seen = HashSet::new();
        let mut state = PagerState::Fetching(None);

        let reason = loop {
            state = match state {
                PagerState::Fetching(None) => {
                    let response = self.caller.call(url, &params).await?;
                    let page = Page::from_response(&response)?;
                    pages += 1;
                    PagerState::Filtering(page)
                }
                PagerState::Fetching(Some(cursor)) => {
                    match self.fetch_continuation(url, &cursor, &params).await {
                        Ok(page) => {
                            pages += 1;
                            PagerState::Filtering(page)
                        }
                        Err(e) => {
                            warn!("Pagination stopped at cursor '{cursor}': {e}");
                            PagerState::Done(DoneReason::FetchFailed)
                        }
                    }
                }
                PagerState::Filtering(page) => {
                    let Page { items: batch, next_cursor } = page;
                    if absorb(batch, &compiled, exit_on_first_match, &mut items) {
                        PagerState::Done(DoneReason::MatchFound)
                    } else {
                        match next_cursor {
                            Some(cursor) => PagerState::Advancing(cursor),
                            None => PagerState::Done(DoneReason::Exhausted),
                        }
                    }
                }
                PagerState::Advancing(cursor) => {
                    if seen.insert(cursor.clone()) {
                        PagerState::Fetching(Some(cursor))
                    } else {
                        warn!("Cursor '{cursor}' was already consumed, stopping");
                        PagerState::Done(DoneReason::CursorRepeated)
                    }
                }
                PagerState::Done(reason) => break reason,
            };
        };

        debug!(
            "Query {url} done ({reason}): {} item(s) over {pages} page(s)",
            items.len()
        );

        Ok(QueryResult {
            items,
            reason,
            pages,
        })
    }

    async fn fetch_continuation(
        &self,
        url: &str,
        cursor: &str,
        params: &RequestParams,
    ) -> Result<Page> {
        let mut next = Url::parse(url)?;
        next.query_pairs_mut()
            .append_pair("cursor", cursor)
            .append_pair("limit", &self.config.page_size.to_string());

        let muted = params.clone().muted();
        let response = self.caller.call(next.as_str(), &muted).await?;
        Page::from_response(&response)
    }
}

/// Fold one page into `out`. Returns true when exit-on-first-match fired.
fn absorb(
    batch: Vec<Item>,
    compiled: &CompiledFilter,
    exit_on_first_match: bool,
    out: &mut Vec<Item>,
) -> bool {
    if !compiled.filter_required {
        out.extend(batch);
        return false;
    }

    for item in batch {
        if compiled.predicate.matches(&item) {
            out.push(item);
            if exit_on_first_match {
                return true;
            }
        }
    }
    false
}
