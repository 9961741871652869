//! Tests for pagination module

use super::*;
use crate::auth::{Authenticator, Credentials};
use crate::error::{Error, Result};
use crate::filter::{FilterSet, FilterSpec};
use crate::http::{HttpCaller, ParamBuilder, RawResponse, RequestParams};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

const BASE: &str = "https://api.example.com/v1/connectors";

/// Replays canned responses in order and records every request
#[derive(Default)]
struct ScriptedCaller {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<(String, bool)>>,
}

impl ScriptedCaller {
    fn new() -> Self {
        Self::default()
    }

    fn page(self, items: Value, cursor: Option<&str>) -> Self {
        let body = json!({"data": {"items": items, "next_cursor": cursor}});
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(200, body.to_string())));
        self
    }

    fn raw(self, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(200, body)));
        self
    }

    fn fail(self, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::api(status, "boom")));
        self
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect()
    }

    fn muted_flags(&self) -> Vec<bool> {
        self.requests.lock().unwrap().iter().map(|(_, m)| *m).collect()
    }
}

#[async_trait]
impl HttpCaller for ScriptedCaller {
    async fn call(&self, url: &str, params: &RequestParams) -> Result<RawResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), params.muted));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::api(404, "no more scripted responses")))
    }
}

fn params() -> ParamBuilder {
    ParamBuilder::new(Authenticator::new(Credentials::new("k", "s")), 1)
}

fn ids(result: &QueryResult) -> Vec<i64> {
    result
        .items
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

fn service(name: &str) -> FilterSet {
    FilterSet::single(FilterSpec::new().with("service", name))
}

// ============================================================================
// Page decoding
// ============================================================================

#[test]
fn test_page_from_array() {
    let resp = RawResponse::new(
        200,
        r#"{"data":{"items":[{"id":1},{"id":2}],"next_cursor":"abc"}}"#,
    );
    let page = Page::from_response(&resp).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next_cursor, Some("abc".to_string()));
}

#[test]
fn test_page_from_object_keeps_document_order() {
    let resp = RawResponse::new(
        200,
        r#"{"data":{"items":{"z":{"id":1},"a":{"id":2},"m":{"id":3}}}}"#,
    );
    let page = Page::from_response(&resp).unwrap();
    let ids: Vec<i64> = page.items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(page.next_cursor.is_none());
}

#[test]
fn test_page_empty_cursor_is_absent() {
    let resp = RawResponse::new(200, r#"{"data":{"items":[],"next_cursor":""}}"#);
    let page = Page::from_response(&resp).unwrap();
    assert!(page.next_cursor.is_none());
}

#[test]
fn test_page_missing_data_is_decode_error() {
    let resp = RawResponse::new(200, r#"{"code":"Success"}"#);
    assert!(matches!(
        Page::from_response(&resp),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_page_scalar_items_is_decode_error() {
    let resp = RawResponse::new(200, r#"{"data":{"items":5}}"#);
    assert!(Page::from_response(&resp).is_err());
}

#[test]
fn test_done_reason_completeness() {
    assert!(DoneReason::Exhausted.is_complete());
    assert!(DoneReason::MatchFound.is_complete());
    assert!(!DoneReason::FetchFailed.is_complete());
    assert!(!DoneReason::CursorRepeated.is_complete());
}

// ============================================================================
// Pager runs
// ============================================================================

#[tokio::test]
async fn test_unfiltered_collects_all_pages_in_order() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1}, {"id": 2}]), Some("c1"))
        .page(json!([{"id": 3}]), Some("c2"))
        .page(json!([{"id": 4}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let filters = FilterSet::new(vec![FilterSpec::new()]);
    let result = pager.run(BASE, &filters, true).await.unwrap();

    assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    assert_eq!(result.reason, DoneReason::Exhausted);
    assert_eq!(result.pages, 3);
}

#[tokio::test]
async fn test_scenario_filter_across_pages() {
    let caller = ScriptedCaller::new()
        .page(
            json!([{"id": 1, "service": "a"}, {"id": 2, "service": "b"}]),
            Some("X"),
        )
        .page(json!([{"id": 3, "service": "a"}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &service("a"), false).await.unwrap();

    assert_eq!(ids(&result), vec![1, 3]);
    assert_eq!(result.reason, DoneReason::Exhausted);
    assert_eq!(
        caller.urls(),
        vec![
            BASE.to_string(),
            format!("{BASE}?cursor=X&limit=1000"),
        ]
    );
}

#[tokio::test]
async fn test_exit_on_first_match_stops_everything() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1, "service": "b"}]), Some("c1"))
        .page(
            json!([{"id": 2, "service": "a"}, {"id": 3, "service": "a"}]),
            Some("c2"),
        )
        .page(json!([{"id": 4, "service": "a"}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &service("a"), true).await.unwrap();

    assert_eq!(ids(&result), vec![2]);
    assert_eq!(result.reason, DoneReason::MatchFound);
    // Third page never requested
    assert_eq!(caller.urls().len(), 2);
}

#[tokio::test]
async fn test_no_match_still_exhausts() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1, "service": "b"}]), Some("c1"))
        .page(json!([{"id": 2, "service": "c"}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &service("a"), true).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.reason, DoneReason::Exhausted);
    assert_eq!(result.pages, 2);
}

#[tokio::test]
async fn test_single_page_without_cursor() {
    let caller = ScriptedCaller::new().page(json!([{"id": 7}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &FilterSet::none(), false).await.unwrap();

    assert_eq!(ids(&result), vec![7]);
    assert_eq!(result.reason, DoneReason::Exhausted);
    assert_eq!(caller.urls(), vec![BASE.to_string()]);
}

#[tokio::test]
async fn test_second_page_failure_returns_first_page() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1}, {"id": 2}]), Some("c1"))
        .fail(500);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &FilterSet::none(), false).await.unwrap();

    assert_eq!(ids(&result), vec![1, 2]);
    assert_eq!(result.reason, DoneReason::FetchFailed);
    assert!(!result.is_complete());
    assert_eq!(result.pages, 1);
}

#[tokio::test]
async fn test_continuation_decode_failure_is_fetch_failed() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1}]), Some("c1"))
        .raw("<html>oops</html>");
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &FilterSet::none(), false).await.unwrap();

    assert_eq!(ids(&result), vec![1]);
    assert_eq!(result.reason, DoneReason::FetchFailed);
}

#[tokio::test]
async fn test_first_page_failure_is_an_error() {
    let caller = ScriptedCaller::new().fail(401);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let err = pager
        .run(BASE, &FilterSet::none(), false)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_repeated_cursor_stops() {
    let caller = ScriptedCaller::new()
        .page(json!([{"id": 1}]), Some("loop"))
        .page(json!([{"id": 2}]), Some("loop"))
        .page(json!([{"id": 3}]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params);

    let result = pager.run(BASE, &FilterSet::none(), false).await.unwrap();

    assert_eq!(ids(&result), vec![1, 2]);
    assert_eq!(result.reason, DoneReason::CursorRepeated);
    assert_eq!(caller.urls().len(), 2);
}

#[tokio::test]
async fn test_custom_page_size_and_muted_continuations() {
    let caller = ScriptedCaller::new()
        .page(json!([]), Some("next token"))
        .page(json!([]), None);
    let params = params();
    let pager = CursorPager::new(&caller, &params).with_config(PagerConfig { page_size: 50 });

    pager.run(BASE, &FilterSet::none(), false).await.unwrap();

    assert_eq!(
        caller.urls()[1],
        format!("{BASE}?cursor=next+token&limit=50")
    );
    assert_eq!(caller.muted_flags(), vec![false, true]);
}

#[tokio::test]
async fn test_filter_set_reusable_across_runs() {
    let filters = service("a");
    let params = params();

    for _ in 0..2 {
        let caller = ScriptedCaller::new().page(
            json!([{"id": 1, "service": "a"}, {"id": 2, "service": "a"}]),
            None,
        );
        let pager = CursorPager::new(&caller, &params);
        let result = pager.run(BASE, &filters, false).await.unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    assert_eq!(filters, service("a"));
}
