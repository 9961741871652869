//! Fivetran REST API client
//!
//! High-level listers for groups, users, teams and connectors, plus the
//! connector pause action. Every listing goes through [`CursorPager`], so all
//! of them accept a [`FilterSet`] and the exit-on-first-match flag.

use crate::auth::{Authenticator, Credentials};
use crate::config::ToolkitConfig;
use crate::error::{Error, Result};
use crate::filter::FilterSet;
use crate::http::{ApiClient, ApiClientConfig, HttpCaller, ParamBuilder};
use crate::pagination::{CursorPager, DoneReason, PagerConfig, QueryResult};
use crate::types::Method;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.fivetran.com/v1";

/// A listable API resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `/groups`
    Groups,
    /// `/users`
    Users,
    /// `/teams`
    Teams,
    /// `/groups/{group_id}/connectors`
    GroupConnectors(String),
}

impl Resource {
    /// Path segments below the API root, unencoded
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Resource::Groups => vec!["groups"],
            Resource::Users => vec!["users"],
            Resource::Teams => vec!["teams"],
            Resource::GroupConnectors(group_id) => {
                vec!["groups", group_id.as_str(), "connectors"]
            }
        }
    }

    /// Path below the API root
    pub fn path(&self) -> String {
        match self {
            Resource::Groups => "groups".to_string(),
            Resource::Users => "users".to_string(),
            Resource::Teams => "teams".to_string(),
            Resource::GroupConnectors(group_id) => format!("groups/{group_id}/connectors"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Client for the Fivetran REST API
pub struct FivetranClient {
    caller: Arc<dyn HttpCaller>,
    params: ParamBuilder,
    base_url: String,
    pager_config: PagerConfig,
}

impl FivetranClient {
    /// Create a client with the default transport
    pub fn new(credentials: Credentials, api_version: u32) -> Result<Self> {
        let caller = ApiClient::new()?;
        let params = ParamBuilder::new(Authenticator::new(credentials), api_version);
        Ok(Self::with_caller(Arc::new(caller), params))
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ToolkitConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let caller = ApiClient::with_config(
            ApiClientConfig::builder()
                .timeout(config.timeout())
                .build(),
        )?;
        let params = ParamBuilder::new(Authenticator::new(credentials), config.api_version);
        Ok(Self::with_caller(Arc::new(caller), params)
            .base_url(&config.base_url)
            .pager_config(PagerConfig {
                page_size: config.page_size,
            }))
    }

    /// Create a client over any transport
    pub fn with_caller(caller: Arc<dyn HttpCaller>, params: ParamBuilder) -> Self {
        Self {
            caller,
            params,
            base_url: DEFAULT_BASE_URL.to_string(),
            pager_config: PagerConfig::default(),
        }
    }

    /// Set the API root
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set pager configuration
    #[must_use]
    pub fn pager_config(mut self, config: PagerConfig) -> Self {
        self.pager_config = config;
        self
    }

    /// The API root
    pub fn api_root(&self) -> &str {
        &self.base_url
    }

    /// Each segment is percent-encoded, so ids cannot alter the path or query
    fn url(&self, segments: &[&str]) -> Result<String> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("Invalid API base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// List a resource
    pub async fn list(
        &self,
        resource: &Resource,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        let url = self.url(&resource.segments())?;
        CursorPager::new(self.caller.as_ref(), &self.params)
            .with_config(self.pager_config)
            .run(&url, filters, exit_on_first_match)
            .await
    }

    /// All groups in the account
    pub async fn groups(
        &self,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        self.list(&Resource::Groups, filters, exit_on_first_match)
            .await
    }

    /// All users in the account
    pub async fn users(
        &self,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        self.list(&Resource::Users, filters, exit_on_first_match)
            .await
    }

    /// All teams in the account
    pub async fn teams(
        &self,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        self.list(&Resource::Teams, filters, exit_on_first_match)
            .await
    }

    /// Connectors within one group
    pub async fn connectors_in_group(
        &self,
        group_id: &str,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        self.list(
            &Resource::GroupConnectors(group_id.to_string()),
            filters,
            exit_on_first_match,
        )
        .await
    }

    /// Connectors across every group.
    ///
    /// Groups are visited in listing order and the filter applies per group,
    /// so exit-on-first-match keeps at most one connector per group. If a
    /// group's connectors cannot be listed, the walk stops there and the
    /// connectors gathered so far are returned with
    /// [`DoneReason::FetchFailed`]. Failing to list the groups themselves is
    /// an error.
    pub async fn connectors(
        &self,
        filters: &FilterSet,
        exit_on_first_match: bool,
    ) -> Result<QueryResult> {
        let groups = self.groups(&FilterSet::none(), false).await?;

        let mut merged = QueryResult {
            items: Vec::new(),
            reason: if groups.is_complete() {
                DoneReason::Exhausted
            } else {
                groups.reason
            },
            pages: groups.pages,
        };

        for group in &groups.items {
            let Some(group_id) = group.get("id").and_then(|v| v.as_str()) else {
                warn!("Skipping group without an id: {group}");
                continue;
            };

            match self
                .connectors_in_group(group_id, filters, exit_on_first_match)
                .await
            {
                Ok(result) => {
                    merged.pages += result.pages;
                    merged.items.extend(result.items);
                    merged.reason = merge_reason(merged.reason, result.reason);
                }
                Err(e) => {
                    warn!("Listing connectors of group '{group_id}' failed: {e}");
                    merged.reason = DoneReason::FetchFailed;
                    break;
                }
            }
        }

        Ok(merged)
    }

    /// Pause a connector (`PATCH /connectors/{id}` with `{"paused": true}`)
    pub async fn pause_connector(&self, connector_id: &str) -> Result<()> {
        let url = self.url(&["connectors", connector_id])?;
        let payload = json!({ "paused": true });
        let params = self.params.build(Method::PATCH, Some(&payload));

        match self.caller.call(&url, &params).await {
            Ok(_) => {
                info!("pauseConnector: Pause Success, connector_id='{connector_id}'");
                Ok(())
            }
            Err(e) => {
                warn!("pauseConnector: {e}");
                Err(Error::PauseFailed {
                    connector_id: connector_id.to_string(),
                })
            }
        }
    }
}

impl fmt::Debug for FivetranClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FivetranClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.params.api_version())
            .field("pager_config", &self.pager_config)
            .finish_non_exhaustive()
    }
}

/// Incomplete reasons win over complete ones
fn merge_reason(current: DoneReason, next: DoneReason) -> DoneReason {
    match (current.is_complete(), next.is_complete()) {
        (false, _) => current,
        (true, false) => next,
        (true, true) if next == DoneReason::MatchFound => next,
        (true, true) => current,
    }
}
