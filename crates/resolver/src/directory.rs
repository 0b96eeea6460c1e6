//! Tenant directory client
//!
//! Translates a tenant domain into its cloud environment (and, when the
//! directory knows one, an opaque tenant id) via a single GET against
//! the federation provider endpoint. Every failure mode, including a
//! slow or hung directory, degrades to the Global cloud instead of
//! failing the request.

use std::time::Duration;

use serde::Deserialize;

use crate::cloud::CloudEnvironment;

/// Default federation provider endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://odc.officeapps.live.com/odc/v2.1/federationprovider";

/// Default per-lookup timeout. The directory answers well under this in
/// practice; anything slower should not stall a redirect.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300);

/// What the directory told us about a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLookup {
    pub cloud_env: CloudEnvironment,
    /// Present only when the directory returned one; absence is normal.
    pub tenant_id: Option<String>,
}

impl DirectoryLookup {
    fn global() -> Self {
        Self {
            cloud_env: CloudEnvironment::default(),
            tenant_id: None,
        }
    }
}

/// Response body of the federation provider endpoint. Both fields are
/// optional; anything else in the body is ignored.
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    environment: Option<String>,
    #[serde(rename = "tenantId")]
    tenant_id: Option<String>,
}

/// Client for the tenant directory.
///
/// The timeout is applied uniformly to every lookup through the
/// underlying client, so both the initial call and a tenant-id re-fetch
/// are bounded the same way.
#[derive(Debug, Clone)]
pub struct CloudResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl CloudResolver {
    /// Create a resolver against the given endpoint with a per-request
    /// timeout.
    #[allow(clippy::expect_used)] // HTTP client creation failure is a fatal system error
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Resolve the cloud environment for an optional tenant domain.
    ///
    /// Infallible by design: with no tenant there is nothing to look up,
    /// and a failed or unparseable lookup means the Global cloud. Safe
    /// to call more than once per request.
    pub async fn lookup(&self, tenant: Option<&str>) -> DirectoryLookup {
        let Some(tenant) = tenant else {
            return DirectoryLookup::global();
        };

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("domain", tenant)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(tenant = %tenant, error = %err, "tenant directory unreachable");
                return DirectoryLookup::global();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                tenant = %tenant,
                status = %response.status(),
                "tenant directory returned non-success"
            );
            return DirectoryLookup::global();
        }

        let body: DirectoryResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(tenant = %tenant, error = %err, "malformed tenant directory response");
                return DirectoryLookup::global();
            }
        };

        let cloud_env = match body.environment.as_deref() {
            Some(name) => CloudEnvironment::from_directory_name(name).unwrap_or_else(|| {
                tracing::warn!(
                    tenant = %tenant,
                    environment = %name,
                    "unrecognized environment from tenant directory, defaulting to ww"
                );
                CloudEnvironment::default()
            }),
            None => CloudEnvironment::default(),
        };

        tracing::debug!(tenant = %tenant, cloud = %cloud_env, "resolved tenant cloud");

        DirectoryLookup {
            cloud_env,
            tenant_id: body.tenant_id,
        }
    }

    /// The endpoint this resolver queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for CloudResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }
}
