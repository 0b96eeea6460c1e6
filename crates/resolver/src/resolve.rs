//! Redirect resolution
//!
//! Orchestrates identity, table, and directory into exactly one
//! destination URL per request, or a [`ResolveError`] the server turns
//! into a fallback redirect.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::cloud::CloudEnvironment;
use crate::directory::CloudResolver;
use crate::error::ResolveError;
use crate::identity::RequestIdentity;
use crate::table::{RedirectTable, TargetSet};

/// Placeholder for the tenant domain in a target template.
const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Placeholder for the directory-issued tenant id in a target template.
const TENANT_ID_PLACEHOLDER: &str = "{tenantId}";

/// Characters escaped the way `encodeURIComponent` does: everything but
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Resolves request identities against the redirect table, consulting
/// the tenant directory when the URL does not pin the cloud.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: Arc<RedirectTable>,
    directory: CloudResolver,
}

impl Resolver {
    pub fn new(table: Arc<RedirectTable>, directory: CloudResolver) -> Self {
        Self { table, directory }
    }

    /// Resolve an identity to a destination URL.
    ///
    /// At most two directory calls are made: one when the URL carries no
    /// cloud token, and one more only when a `{tenantId}` template needs
    /// an id the first call did not return.
    pub async fn resolve(&self, identity: &RequestIdentity) -> Result<String, ResolveError> {
        let short = identity.short.as_deref().ok_or(ResolveError::ShortMissing)?;
        let tenant = identity.tenant.as_deref();

        let entry = self
            .table
            .lookup(short)
            .ok_or_else(|| ResolveError::ShortNotFound(short.to_string()))?;

        // A cloud token in the URL is authoritative; otherwise ask the
        // directory, which also hands us the tenant id when it has one.
        let mut tenant_id = None;
        let cloud = match identity.cloud.as_deref() {
            Some(token) => CloudEnvironment::from_code(token).ok_or_else(|| {
                ResolveError::CloudNotSupported {
                    short: short.to_string(),
                    cloud: token.to_string(),
                }
            })?,
            None => {
                let lookup = self.directory.lookup(tenant).await;
                tenant_id = lookup.tenant_id;
                lookup.cloud_env
            }
        };

        let targets = entry.get(&cloud).ok_or_else(|| ResolveError::CloudNotSupported {
            short: short.to_string(),
            cloud: cloud.code().to_string(),
        })?;

        Ok(self.select_target(targets, tenant, tenant_id).await)
    }

    /// Apply the selection policy over a target set.
    async fn select_target(
        &self,
        targets: &TargetSet,
        tenant: Option<&str>,
        tenant_id: Option<String>,
    ) -> String {
        let (Some(tenant), Some(template)) = (tenant, targets.tenant_template.as_deref()) else {
            return targets.primary.clone();
        };

        if template.contains(TENANT_PLACEHOLDER) {
            return substitute(template, TENANT_PLACEHOLDER, tenant);
        }

        if template.contains(TENANT_ID_PLACEHOLDER) {
            // Fetch the id lazily if the first lookup did not carry one
            let tenant_id = match tenant_id {
                Some(id) => Some(id),
                None => self.directory.lookup(Some(tenant)).await.tenant_id,
            };
            return match tenant_id {
                Some(id) => substitute(template, TENANT_ID_PLACEHOLDER, &id),
                None => {
                    tracing::debug!(
                        tenant = %tenant,
                        "tenant id unavailable, falling back to tenant-agnostic target"
                    );
                    targets.primary.clone()
                }
            };
        }

        // Tenant-aware slot without a placeholder is treated as inert
        targets.primary.clone()
    }
}

/// Replace every occurrence of `placeholder` with the percent-encoded
/// value.
fn substitute(template: &str, placeholder: &str, value: &str) -> String {
    let encoded = utf8_percent_encode(value, COMPONENT).to_string();
    template.replace(placeholder, &encoded)
}
