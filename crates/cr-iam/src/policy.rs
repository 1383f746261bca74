//! Inline role policy create-or-replace

use tracing::{debug, info, info_span, Instrument, Span};

use cr_common::{PolicyAttachment, DEFAULT_AWS_REGION};

use crate::{IamApi, IamClientFactory, Result};

/// Writes inline policies through a freshly built client per call.
pub struct PolicyUpserter<F: IamClientFactory> {
    factory: F,
    span: Span,
}

impl<F: IamClientFactory> PolicyUpserter<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            span: info_span!("policy_upserter"),
        }
    }

    /// Create `attachment.policy_name` on the role, or overwrite it if it
    /// already exists. Exactly one `PutRolePolicy` request is sent; the
    /// document is not inspected.
    pub async fn upsert(&self, region: &str, attachment: &PolicyAttachment) -> Result<()> {
        self.put(region, attachment)
            .instrument(self.span.clone())
            .await
    }

    async fn put(&self, region: &str, attachment: &PolicyAttachment) -> Result<()> {
        let client = self.factory.create(region).await?;

        info!(
            role = %attachment.role_name,
            policy = %attachment.policy_name,
            "Create/Update role {} for policy {} by documented policy.",
            attachment.role_name,
            attachment.policy_name
        );
        client.put_role_policy(attachment).await?;

        debug!(region = %client.region(), "Role policy written");
        Ok(())
    }
}

/// Create or replace an inline policy on a role using a new client for
/// `region`, or [`DEFAULT_AWS_REGION`] when omitted.
pub async fn create_or_update_role_policy<F: IamClientFactory>(
    factory: &F,
    role_name: &str,
    policy_name: &str,
    policy_document: &str,
    region: Option<&str>,
) -> Result<()> {
    let attachment = PolicyAttachment::new(role_name, policy_name, policy_document);
    PolicyUpserter::new(factory)
        .upsert(region.unwrap_or(DEFAULT_AWS_REGION), &attachment)
        .await
}
