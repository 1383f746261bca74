//! IAM client seam and the AWS SDK implementation
//!
//! Credentials come from the standard AWS SDK chain (env vars, profile,
//! instance role, ...). Retries and timeouts are the SDK defaults.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_iam::Client;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument, Span};

use cr_common::{PolicyAttachment, Role, RoleTag, DEFAULT_AWS_REGION};

use crate::{IamError, Result};

/// One `ListRoles` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub max_items: i32,
    /// Continuation cursor from the previous page; `None` on the first request
    pub marker: Option<String>,
    pub path_prefix: Option<String>,
}

/// One `ListRoles` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolePage {
    pub roles: Vec<Role>,
    pub is_truncated: bool,
    pub marker: Option<String>,
}

/// The slice of the IAM API this crate consumes.
#[async_trait]
pub trait IamApi: Send + Sync {
    /// Region the client is bound to
    fn region(&self) -> &str;

    /// Fetch a single page of roles
    async fn list_roles_page(&self, request: &PageRequest) -> Result<RolePage>;

    /// Create or overwrite an inline policy on a role
    async fn put_role_policy(&self, attachment: &PolicyAttachment) -> Result<()>;
}

#[async_trait]
impl<T: IamApi + ?Sized> IamApi for Arc<T> {
    fn region(&self) -> &str {
        (**self).region()
    }

    async fn list_roles_page(&self, request: &PageRequest) -> Result<RolePage> {
        (**self).list_roles_page(request).await
    }

    async fn put_role_policy(&self, attachment: &PolicyAttachment) -> Result<()> {
        (**self).put_role_policy(attachment).await
    }
}

/// Builds IAM clients bound to a region.
#[async_trait]
pub trait IamClientFactory: Send + Sync {
    type Client: IamApi;

    async fn create(&self, region: &str) -> Result<Self::Client>;
}

#[async_trait]
impl<F: IamClientFactory + ?Sized> IamClientFactory for &F {
    type Client = F::Client;

    async fn create(&self, region: &str) -> Result<Self::Client> {
        (**self).create(region).await
    }
}

/// AWS SDK backed IAM client
#[derive(Clone)]
pub struct AwsIamClient {
    client: Client,
    region: String,
}

impl AwsIamClient {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// The underlying SDK client, for calls this crate does not wrap
    pub fn sdk_client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl IamApi for AwsIamClient {
    fn region(&self) -> &str {
        &self.region
    }

    async fn list_roles_page(&self, request: &PageRequest) -> Result<RolePage> {
        let output = self
            .client
            .list_roles()
            .max_items(request.max_items)
            .set_marker(request.marker.clone())
            .set_path_prefix(request.path_prefix.clone())
            .send()
            .await
            .map_err(|e| IamError::provider("ListRoles", e))?;

        let roles = output
            .roles()
            .iter()
            .map(role_from_sdk)
            .collect::<Result<Vec<_>>>()?;

        Ok(RolePage {
            roles,
            is_truncated: output.is_truncated(),
            marker: output.marker().map(str::to_string),
        })
    }

    async fn put_role_policy(&self, attachment: &PolicyAttachment) -> Result<()> {
        self.client
            .put_role_policy()
            .role_name(&attachment.role_name)
            .policy_name(&attachment.policy_name)
            .policy_document(&attachment.policy_document)
            .send()
            .await
            .map_err(|e| IamError::provider("PutRolePolicy", e))?;

        Ok(())
    }
}

fn role_from_sdk(role: &aws_sdk_iam::types::Role) -> Result<Role> {
    let created = role.create_date();
    let create_date = DateTime::<Utc>::from_timestamp(created.secs(), created.subsec_nanos())
        .ok_or_else(|| {
            IamError::InvalidResponse(format!(
                "role {} has an out-of-range CreateDate",
                role.role_name()
            ))
        })?;

    Ok(Role {
        path: role.path().to_string(),
        role_name: role.role_name().to_string(),
        role_id: role.role_id().to_string(),
        arn: role.arn().to_string(),
        create_date,
        assume_role_policy_document: role.assume_role_policy_document().map(str::to_string),
        description: role.description().map(str::to_string),
        max_session_duration: role.max_session_duration(),
        tags: role
            .tags()
            .iter()
            .map(|tag| RoleTag {
                key: tag.key().to_string(),
                value: tag.value().to_string(),
            })
            .collect(),
    })
}

/// Factory for [`AwsIamClient`]s.
pub struct AwsIamClientFactory {
    endpoint_url: Option<String>,
    span: Span,
}

impl AwsIamClientFactory {
    pub fn new() -> Self {
        Self {
            endpoint_url: None,
            span: info_span!("iam_client_factory"),
        }
    }

    /// Send requests to `endpoint_url` instead of the regional AWS endpoint
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    async fn build(&self, region: &str) -> AwsIamClient {
        info!(region = %region, "Creating IAM client using region {}", region);

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint_url) = &self.endpoint_url {
            debug!(endpoint = %endpoint_url, "Using IAM endpoint override");
            loader = loader.endpoint_url(endpoint_url);
        }
        let config = loader.load().await;

        AwsIamClient::new(Client::new(&config), region)
    }
}

impl Default for AwsIamClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IamClientFactory for AwsIamClientFactory {
    type Client = AwsIamClient;

    async fn create(&self, region: &str) -> Result<AwsIamClient> {
        let client = self.build(region).instrument(self.span.clone()).await;
        Ok(client)
    }
}

/// Build one IAM client for `region`, or [`DEFAULT_AWS_REGION`] when omitted.
pub async fn iam_client(region: Option<&str>) -> Result<AwsIamClient> {
    AwsIamClientFactory::new()
        .create(region.unwrap_or(DEFAULT_AWS_REGION))
        .await
}
