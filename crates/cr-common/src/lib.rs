use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod logging;

/// Region used when the caller does not name one.
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Largest `MaxItems` value IAM accepts on a single `ListRoles` page.
pub const MAX_PAGE_SIZE: i32 = 1000;

// ============================================================================
// IAM Role Model
// ============================================================================

/// An IAM role as returned by the provider.
///
/// Fields are carried through untouched. Serialization uses the provider's
/// own key names so JSON output matches what `ListRoles` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub path: String,
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    pub create_date: DateTime<Utc>,
    /// URL-encoded trust policy, exactly as the provider sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<RoleTag>,
}

impl Role {
    /// Minimal role with the fields IAM always returns.
    pub fn new(
        role_name: impl Into<String>,
        role_id: impl Into<String>,
        arn: impl Into<String>,
        create_date: DateTime<Utc>,
    ) -> Self {
        Self {
            path: "/".to_string(),
            role_name: role_name.into(),
            role_id: role_id.into(),
            arn: arn.into(),
            create_date,
            assume_role_policy_document: None,
            description: None,
            max_session_duration: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleTag {
    pub key: String,
    pub value: String,
}

// ============================================================================
// Inline Policy Attachment
// ============================================================================

/// A create-or-replace request for one inline policy on one role.
///
/// The document is passed through as text; IAM overwrites any existing
/// policy with the same name under the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyAttachment {
    pub role_name: String,
    pub policy_name: String,
    pub policy_document: String,
}

impl PolicyAttachment {
    pub fn new(
        role_name: impl Into<String>,
        policy_name: impl Into<String>,
        policy_document: impl Into<String>,
    ) -> Self {
        Self {
            role_name: role_name.into(),
            policy_name: policy_name.into(),
            policy_document: policy_document.into(),
        }
    }
}
