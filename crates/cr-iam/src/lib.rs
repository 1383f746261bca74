//! IAM role listing and inline policy management
//!
//! - [`IamClientFactory`] builds region-bound clients
//! - [`RoleLister`] walks `ListRoles` pages until the provider stops truncating
//! - [`PolicyUpserter`] creates or replaces a role's inline policy
//!
//! All provider access goes through the [`IamApi`] trait. [`AwsIamClient`] is
//! the AWS SDK implementation; tests substitute a scripted one.

pub mod client;
pub mod error;
pub mod policy;
pub mod roles;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    iam_client, AwsIamClient, AwsIamClientFactory, IamApi, IamClientFactory, PageRequest, RolePage,
};
pub use error::IamError;
pub use policy::{create_or_update_role_policy, PolicyUpserter};
pub use roles::{list_roles, RoleLister};

pub use cr_common::{PolicyAttachment, Role, RoleTag, DEFAULT_AWS_REGION, MAX_PAGE_SIZE};

pub type Result<T> = std::result::Result<T, IamError>;
