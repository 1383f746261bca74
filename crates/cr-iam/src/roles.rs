//! Role listing across `ListRoles` pages

use tracing::{debug, info, info_span, Instrument, Span};

use cr_common::{Role, MAX_PAGE_SIZE};

use crate::{IamApi, IamError, PageRequest, Result, RolePage};

/// Lists every role visible to the client's credentials.
///
/// The lister borrows a client the caller built; it never creates one.
/// Roles come back in the order IAM enumerated them, page after page.
pub struct RoleLister<'a, C: IamApi + ?Sized> {
    client: &'a C,
    page_size: i32,
    path_prefix: Option<String>,
    span: Span,
}

impl<'a, C: IamApi + ?Sized> RoleLister<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            page_size: MAX_PAGE_SIZE,
            path_prefix: None,
            span: info_span!("role_lister", region = %client.region()),
        }
    }

    /// Roles requested per page, clamped to what IAM accepts (1..=1000)
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Only list roles whose path starts with `path_prefix`
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(path_prefix.into());
        self
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Fetch all pages and return the accumulated roles.
    ///
    /// Stops at the first response that is not truncated. A truncated
    /// response without a marker fails with [`IamError::MissingMarker`]
    /// before any further request goes out.
    pub async fn list_all(&self) -> Result<Vec<Role>> {
        self.collect_pages()
            .instrument(self.span.clone())
            .await
    }

    async fn collect_pages(&self) -> Result<Vec<Role>> {
        info!("Retrieving all roles from IAM.");

        let RolePage {
            mut roles,
            mut is_truncated,
            mut marker,
        } = self.fetch_page(None, 1).await?;
        let mut pages = 1;

        while is_truncated {
            let cursor = marker
                .take()
                .filter(|m| !m.is_empty())
                .ok_or(IamError::MissingMarker { page: pages })?;

            pages += 1;
            let next = self.fetch_page(Some(cursor), pages).await?;
            roles.extend(next.roles);
            is_truncated = next.is_truncated;
            marker = next.marker;
        }

        info!(roles = roles.len(), pages, "Retrieved roles from IAM");
        Ok(roles)
    }

    async fn fetch_page(&self, marker: Option<String>, page: usize) -> Result<RolePage> {
        let request = PageRequest {
            max_items: self.page_size,
            marker,
            path_prefix: self.path_prefix.clone(),
        };

        let response = self.client.list_roles_page(&request).await?;
        debug!(
            page,
            count = response.roles.len(),
            truncated = response.is_truncated,
            "Fetched ListRoles page"
        );
        Ok(response)
    }
}

/// List every role with default settings.
pub async fn list_roles<C: IamApi + ?Sized>(client: &C) -> Result<Vec<Role>> {
    RoleLister::new(client).list_all().await
}
