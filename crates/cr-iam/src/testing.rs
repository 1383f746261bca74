//! In-memory IAM doubles for unit tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

use cr_common::{PolicyAttachment, Role};

use crate::{IamApi, IamClientFactory, IamError, PageRequest, Result, RolePage};

/// Replays scripted `ListRoles` pages and records every request.
pub(crate) struct ScriptedIam {
    region: String,
    pages: Mutex<VecDeque<Result<RolePage>>>,
    put_error: Mutex<Option<String>>,
    pub list_requests: Mutex<Vec<PageRequest>>,
    pub put_requests: Mutex<Vec<PolicyAttachment>>,
}

impl ScriptedIam {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            pages: Mutex::new(VecDeque::new()),
            put_error: Mutex::new(None),
            list_requests: Mutex::new(Vec::new()),
            put_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, roles: Vec<Role>, marker: Option<&str>) -> Self {
        self.pages.lock().push_back(Ok(RolePage {
            roles,
            is_truncated: marker.is_some(),
            marker: marker.map(str::to_string),
        }));
        self
    }

    pub fn with_raw_page(self, page: RolePage) -> Self {
        self.pages.lock().push_back(Ok(page));
        self
    }

    pub fn with_list_error(self, message: &str) -> Self {
        self.pages
            .lock()
            .push_back(Err(IamError::provider("ListRoles", io::Error::other(message.to_string()))));
        self
    }

    pub fn failing_puts(self, message: &str) -> Self {
        *self.put_error.lock() = Some(message.to_string());
        self
    }

    pub fn list_request_count(&self) -> usize {
        self.list_requests.lock().len()
    }
}

#[async_trait]
impl IamApi for ScriptedIam {
    fn region(&self) -> &str {
        &self.region
    }

    async fn list_roles_page(&self, request: &PageRequest) -> Result<RolePage> {
        self.list_requests.lock().push(request.clone());
        self.pages.lock().pop_front().unwrap_or_else(|| {
            Err(IamError::provider(
                "ListRoles",
                io::Error::other("no scripted page left"),
            ))
        })
    }

    async fn put_role_policy(&self, attachment: &PolicyAttachment) -> Result<()> {
        self.put_requests.lock().push(attachment.clone());
        match self.put_error.lock().clone() {
            Some(message) => Err(IamError::provider("PutRolePolicy", io::Error::other(message))),
            None => Ok(()),
        }
    }
}

/// Hands out a fresh [`ScriptedIam`] per `create` call and keeps them all.
#[derive(Default)]
pub(crate) struct RecordingFactory {
    pub clients: Mutex<Vec<Arc<ScriptedIam>>>,
    put_error: Option<String>,
}

impl RecordingFactory {
    pub fn failing_puts(message: &str) -> Self {
        Self {
            clients: Mutex::new(Vec::new()),
            put_error: Some(message.to_string()),
        }
    }

    pub fn created_regions(&self) -> Vec<String> {
        self.clients.lock().iter().map(|c| c.region().to_string()).collect()
    }
}

#[async_trait]
impl IamClientFactory for RecordingFactory {
    type Client = Arc<ScriptedIam>;

    async fn create(&self, region: &str) -> Result<Arc<ScriptedIam>> {
        let mut client = ScriptedIam::new(region);
        if let Some(message) = &self.put_error {
            client = client.failing_puts(message);
        }
        let client = Arc::new(client);
        self.clients.lock().push(client.clone());
        Ok(client)
    }
}

pub(crate) fn role(name: &str) -> Role {
    Role::new(
        name,
        format!("AROA{}", name.to_uppercase()),
        format!("arn:aws:iam::123456789012:role/{}", name),
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
    )
}

pub(crate) fn roles(prefix: &str, count: usize) -> Vec<Role> {
    (0..count).map(|i| role(&format!("{}-{}", prefix, i))).collect()
}

/// Log sink for a scoped `tracing` subscriber.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Install a subscriber writing here for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
