use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single validated outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    pub to: String,
    pub message: String,
}

/// Rejection reason for one entry of a bulk batch, tagged with its original index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryError {
    pub index: usize,
    pub error: String,
}

/// Recipient -> message bodies, iterated in the order recipients were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedMessages {
    groups: IndexMap<String, Vec<String>>,
}

impl GroupedMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, to: String, message: String) {
        self.groups.entry(to).or_default().push(message);
    }

    pub fn get(&self, to: &str) -> Option<&[String]> {
        self.groups.get(to).map(Vec::as_slice)
    }

    pub fn recipient_count(&self) -> usize {
        self.groups.len()
    }

    pub fn message_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(to, messages)| (to.as_str(), messages.as_slice()))
    }
}

impl IntoIterator for GroupedMessages {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// A configured tenant. The phone number is also the transport session id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub phone_number: String,
    pub api_key: String,
}

impl Tenant {
    pub fn session_id(&self) -> &str {
        &self.phone_number
    }
}

impl fmt::Debug for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tenant")
            .field("phone_number", &self.phone_number)
            .field("api_key", &"***")
            .finish()
    }
}

/// Outcome of one dispatcher run. Only logged; the HTTP caller never sees it.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub session: String,
    pub recipients: usize,
    pub delivered: usize,
    pub failed: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
