//! Document id generation
//!
//! Foundry documents carry 16-character alphanumeric ids. Ids are opaque
//! labels: they never influence ranges or selection, so tests swap in
//! [`SequentialIds`] to get reproducible output.

use uuid::Uuid;

/// Length of a Foundry document id
pub const ID_LEN: usize = 16;

/// Source of document ids
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random ids derived from v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        hex[..ID_LEN].to_string()
    }
}

/// Deterministic ids: `prefix` followed by a zero-padded counter
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        let width = ID_LEN.saturating_sub(self.prefix.len());
        format!("{}{:0width$}", self.prefix, self.next, width = width)
    }
}
