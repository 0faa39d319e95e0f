use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    /// Mailbox state. Composed messages start as drafts; received ones are
    /// seeded as unread.
    pub enum EmailStatus {
        Draft => "draft",
        Sent => "sent",
        Unread => "unread",
        Read => "read",
        Archived => "archived",
    }
}

impl StatusSet for EmailStatus {
    const INITIAL: Self = EmailStatus::Draft;
}

closed_set! {
    pub enum EmailField {
        Subject => "subject",
        Sender => "sender",
        Status => "status",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub starred: bool,
    pub status: EmailStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailPatch {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub starred: Option<bool>,
    pub status: Option<EmailStatus>,
}

impl From<EmailDraft> for EmailPatch {
    fn from(draft: EmailDraft) -> Self {
        Self {
            sender: Some(draft.sender),
            recipient: Some(draft.recipient),
            subject: Some(draft.subject),
            body: Some(draft.body),
            starred: None,
            status: None,
        }
    }
}

impl Record for Email {
    type Status = EmailStatus;
    type Field = EmailField;
    type Draft = EmailDraft;
    type Patch = EmailPatch;

    const KIND: EntityKind = EntityKind::Email;
    const DEFAULT_SORT: EmailField = EmailField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> EmailStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        vec![self.sender.as_str(), self.recipient.as_str(), self.subject.as_str()]
    }

    fn sort_key(&self, field: EmailField) -> SortKey<'_> {
        match field {
            EmailField::Subject => SortKey::text(&self.subject),
            EmailField::Sender => SortKey::text(&self.sender),
            EmailField::Status => SortKey::text(self.status.as_str()),
            EmailField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: EmailDraft) -> Self {
        Self {
            id,
            sender: draft.sender,
            recipient: draft.recipient,
            subject: draft.subject,
            body: draft.body,
            starred: false,
            status: EmailStatus::INITIAL,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: EmailPatch) {
        if let Some(sender) = patch.sender {
            self.sender = sender;
        }
        if let Some(recipient) = patch.recipient {
            self.recipient = recipient;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(starred) = patch.starred {
            self.starred = starred;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn set_patch_status(patch: &mut EmailPatch, status: EmailStatus) {
        patch.status = Some(status);
    }
}
