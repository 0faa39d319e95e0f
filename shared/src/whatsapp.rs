use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    pub enum MessageStatus {
        Queued => "queued",
        Sent => "sent",
        Delivered => "delivered",
        Read => "read",
        Failed => "failed",
    }
}

impl StatusSet for MessageStatus {
    const INITIAL: Self = MessageStatus::Queued;
}

closed_set! {
    pub enum MessageDirection {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

closed_set! {
    pub enum WhatsAppField {
        ContactName => "contact_name",
        Status => "status",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppMessage {
    pub id: Uuid,
    pub contact_name: String,
    pub phone: String,
    pub body: String,
    pub direction: MessageDirection,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

/// Composed messages are always outbound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppDraft {
    pub contact_name: String,
    pub phone: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppPatch {
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub body: Option<String>,
    pub status: Option<MessageStatus>,
}

impl From<WhatsAppDraft> for WhatsAppPatch {
    fn from(draft: WhatsAppDraft) -> Self {
        Self {
            contact_name: Some(draft.contact_name),
            phone: Some(draft.phone),
            body: Some(draft.body),
            status: None,
        }
    }
}

impl Record for WhatsAppMessage {
    type Status = MessageStatus;
    type Field = WhatsAppField;
    type Draft = WhatsAppDraft;
    type Patch = WhatsAppPatch;

    const KIND: EntityKind = EntityKind::WhatsAppMessage;
    const DEFAULT_SORT: WhatsAppField = WhatsAppField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> MessageStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        vec![self.contact_name.as_str(), self.phone.as_str(), self.body.as_str()]
    }

    fn sort_key(&self, field: WhatsAppField) -> SortKey<'_> {
        match field {
            WhatsAppField::ContactName => SortKey::text(&self.contact_name),
            WhatsAppField::Status => SortKey::text(self.status.as_str()),
            WhatsAppField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: WhatsAppDraft) -> Self {
        Self {
            id,
            contact_name: draft.contact_name,
            phone: draft.phone,
            body: draft.body,
            direction: MessageDirection::Outbound,
            status: MessageStatus::INITIAL,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: WhatsAppPatch) {
        if let Some(contact_name) = patch.contact_name {
            self.contact_name = contact_name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn set_patch_status(patch: &mut WhatsAppPatch, status: MessageStatus) {
        patch.status = Some(status);
    }
}
