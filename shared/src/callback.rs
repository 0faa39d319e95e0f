use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    pub enum CallbackStatus {
        Pending => "pending",
        Scheduled => "scheduled",
        Completed => "completed",
        Missed => "missed",
    }
}

impl StatusSet for CallbackStatus {
    const INITIAL: Self = CallbackStatus::Pending;
}

closed_set! {
    pub enum CallbackField {
        Name => "name",
        PreferredTime => "preferred_time",
        Status => "status",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackRequest {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub status: CallbackStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackDraft {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: Option<DateTime<Utc>>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub preferred_time: Option<Option<DateTime<Utc>>>,
    pub reason: Option<String>,
    pub status: Option<CallbackStatus>,
}

impl From<CallbackDraft> for CallbackPatch {
    fn from(draft: CallbackDraft) -> Self {
        Self {
            name: Some(draft.name),
            phone: Some(draft.phone),
            email: Some(draft.email),
            preferred_time: Some(draft.preferred_time),
            reason: Some(draft.reason),
            status: None,
        }
    }
}

impl Record for CallbackRequest {
    type Status = CallbackStatus;
    type Field = CallbackField;
    type Draft = CallbackDraft;
    type Patch = CallbackPatch;

    const KIND: EntityKind = EntityKind::CallbackRequest;
    const DEFAULT_SORT: CallbackField = CallbackField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> CallbackStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.phone.as_str(), self.reason.as_str()]
    }

    fn sort_key(&self, field: CallbackField) -> SortKey<'_> {
        match field {
            CallbackField::Name => SortKey::text(&self.name),
            CallbackField::PreferredTime => SortKey::optional_timestamp(self.preferred_time),
            CallbackField::Status => SortKey::text(self.status.as_str()),
            CallbackField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: CallbackDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            preferred_time: draft.preferred_time,
            reason: draft.reason,
            status: CallbackStatus::INITIAL,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: CallbackPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(preferred_time) = patch.preferred_time {
            self.preferred_time = preferred_time;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn set_patch_status(patch: &mut CallbackPatch, status: CallbackStatus) {
        patch.status = Some(status);
    }
}
