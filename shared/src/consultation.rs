use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    pub enum ConsultationStatus {
        Requested => "requested",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl StatusSet for ConsultationStatus {
    const INITIAL: Self = ConsultationStatus::Requested;
}

closed_set! {
    pub enum ConsultationField {
        ClientName => "client_name",
        ScheduledAt => "scheduled_at",
        Duration => "duration",
        Status => "status",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub client_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub topic: String,
    pub consultant: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationDraft {
    pub client_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub topic: String,
    pub consultant: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultationPatch {
    pub client_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub topic: Option<String>,
    pub consultant: Option<Option<String>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub duration_minutes: Option<u32>,
    pub status: Option<ConsultationStatus>,
}

impl From<ConsultationDraft> for ConsultationPatch {
    fn from(draft: ConsultationDraft) -> Self {
        Self {
            client_name: Some(draft.client_name),
            email: Some(draft.email),
            phone: Some(draft.phone),
            topic: Some(draft.topic),
            consultant: Some(draft.consultant),
            scheduled_at: Some(draft.scheduled_at),
            duration_minutes: Some(draft.duration_minutes),
            status: None,
        }
    }
}

impl Record for Consultation {
    type Status = ConsultationStatus;
    type Field = ConsultationField;
    type Draft = ConsultationDraft;
    type Patch = ConsultationPatch;

    const KIND: EntityKind = EntityKind::Consultation;
    const DEFAULT_SORT: ConsultationField = ConsultationField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> ConsultationStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.client_name.as_str(), self.email.as_str(), self.topic.as_str()];
        fields.extend(self.consultant.as_deref());
        fields
    }

    fn sort_key(&self, field: ConsultationField) -> SortKey<'_> {
        match field {
            ConsultationField::ClientName => SortKey::text(&self.client_name),
            ConsultationField::ScheduledAt => SortKey::optional_timestamp(self.scheduled_at),
            ConsultationField::Duration => SortKey::number(self.duration_minutes),
            ConsultationField::Status => SortKey::text(self.status.as_str()),
            ConsultationField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: ConsultationDraft) -> Self {
        Self {
            id,
            client_name: draft.client_name,
            email: draft.email,
            phone: draft.phone,
            topic: draft.topic,
            consultant: draft.consultant,
            scheduled_at: draft.scheduled_at,
            duration_minutes: draft.duration_minutes,
            status: ConsultationStatus::INITIAL,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: ConsultationPatch) {
        if let Some(client_name) = patch.client_name {
            self.client_name = client_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(topic) = patch.topic {
            self.topic = topic;
        }
        if let Some(consultant) = patch.consultant {
            self.consultant = consultant;
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn set_patch_status(patch: &mut ConsultationPatch, status: ConsultationStatus) {
        patch.status = Some(status);
    }
}
