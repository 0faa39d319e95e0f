use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    pub enum LeadStatus {
        New => "new",
        Contacted => "contacted",
        Qualified => "qualified",
        Proposal => "proposal",
        Won => "won",
        Lost => "lost",
    }
}

impl StatusSet for LeadStatus {
    const INITIAL: Self = LeadStatus::New;
}

closed_set! {
    pub enum LeadSource {
        Website => "website",
        Referral => "referral",
        Social => "social",
        Event => "event",
        ColdCall => "cold_call",
        Other => "other",
    }
}

closed_set! {
    pub enum LeadField {
        Name => "name",
        Company => "company",
        Status => "status",
        Value => "value",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub value: Option<Decimal>, // estimated deal size
    pub owner: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: LeadSource,
    pub value: Option<Decimal>,
    pub owner: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub value: Option<Option<Decimal>>,
    pub owner: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl From<LeadDraft> for LeadPatch {
    fn from(draft: LeadDraft) -> Self {
        Self {
            name: Some(draft.name),
            company: Some(draft.company),
            email: Some(draft.email),
            phone: Some(draft.phone),
            source: Some(draft.source),
            status: None,
            value: Some(draft.value),
            owner: Some(draft.owner),
            notes: Some(draft.notes),
        }
    }
}

impl Record for Lead {
    type Status = LeadStatus;
    type Field = LeadField;
    type Draft = LeadDraft;
    type Patch = LeadPatch;

    const KIND: EntityKind = EntityKind::Lead;
    const DEFAULT_SORT: LeadField = LeadField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> LeadStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.company.as_str(), self.email.as_str()];
        fields.extend(self.phone.as_deref());
        fields
    }

    fn sort_key(&self, field: LeadField) -> SortKey<'_> {
        match field {
            LeadField::Name => SortKey::text(&self.name),
            LeadField::Company => SortKey::text(&self.company),
            LeadField::Status => SortKey::text(self.status.as_str()),
            LeadField::Value => SortKey::optional_number(self.value),
            LeadField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: LeadDraft) -> Self {
        Self {
            id,
            name: draft.name,
            company: draft.company,
            email: draft.email,
            phone: draft.phone,
            source: draft.source,
            status: LeadStatus::INITIAL,
            value: draft.value,
            owner: draft.owner,
            notes: draft.notes,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: LeadPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn set_patch_status(patch: &mut LeadPatch, status: LeadStatus) {
        patch.status = Some(status);
    }
}
