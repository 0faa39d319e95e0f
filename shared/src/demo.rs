use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{ClosedSet, EntityKind, Record, SortKey, StatusSet};

closed_set! {
    pub enum DemoStatus {
        Pending => "pending",
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl StatusSet for DemoStatus {
    const INITIAL: Self = DemoStatus::Pending;
}

closed_set! {
    pub enum DemoField {
        Name => "name",
        Company => "company",
        PreferredDate => "preferred_date",
        Status => "status",
        CreatedAt => "created_at",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoRequest {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub product: String,
    pub preferred_date: Option<DateTime<Utc>>,
    pub status: DemoStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoDraft {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub product: String,
    pub preferred_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub product: Option<String>,
    pub preferred_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<DemoStatus>,
    pub notes: Option<Option<String>>,
}

impl From<DemoDraft> for DemoPatch {
    fn from(draft: DemoDraft) -> Self {
        Self {
            name: Some(draft.name),
            company: Some(draft.company),
            email: Some(draft.email),
            phone: Some(draft.phone),
            product: Some(draft.product),
            preferred_date: Some(draft.preferred_date),
            status: None,
            notes: Some(draft.notes),
        }
    }
}

impl Record for DemoRequest {
    type Status = DemoStatus;
    type Field = DemoField;
    type Draft = DemoDraft;
    type Patch = DemoPatch;

    const KIND: EntityKind = EntityKind::DemoRequest;
    const DEFAULT_SORT: DemoField = DemoField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status(&self) -> DemoStatus {
        self.status
    }

    fn search_haystack(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.company.as_str(),
            self.email.as_str(),
            self.product.as_str(),
        ]
    }

    fn sort_key(&self, field: DemoField) -> SortKey<'_> {
        match field {
            DemoField::Name => SortKey::text(&self.name),
            DemoField::Company => SortKey::text(&self.company),
            DemoField::PreferredDate => SortKey::optional_timestamp(self.preferred_date),
            DemoField::Status => SortKey::text(self.status.as_str()),
            DemoField::CreatedAt => SortKey::timestamp(self.created_at),
        }
    }

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: DemoDraft) -> Self {
        Self {
            id,
            name: draft.name,
            company: draft.company,
            email: draft.email,
            phone: draft.phone,
            product: draft.product,
            preferred_date: draft.preferred_date,
            status: DemoStatus::INITIAL,
            notes: draft.notes,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: DemoPatch) {
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
        if let Some(product) = patch.product {
            self.product = product;
        }
        if let Some(preferred_date) = patch.preferred_date {
            self.preferred_date = preferred_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn set_patch_status(patch: &mut DemoPatch, status: DemoStatus) {
        patch.status = Some(status);
    }
}
