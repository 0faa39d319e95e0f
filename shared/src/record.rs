//! The record contract every CRM entity kind implements.
//!
//! A record has an immutable id, a creation timestamp, a status from a closed
//! set, a fixed list of searchable text fields and a typed set of sortable
//! fields. Creation goes through a `Draft`, edits through a `Patch`; neither
//! carries `id` or `created_at`, so those can never be replaced.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// A closed enumeration addressable by a stable string key.
pub trait ClosedSet: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {
    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Case-insensitive lookup by key, surrounding whitespace ignored.
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
    }
}

/// A status lifecycle. `INITIAL` is assigned to every newly created record.
pub trait StatusSet: ClosedSet {
    const INITIAL: Self;
}

closed_set! {
    /// Every entity kind the dashboard manages
    pub enum EntityKind {
        Lead => "lead",
        DemoRequest => "demo_request",
        CallbackRequest => "callback_request",
        Consultation => "consultation",
        Email => "email",
        WhatsAppMessage => "whats_app_message",
    }
}

impl EntityKind {
    /// Human readable, plural label used for screen titles
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Lead => "Leads",
            EntityKind::DemoRequest => "Demo Requests",
            EntityKind::CallbackRequest => "Callbacks",
            EntityKind::Consultation => "Consultations",
            EntityKind::Email => "Email",
            EntityKind::WhatsAppMessage => "WhatsApp",
        }
    }
}

/// A comparable projection of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<'a> {
    Missing,
    Text(&'a str),
    Timestamp(i64),
    Number(Decimal),
}

impl<'a> SortKey<'a> {
    pub fn text(value: &'a str) -> Self {
        SortKey::Text(value)
    }

    pub fn optional_text(value: Option<&'a str>) -> Self {
        value.map(SortKey::Text).unwrap_or(SortKey::Missing)
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        SortKey::Timestamp(value.timestamp_millis())
    }

    pub fn optional_timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map(SortKey::timestamp).unwrap_or(SortKey::Missing)
    }

    pub fn number(value: impl Into<Decimal>) -> Self {
        SortKey::Number(value.into())
    }

    pub fn optional_number(value: Option<Decimal>) -> Self {
        value.map(SortKey::Number).unwrap_or(SortKey::Missing)
    }

    /// Ascending comparison. `Missing` sorts before any present value.
    pub fn compare(&self, other: &SortKey<'_>) -> Ordering {
        match (self, other) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Less,
            (_, SortKey::Missing) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => locale_compare(a, b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Text(_) => 1,
            SortKey::Timestamp(_) => 2,
            SortKey::Number(_) => 3,
        }
    }
}

/// Locale-style string ordering: case-folded comparison first, raw code
/// points only to break ties between strings that differ in case alone.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

pub trait Record: Clone + Debug + Send + Sync + 'static {
    type Status: StatusSet;
    type Field: ClosedSet;
    type Draft: Clone + Debug + Send + Sync + 'static;
    type Patch: Clone + Debug + Default + From<Self::Draft> + Send + Sync + 'static;

    const KIND: EntityKind;
    /// Field a fresh view sorts by
    const DEFAULT_SORT: Self::Field;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn status(&self) -> Self::Status;

    /// Values of the fixed set of searchable fields. Absent optional fields
    /// are skipped.
    fn search_haystack(&self) -> Vec<&str>;

    fn sort_key(&self, field: Self::Field) -> SortKey<'_>;

    fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    fn set_patch_status(patch: &mut Self::Patch, status: Self::Status);

    /// Case-insensitive substring match over the searchable fields. Only the
    /// empty query matches everything; whitespace is matched literally.
    fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.search_haystack()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}
