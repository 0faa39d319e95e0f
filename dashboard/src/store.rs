//! In-memory entity collection for one screen
//!
//! The store is the authoritative list of records for a single domain. It
//! guarantees id uniqueness for its whole lifetime and never lets an edit
//! replace a record's `id` or `created_at`.

use chrono::Utc;
use crm_shared::Record;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone)]
pub struct EntityStore<R: Record> {
    records: Vec<R>,
    /// Every id ever issued or seeded, so a removed id is never reused
    issued: HashSet<Uuid>,
}

impl<R: Record> EntityStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            issued: HashSet::new(),
        }
    }

    /// Builds a store from existing records, rejecting duplicate ids
    pub fn with_records(records: Vec<R>) -> DashboardResult<Self> {
        let mut store = Self::new();
        store.seed(records)?;
        Ok(store)
    }

    /// Replaces the contents. On a duplicate id nothing is changed.
    pub fn seed(&mut self, records: Vec<R>) -> DashboardResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(DashboardError::Conflict(format!(
                    "duplicate {} id {}",
                    R::KIND,
                    record.id()
                )));
            }
        }
        self.issued.extend(seen);
        self.records = records;
        debug!(kind = %R::KIND, count = self.records.len(), "store seeded");
        Ok(())
    }

    /// Draws an id that has never been present in this store
    pub fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }

    /// Builds a record from `draft` with a fresh id, `created_at = now` and
    /// the initial status, without inserting it.
    pub fn prepare(&self, draft: R::Draft) -> R {
        R::from_draft(self.fresh_id(), Utc::now(), draft)
    }

    pub fn create(&mut self, draft: R::Draft) -> R {
        let record = self.prepare(draft);
        self.insert(record.clone());
        record
    }

    /// Appends a prepared record. Its id must not already be live.
    pub(crate) fn insert(&mut self, record: R) {
        debug_assert!(!self.contains(record.id()));
        self.issued.insert(record.id());
        self.records.push(record);
    }

    /// Merged copy of the record with `patch` applied, leaving the store
    /// untouched.
    pub fn preview_update(&self, id: Uuid, patch: R::Patch) -> DashboardResult<R> {
        let mut updated = self
            .get(id)
            .cloned()
            .ok_or_else(|| DashboardError::not_found(R::KIND, id))?;
        updated.apply_patch(patch);
        Ok(updated)
    }

    pub fn update(&mut self, id: Uuid, patch: R::Patch) -> DashboardResult<R> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| DashboardError::not_found(R::KIND, id))?;

        let created_at = record.created_at();
        record.apply_patch(patch);
        debug_assert_eq!(record.id(), id);
        debug_assert_eq!(record.created_at(), created_at);
        Ok(record.clone())
    }

    pub(crate) fn replace(&mut self, updated: R) -> DashboardResult<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|record| record.id() == updated.id())
            .ok_or_else(|| DashboardError::not_found(R::KIND, updated.id()))?;
        *slot = updated;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> DashboardResult<R> {
        let index = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| DashboardError::not_found(R::KIND, id))?;
        Ok(self.records.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }
}

impl<R: Record> Default for EntityStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_shared::{Lead, LeadDraft, LeadPatch, LeadSource, LeadStatus};

    fn draft(name: &str) -> LeadDraft {
        LeadDraft {
            name: name.to_string(),
            company: "Initech".to_string(),
            email: format!("{}@initech.com", name.to_lowercase()),
            phone: Some("(555) 010-2000".to_string()),
            source: LeadSource::Website,
            value: None,
            owner: None,
            notes: None,
        }
    }

    #[test]
    fn test_create_assigns_unique_id_and_initial_status() {
        let mut store = EntityStore::<Lead>::new();
        let first = store.create(draft("Peter"));
        let second = store.create(draft("Samir"));

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, LeadStatus::New);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_preserves_identity() {
        let mut store = EntityStore::<Lead>::new();
        let lead = store.create(draft("Peter"));

        let updated = store
            .update(
                lead.id,
                LeadPatch {
                    status: Some(LeadStatus::Qualified),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, lead.id);
        assert_eq!(updated.created_at, lead.created_at);
        assert_eq!(updated.status, LeadStatus::Qualified);
        assert_eq!(updated.name, lead.name);
    }

    #[test]
    fn test_update_missing_is_not_found_and_leaves_store() {
        let mut store = EntityStore::<Lead>::new();
        let lead = store.create(draft("Peter"));
        let before: Vec<Lead> = store.iter().cloned().collect();

        let result = store.update(Uuid::new_v4(), LeadPatch::default());

        assert!(matches!(result, Err(DashboardError::NotFound { .. })));
        assert_eq!(store.as_slice(), before.as_slice());
        assert_eq!(store.get(lead.id), Some(&lead));
    }

    #[test]
    fn test_remove_only_when_present() {
        let mut store = EntityStore::<Lead>::new();
        let lead = store.create(draft("Peter"));
        store.create(draft("Michael"));

        assert!(store.remove(Uuid::new_v4()).is_err());
        assert_eq!(store.len(), 2);
        assert_eq!(store.remove(lead.id).unwrap().id, lead.id);
        assert_eq!(store.len(), 1);
        assert!(store.remove(lead.id).is_err());
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let store = EntityStore::<Lead>::new();
        let lead = store.prepare(draft("Peter"));
        let result = EntityStore::with_records(vec![lead.clone(), lead]);
        assert!(matches!(result, Err(DashboardError::Conflict(_))));
    }

    #[test]
    fn test_preview_update_does_not_mutate() {
        let mut store = EntityStore::<Lead>::new();
        let lead = store.create(draft("Peter"));
        let preview = store
            .preview_update(
                lead.id,
                LeadPatch {
                    name: Some("Bill".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(preview.name, "Bill");
        assert_eq!(store.get(lead.id).unwrap().name, "Peter");
    }
}
