//! Client-side view of the users collection.
//!
//! All list mutations go through [`UserStore`], so ordering and merge rules
//! live in one place. Identifiers are unique within the store.

use std::collections::HashSet;

use tracing::warn;

use crate::domain::{Record, RecordId};

/// What [`UserStore::upsert`] did with the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Merged,
    Inserted,
}

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    records: Vec<Record>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id.as_ref() == Some(id))
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Swaps in a fresh server listing. Later duplicates of an id are dropped.
    pub fn replace(&mut self, records: Vec<Record>) {
        let mut seen = HashSet::new();
        self.records = records
            .into_iter()
            .filter(|record| match &record.id {
                Some(id) if !seen.insert(id.clone()) => {
                    warn!(%id, "dropping duplicate record id from listing");
                    false
                }
                _ => true,
            })
            .collect();
    }

    /// Merges `patch` over the entry with `id`, or appends a new entry.
    pub fn upsert(&mut self, id: RecordId, patch: &Record) -> Upsert {
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|record| record.id.as_ref() == Some(&id))
        {
            existing.merge(patch);
            return Upsert::Merged;
        }

        self.records.push(Record {
            id: Some(id),
            fields: patch.fields.clone(),
        });
        Upsert::Inserted
    }

    /// Removes the entry with `id`, keeping the relative order of the rest.
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        let position = self
            .records
            .iter()
            .position(|record| record.id.as_ref() == Some(id))?;
        Some(self.records.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str) -> Record {
        Record::new()
            .with_id(RecordId::Number(id))
            .with_field("name", name)
    }

    fn ids(store: &UserStore) -> Vec<RecordId> {
        store.list().iter().filter_map(|r| r.id.clone()).collect()
    }

    #[test]
    fn replace_drops_duplicate_ids() {
        let mut store = UserStore::new();
        store.replace(vec![user(1, "a"), user(2, "b"), user(1, "c")]);
        assert_eq!(ids(&store), vec![RecordId::Number(1), RecordId::Number(2)]);
        assert_eq!(store.get(&RecordId::Number(1)).unwrap().text("name"), "a");
    }

    #[test]
    fn upsert_merges_existing_entries_in_place() {
        let mut store = UserStore::new();
        store.replace(vec![user(1, "a"), user(2, "b")]);
        let patch = Record::new().with_field("name", "B").with_field("phone", "1");
        assert_eq!(store.upsert(RecordId::Number(2), &patch), Upsert::Merged);
        assert_eq!(store.len(), 2);
        let updated = store.get(&RecordId::Number(2)).unwrap();
        assert_eq!(updated.text("name"), "B");
        assert_eq!(updated.text("phone"), "1");
    }

    #[test]
    fn upsert_appends_unknown_ids() {
        let mut store = UserStore::new();
        store.replace(vec![user(1, "a")]);
        let created = Record::new().with_id(RecordId::Number(77)).with_field("name", "z");
        assert_eq!(store.upsert(RecordId::from("local-x"), &created), Upsert::Inserted);
        assert_eq!(ids(&store), vec![RecordId::Number(1), RecordId::from("local-x")]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = UserStore::new();
        store.replace(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        let removed = store.remove(&RecordId::Number(2)).unwrap();
        assert_eq!(removed.text("name"), "b");
        assert_eq!(ids(&store), vec![RecordId::Number(1), RecordId::Number(3)]);
        assert!(store.remove(&RecordId::Number(2)).is_none());
    }
}
