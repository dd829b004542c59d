use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use contact_core::Contact;

/// Volatile repository of contacts keyed by unique id.
///
/// Shared by every request handler through an `Arc`; all operations take
/// `&self` and are atomic with respect to the whole map. Nothing here
/// outlives the process.
#[derive(Debug, Default)]
pub struct ContactStore {
    contacts: RwLock<HashMap<String, Contact>>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `contact`, replacing any entry with the same unique id.
    pub fn put(&self, contact: Contact) {
        let unique_id = contact.unique_id().to_string();
        let replaced = self.write().insert(unique_id.clone(), contact).is_some();
        log::debug!("contact stored id={unique_id} replaced={replaced}");
    }

    pub fn get(&self, unique_id: &str) -> Option<Contact> {
        self.read().get(unique_id).cloned()
    }

    /// Removes the entry if present. Deleting an absent id is a no-op.
    pub fn delete(&self, unique_id: &str) {
        let removed = self.write().remove(unique_id).is_some();
        log::debug!("contact deleted id={unique_id} existed={removed}");
    }

    /// Point-in-time copy of every stored contact, in no particular order.
    pub fn list_snapshot(&self) -> Vec<Contact> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Entries are replaced whole, so a map behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Contact>> {
        self.contacts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Contact>> {
        self.contacts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete_lifecycle() {
        let store = ContactStore::new();
        let contact = Contact::new("pmj", "Philip", "Johnson", "Professor");
        store.put(contact.clone());

        assert_eq!(store.get("pmj"), Some(contact));
        assert_eq!(store.get("foo"), None);
        assert_eq!(store.list_snapshot().len(), 1);

        store.delete("pmj");
        assert_eq!(store.get("pmj"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn put_overwrites_same_id() {
        let store = ContactStore::new();
        store.put(Contact::new("pmj", "Philip", "Johnson", "Professor"));
        store.put(Contact::new("pmj", "Phil", "Johnson", "Emeritus"));

        assert_eq!(store.len(), 1);
        let stored = store.get("pmj").expect("present");
        assert_eq!(stored.first_name(), "Phil");
        assert_eq!(stored.info(), "Emeritus");
    }

    #[test]
    fn delete_is_idempotent() {
        let store = ContactStore::new();
        store.put(Contact::new("x", "a", "b", "c"));
        store.delete("x");
        assert_eq!(store.get("x"), None);
        store.delete("x");
        assert_eq!(store.get("x"), None);
        store.delete("never-there");
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let store = ContactStore::new();
        store.put(Contact::new("a", "A", "A", "first"));
        let snapshot = store.list_snapshot();

        store.put(Contact::new("b", "B", "B", "second"));
        store.put(Contact::new("a", "A", "A", "changed"));
        store.delete("a");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].unique_id(), "a");
        assert_eq!(snapshot[0].info(), "first");
        assert_eq!(store.len(), 1);
    }
}
