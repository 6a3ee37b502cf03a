use std::collections::HashMap;

use keyport_primitives::{Key, KeyId, Purpose};

use crate::{error::IdentityError, set::OrderedSet};

/// Registry of purpose-tagged keys.
///
/// Keys are stored per identifier; a per-purpose ordered index gives
/// insertion-ordered enumeration. The store enforces one invariant of its
/// own: the last management key can never be removed. Who may mutate the
/// store is the engine's concern, not the store's.
#[derive(Clone, Debug, Default)]
pub struct KeyStore {
    keys: HashMap<KeyId, Key>,
    by_purpose: HashMap<Purpose, OrderedSet<KeyId>>,
}

impl KeyStore {
    /// Add `purpose` to the key stored under `id`, inserting the key if
    /// absent. Returns whether the store changed; re-adding a held purpose
    /// is a no-op and does not rewrite the stored key type.
    pub fn add(&mut self, id: KeyId, purpose: Purpose, key_type: u64) -> bool {
        let key = self
            .keys
            .entry(id)
            .or_insert_with(|| Key { purposes: Vec::new(), key_type, id });
        if key.purposes.contains(&purpose) {
            return false;
        }
        key.purposes.push(purpose);
        self.by_purpose.entry(purpose).or_default().insert(id);
        true
    }

    /// Remove `purpose` from the key stored under `id`. Returns whether the
    /// store changed; removing an absent key or purpose is a no-op. A key
    /// whose last purpose is removed is dropped entirely.
    pub fn remove(&mut self, id: KeyId, purpose: Purpose) -> Result<bool, IdentityError> {
        if !self.has_purpose(&id, purpose) {
            return Ok(false);
        }
        if purpose == Purpose::Management && self.count(Purpose::Management) == 1 {
            return Err(IdentityError::LastManagerRemoval);
        }

        if let Some(key) = self.keys.get_mut(&id) {
            key.purposes.retain(|held| *held != purpose);
            if key.purposes.is_empty() {
                self.keys.remove(&id);
            }
        }
        if let Some(index) = self.by_purpose.get_mut(&purpose) {
            index.remove(&id);
        }
        Ok(true)
    }

    /// Clone of the key record, or the zero sentinel if absent.
    pub fn get(&self, id: &KeyId) -> Key {
        self.keys.get(id).cloned().unwrap_or_default()
    }

    pub fn has_purpose(&self, id: &KeyId, purpose: Purpose) -> bool {
        self.keys
            .get(id)
            .is_some_and(|key| key.purposes.contains(&purpose))
    }

    /// Identifiers holding `purpose`, in insertion order.
    pub fn by_purpose(&self, purpose: Purpose) -> &[KeyId] {
        self.by_purpose
            .get(&purpose)
            .map(|index| index.as_slice())
            .unwrap_or_default()
    }

    pub fn count(&self, purpose: Purpose) -> usize {
        self.by_purpose
            .get(&purpose)
            .map(|index| index.len())
            .unwrap_or_default()
    }
}
