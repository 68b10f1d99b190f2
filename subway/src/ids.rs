use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod orig {
    use serde::{Deserialize, Serialize};

    /// The identifier a station has in whatever system it was imported from.
    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct StationID(pub String);

    impl std::fmt::Display for StationID {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationID(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineID(usize);

impl CheapID for StationID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}
impl CheapID for LineID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}

pub trait CheapID: Copy {
    fn new(x: usize) -> Self;
}

/// Hands out dense cheap IDs to external IDs, in the order they're first seen. Each external ID
/// gets exactly one cheap ID; asking again for a known one is an error and changes nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IDMapping<K: Ord, V> {
    assigned: BTreeMap<K, V>,
}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> IDMapping<K, V> {
    pub fn new() -> Self {
        Self {
            assigned: BTreeMap::new(),
        }
    }

    pub fn insert_new(&mut self, orig: K) -> Result<V> {
        // IDs stay dense because nothing is ever removed
        let next = V::new(self.assigned.len());
        match self.assigned.entry(orig) {
            Entry::Occupied(entry) => bail!("{:?} already has an ID", entry.key()),
            Entry::Vacant(entry) => Ok(*entry.insert(next)),
        }
    }

    pub fn lookup(&self, orig: &K) -> Result<V> {
        match self.assigned.get(orig) {
            Some(x) => Ok(*x),
            None => bail!("No ID for {:?}", orig),
        }
    }

    pub fn contains(&self, orig: &K) -> bool {
        self.assigned.contains_key(orig)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> Default for IDMapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_new_assigns_sequential_ids() {
        let mut ids: IDMapping<orig::StationID, StationID> = IDMapping::new();
        let a = ids.insert_new(orig::StationID("gangnam".to_string())).unwrap();
        let b = ids.insert_new(orig::StationID("yeoksam".to_string())).unwrap();
        assert_eq!(a, StationID::new(0));
        assert_eq!(b, StationID::new(1));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn insert_new_rejects_duplicates() {
        let mut ids: IDMapping<orig::StationID, StationID> = IDMapping::new();
        ids.insert_new(orig::StationID("gangnam".to_string())).unwrap();
        ids.insert_new(orig::StationID("yeoksam".to_string())).unwrap();
        assert!(ids
            .insert_new(orig::StationID("gangnam".to_string()))
            .is_err());
        assert_eq!(ids.len(), 2);
        // The rejected insert didn't remap anything, and the next ID is still fresh
        assert_eq!(
            ids.lookup(&orig::StationID("gangnam".to_string())).unwrap(),
            StationID::new(0)
        );
        let c = ids.insert_new(orig::StationID("samseong".to_string())).unwrap();
        assert_eq!(c, StationID::new(2));
        assert!(ids.contains(&orig::StationID("samseong".to_string())));
    }

    #[test]
    fn lookup_unknown_fails() {
        let ids: IDMapping<orig::StationID, StationID> = IDMapping::new();
        assert!(ids.lookup(&orig::StationID("nowhere".to_string())).is_err());
    }
}
