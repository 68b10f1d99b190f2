use serde::{Deserialize, Serialize};

use crate::{orig, StationID};

/// A stop on one or more lines. Two stations are the same station iff their IDs match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Station {
    pub id: StationID,
    pub orig_id: orig::StationID,
    pub name: String,
}

impl Station {
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.orig_id)
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl std::hash::Hash for Station {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
