use serde::{Deserialize, Serialize};

use crate::{SectionError, StationID};

/// A directed piece of a line, from `up_station` to `down_station`.
///
/// Only the owning `SectionChain` may change a section after it's built, so the fields stay
/// private and the mutators are crate-private.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    up_station: StationID,
    down_station: StationID,
    distance: u32,
}

impl Section {
    pub fn new(
        up_station: StationID,
        down_station: StationID,
        distance: u32,
    ) -> Result<Self, SectionError> {
        if up_station == down_station {
            return Err(SectionError::SameStation(up_station));
        }
        if distance == 0 {
            return Err(SectionError::InvalidDistance(0));
        }
        Ok(Self {
            up_station,
            down_station,
            distance,
        })
    }

    pub fn up_station(&self) -> StationID {
        self.up_station
    }

    pub fn down_station(&self) -> StationID {
        self.down_station
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn is_up(&self, station: StationID) -> bool {
        self.up_station == station
    }

    pub fn is_down(&self, station: StationID) -> bool {
        self.down_station == station
    }

    pub fn has_station(&self, station: StationID) -> bool {
        self.is_up(station) || self.is_down(station)
    }

    /// Used when something was inserted after this section; it now ends earlier.
    pub(crate) fn move_down_station_to(&mut self, station: StationID) {
        self.down_station = station;
    }

    /// Used when something was inserted before this section; it now starts later.
    pub(crate) fn move_up_station_to(&mut self, station: StationID) {
        self.up_station = station;
    }

    /// On failure, the distance is unchanged.
    pub(crate) fn adjust_distance(&mut self, delta: i64) -> Result<(), SectionError> {
        let result = i64::from(self.distance) + delta;
        if result <= 0 || result > i64::from(u32::MAX) {
            return Err(SectionError::InvalidDistance(result));
        }
        self.distance = result as u32;
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawSection {
    up_station: StationID,
    down_station: StationID,
    distance: u32,
}

impl TryFrom<RawSection> for Section {
    type Error = SectionError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Section::new(raw.up_station, raw.down_station, raw.distance)
    }
}
