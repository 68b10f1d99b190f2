use serde::{Deserialize, Serialize};

use crate::{LineID, Section, SectionChain, SectionError, StationID};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Line {
    /// Assigned the first time the line is stored
    pub id: Option<LineID>,
    pub name: String,
    pub color: String,

    sections: SectionChain,
}

impl Line {
    pub fn new(name: String, color: String) -> Self {
        Self {
            id: None,
            name,
            color,
            sections: SectionChain::new(),
        }
    }

    pub fn update(&mut self, name: String, color: String) {
        self.name = name;
        self.color = color;
    }

    pub fn sections(&self) -> &SectionChain {
        &self.sections
    }

    pub fn add_section(
        &mut self,
        up_station: StationID,
        down_station: StationID,
        distance: u32,
    ) -> Result<(), SectionError> {
        let section = Section::new(up_station, down_station, distance)?;
        self.sections.add(section)
    }

    pub fn delete_section(&mut self, station: StationID) -> Result<Section, SectionError> {
        self.sections.delete(station)
    }

    pub fn find_section_by_up_station(&self, station: StationID) -> Result<&Section, SectionError> {
        self.sections
            .find_by_up_station(station)
            .ok_or_else(|| SectionError::SectionNotFound(format!("leaving {:?}", station)))
    }

    pub fn find_section_by_down_station(
        &self,
        station: StationID,
    ) -> Result<&Section, SectionError> {
        self.sections
            .find_by_down_station(station)
            .ok_or_else(|| SectionError::SectionNotFound(format!("arriving at {:?}", station)))
    }

    pub fn find_section_by_stations(
        &self,
        up_station: StationID,
        down_station: StationID,
    ) -> Result<&Section, SectionError> {
        self.sections
            .find_by_stations(up_station, down_station)
            .ok_or_else(|| {
                SectionError::SectionNotFound(format!("from {:?} to {:?}", up_station, down_station))
            })
    }

    pub fn stations(&self) -> Vec<StationID> {
        self.sections.stations()
    }

    pub fn total_distance(&self) -> u64 {
        self.sections.total_distance()
    }

    pub fn describe(&self) -> String {
        match self.id {
            Some(id) => format!("{} ({:?}, {})", self.name, id, self.color),
            None => format!("{} ({})", self.name, self.color),
        }
    }
}
