use std::collections::BTreeMap;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::{Section, SectionError, StationID};

/// All of the sections belonging to one line. Once there's at least one section, they always form
/// exactly one simple path: no branches, no cycles, one start and one end.
///
/// Sections are stored in the order they were added. The order along the line is derived by
/// following the links from the start, so callers shouldn't rely on storage order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionChain {
    sections: Vec<Section>,
}

impl SectionChain {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Rebuilds a chain from a previously saved list of sections, checking that they still form
    /// one path.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, SectionError> {
        let chain = Self { sections };
        chain.validate()?;
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// In storage order
    pub fn get(&self, idx: usize) -> Option<&Section> {
        self.sections.get(idx)
    }

    /// In storage order
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn contains_station(&self, station: StationID) -> bool {
        self.sections.iter().any(|s| s.has_station(station))
    }

    pub fn find_by_up_station(&self, station: StationID) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_up(station))
    }

    pub fn find_by_down_station(&self, station: StationID) -> Option<&Section> {
        self.sections.iter().find(|s| s.is_down(station))
    }

    pub fn find_by_stations(&self, up: StationID, down: StationID) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.is_up(up) && s.is_down(down))
    }

    /// Splices a new section into the line. If the section shares its start or end with an
    /// existing section, that section is shortened to make room; otherwise the section extends
    /// one end of the line.
    pub fn add(&mut self, section: Section) -> Result<(), SectionError> {
        if self.sections.is_empty() {
            debug!("Starting a line with {:?}", section);
            self.sections.push(section);
            return Ok(());
        }

        let up = section.up_station();
        let down = section.down_station();
        let has_up = self.contains_station(up);
        let has_down = self.contains_station(down);
        // Both stations already being present covers the exact duplicate, the reversed section,
        // and shortcuts across several sections. All of them would break the single path.
        if has_up && has_down {
            return Err(SectionError::DuplicateSection { up, down });
        }
        if !has_up && !has_down {
            return Err(SectionError::DisconnectedSection { up, down });
        }

        // Only one endpoint is on the line, so at most one existing section gets split
        let shrink = -i64::from(section.distance());
        if has_up {
            if let Some(idx) = self.position_by_up(up) {
                let existing = &mut self.sections[idx];
                existing.adjust_distance(shrink)?;
                existing.move_up_station_to(down);
                debug!("Split from the front, leaving {:?}", existing);
            }
        } else if let Some(idx) = self.position_by_down(down) {
            let existing = &mut self.sections[idx];
            existing.adjust_distance(shrink)?;
            existing.move_down_station_to(up);
            debug!("Split from the back, leaving {:?}", existing);
        }

        debug!("Added {:?}", section);
        self.sections.push(section);
        self.debug_check();
        Ok(())
    }

    /// Removes a station from the line, returning the section that no longer exists. At either
    /// end of the line, the one section touching the station is dropped. In the middle, the
    /// section arriving at the station absorbs the one leaving it.
    pub fn delete(&mut self, station: StationID) -> Result<Section, SectionError> {
        if self.sections.len() == 1 {
            return Err(SectionError::LastSection);
        }

        let removed = match (self.position_by_up(station), self.position_by_down(station)) {
            (None, None) => {
                return Err(SectionError::StationNotFound(station));
            }
            // The start or the end of the line
            (Some(idx), None) | (None, Some(idx)) => self.sections.remove(idx),
            (Some(outgoing), Some(incoming)) => {
                let absorbed_distance = i64::from(self.sections[outgoing].distance());
                let new_down = self.sections[outgoing].down_station();
                let merged = &mut self.sections[incoming];
                merged.adjust_distance(absorbed_distance)?;
                merged.move_down_station_to(new_down);
                debug!("Merged across {:?}, leaving {:?}", station, merged);
                self.sections.remove(outgoing)
            }
        };

        debug!("Removed {:?}", removed);
        self.debug_check();
        Ok(removed)
    }

    /// The one station that no section arrives at
    pub fn start_station(&self) -> Option<StationID> {
        self.sections
            .iter()
            .map(|s| s.up_station())
            .find(|station| self.position_by_down(*station).is_none())
    }

    /// The one station that no section leaves from
    pub fn end_station(&self) -> Option<StationID> {
        self.sections
            .iter()
            .map(|s| s.down_station())
            .find(|station| self.position_by_up(*station).is_none())
    }

    /// Every station along the line, from start to end
    pub fn stations(&self) -> Vec<StationID> {
        let successors: BTreeMap<StationID, StationID> = self
            .sections
            .iter()
            .map(|s| (s.up_station(), s.down_station()))
            .collect();

        let mut current = match self.start_station() {
            Some(x) => x,
            None => return Vec::new(),
        };
        let mut result = vec![current];
        while let Some(next) = successors.get(&current) {
            result.push(*next);
            current = *next;
        }
        result
    }

    /// Every section along the line, from start to end
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let by_up: BTreeMap<StationID, &Section> = self
            .sections
            .iter()
            .map(|s| (s.up_station(), s))
            .collect();

        let mut result = Vec::new();
        let mut current = self.start_station();
        while let Some(section) = current.and_then(|station| by_up.get(&station)) {
            result.push(*section);
            current = Some(section.down_station());
        }
        result
    }

    pub fn total_distance(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.distance())).sum()
    }

    /// Checks the whole set of sections forms a single simple path. An empty chain is fine.
    pub fn validate(&self) -> Result<(), SectionError> {
        if self.sections.is_empty() {
            return Ok(());
        }

        let mut graph: DiGraphMap<StationID, u32> = DiGraphMap::new();
        for section in &self.sections {
            let (up, down) = (section.up_station(), section.down_station());
            if graph.add_edge(up, down, section.distance()).is_some() {
                return Err(SectionError::MalformedChain(format!(
                    "{:?} -> {:?} appears twice",
                    up, down
                )));
            }
        }

        let mut starts = 0;
        for station in graph.nodes() {
            if graph
                .neighbors_directed(station, Direction::Incoming)
                .count()
                > 1
            {
                return Err(SectionError::MalformedChain(format!(
                    "several sections arrive at {:?}",
                    station
                )));
            }
            if graph
                .neighbors_directed(station, Direction::Outgoing)
                .count()
                > 1
            {
                return Err(SectionError::MalformedChain(format!(
                    "several sections leave from {:?}",
                    station
                )));
            }
            if graph
                .neighbors_directed(station, Direction::Incoming)
                .next()
                .is_none()
            {
                starts += 1;
            }
        }
        if petgraph::algo::is_cyclic_directed(&graph) {
            return Err(SectionError::MalformedChain("there's a cycle".to_string()));
        }
        // With no branches and no cycles, every start begins a separate path
        if starts != 1 {
            return Err(SectionError::MalformedChain(format!(
                "{} separate pieces",
                starts
            )));
        }
        Ok(())
    }

    fn position_by_up(&self, station: StationID) -> Option<usize> {
        self.sections.iter().position(|s| s.is_up(station))
    }

    fn position_by_down(&self, station: StationID) -> Option<usize> {
        self.sections.iter().position(|s| s.is_down(station))
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.validate(), Ok(()), "Editing sections broke the line");
    }
}

impl TryFrom<Vec<Section>> for SectionChain {
    type Error = SectionError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::from_sections(sections)
    }
}

impl From<SectionChain> for Vec<Section> {
    fn from(chain: SectionChain) -> Self {
        chain.sections
    }
}
