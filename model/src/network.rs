use std::collections::BTreeMap;

use anyhow::Result;

use subway::{orig, CheapID, IDMapping, Line, LineID, Station, StationID};

/// Where lines and stations live between edits. `LineService` only talks to this, so the domain
/// never needs to know how anything is stored.
pub trait Repository {
    fn resolve_station(&self, id: StationID) -> Result<Station>;
    /// Returns a detached copy; changes aren't visible until the line is persisted.
    fn load(&self, id: LineID) -> Result<Line>;
    /// Assigns an ID if the line doesn't have one yet.
    fn persist(&mut self, line: Line) -> Result<LineID>;
    fn remove(&mut self, id: LineID) -> Result<()>;
    fn line_ids(&self) -> Vec<LineID>;
}

/// Keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct Network {
    pub stations: BTreeMap<StationID, Station>,
    pub lines: BTreeMap<LineID, Line>,

    station_ids: IDMapping<orig::StationID, StationID>,
    next_line_id: usize,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(&mut self, orig_id: orig::StationID, name: String) -> Result<StationID> {
        let id = self.station_ids.insert_new(orig_id.clone())?;
        self.stations.insert(id, Station { id, orig_id, name });
        Ok(id)
    }

    pub fn lookup_station(&self, orig_id: &orig::StationID) -> Result<StationID> {
        self.station_ids.lookup(orig_id)
    }

    pub fn line_by_name(&self, name: &str) -> Result<LineID> {
        match self.lines.values().find(|line| line.name == name) {
            Some(line) => line
                .id
                .ok_or_else(|| anyhow!("Stored line {} has no ID", name)),
            None => bail!("No line named {}", name),
        }
    }
}

impl Repository for Network {
    fn resolve_station(&self, id: StationID) -> Result<Station> {
        match self.stations.get(&id) {
            Some(station) => Ok(station.clone()),
            None => bail!("Unknown {:?}", id),
        }
    }

    fn load(&self, id: LineID) -> Result<Line> {
        match self.lines.get(&id) {
            Some(line) => Ok(line.clone()),
            None => bail!("Unknown {:?}", id),
        }
    }

    fn persist(&mut self, mut line: Line) -> Result<LineID> {
        if let Some(station) = line
            .stations()
            .into_iter()
            .find(|station| !self.stations.contains_key(station))
        {
            bail!("{} uses unknown {:?}", line.name, station);
        }
        let id = match line.id {
            Some(id) => {
                if !self.lines.contains_key(&id) {
                    bail!("Can't update {:?}; it was never stored", id);
                }
                id
            }
            None => {
                let id = LineID::new(self.next_line_id);
                self.next_line_id += 1;
                line.id = Some(id);
                id
            }
        };
        self.lines.insert(id, line);
        Ok(id)
    }

    fn remove(&mut self, id: LineID) -> Result<()> {
        if self.lines.remove(&id).is_none() {
            bail!("Unknown {:?}", id);
        }
        Ok(())
    }

    fn line_ids(&self) -> Vec<LineID> {
        self.lines.keys().cloned().collect()
    }
}
