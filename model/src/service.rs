use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use subway::{Line, LineID, StationID};

use crate::Repository;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationID,
    pub down_station_id: StationID,
    pub distance: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionRequest {
    pub up_station_id: StationID,
    pub down_station_id: StationID,
    pub distance: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineResponse {
    pub id: LineID,
    pub name: String,
    pub color: String,
    /// From the start of the line to the end
    pub stations: Vec<StationResponse>,
    pub distance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationResponse {
    pub id: StationID,
    pub name: String,
}

/// Each method is one transaction: load the line, change it, and persist it only if everything
/// succeeded. A failed edit leaves the stored line untouched.
pub struct LineService<R> {
    repo: R,
}

impl<R: Repository> LineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn create_line(&mut self, req: LineRequest) -> Result<LineResponse> {
        let up = self.repo.resolve_station(req.up_station_id)?;
        let down = self.repo.resolve_station(req.down_station_id)?;

        let mut line = Line::new(req.name, req.color);
        line.add_section(up.id, down.id, req.distance)
            .with_context(|| format!("Creating {}", line.name))?;
        let id = self.repo.persist(line)?;
        info!(
            "Created {:?} from {} to {}",
            id,
            up.describe(),
            down.describe()
        );
        self.show_line(id)
    }

    pub fn show_line(&self, id: LineID) -> Result<LineResponse> {
        let line = self.repo.load(id)?;
        self.describe(&line)
    }

    pub fn show_lines(&self) -> Result<Vec<LineResponse>> {
        let mut result = Vec::new();
        for id in self.repo.line_ids() {
            result.push(self.show_line(id)?);
        }
        Ok(result)
    }

    pub fn update_line(&mut self, id: LineID, name: String, color: String) -> Result<()> {
        let mut line = self.repo.load(id)?;
        line.update(name, color);
        self.repo.persist(line)?;
        Ok(())
    }

    pub fn delete_line(&mut self, id: LineID) -> Result<()> {
        self.repo.remove(id)?;
        info!("Deleted {:?}", id);
        Ok(())
    }

    pub fn add_section(&mut self, id: LineID, req: SectionRequest) -> Result<LineResponse> {
        let up = self.repo.resolve_station(req.up_station_id)?;
        let down = self.repo.resolve_station(req.down_station_id)?;

        let mut line = self.repo.load(id)?;
        line.add_section(up.id, down.id, req.distance)
            .with_context(|| {
                format!(
                    "Adding {} -> {} to {}",
                    up.describe(),
                    down.describe(),
                    line.describe()
                )
            })?;
        self.repo.persist(line)?;
        info!(
            "Added {} -> {} to {:?}",
            up.describe(),
            down.describe(),
            id
        );
        self.show_line(id)
    }

    pub fn delete_section(&mut self, id: LineID, station_id: StationID) -> Result<()> {
        let station = self.repo.resolve_station(station_id)?;

        let mut line = self.repo.load(id)?;
        line.delete_section(station.id)
            .with_context(|| format!("Removing {} from {}", station.describe(), line.describe()))?;
        self.repo.persist(line)?;
        info!("Removed {} from {:?}", station.describe(), id);
        Ok(())
    }

    fn describe(&self, line: &Line) -> Result<LineResponse> {
        let id = match line.id {
            Some(id) => id,
            None => bail!("{} was never stored", line.name),
        };
        let mut stations = Vec::new();
        for station_id in line.stations() {
            let station = self.repo.resolve_station(station_id)?;
            stations.push(StationResponse {
                id: station.id,
                name: station.name,
            });
        }
        Ok(LineResponse {
            id,
            name: line.name.clone(),
            color: line.color.clone(),
            stations,
            distance: line.total_distance(),
        })
    }
}

#[cfg(test)]
mod tests {
    use subway::{orig, CheapID, SectionError};

    use super::*;
    use crate::Network;

    struct Fixture {
        service: LineService<Network>,
        gangnam: StationID,
        yeoksam: StationID,
        seolleung: StationID,
        samseong: StationID,
    }

    fn fixture() -> Fixture {
        let mut network = Network::new();
        let mut add = |id: &str, name: &str| {
            network
                .add_station(orig::StationID(id.to_string()), name.to_string())
                .unwrap()
        };
        let gangnam = add("gangnam", "Gangnam");
        let yeoksam = add("yeoksam", "Yeoksam");
        let seolleung = add("seolleung", "Seolleung");
        let samseong = add("samseong", "Samseong");
        Fixture {
            service: LineService::new(network),
            gangnam,
            yeoksam,
            seolleung,
            samseong,
        }
    }

    fn names(resp: &LineResponse) -> Vec<&str> {
        resp.stations.iter().map(|s| s.name.as_str()).collect()
    }

    fn create_line_2(f: &mut Fixture) -> LineID {
        f.service
            .create_line(LineRequest {
                name: "Line 2".to_string(),
                color: "green".to_string(),
                up_station_id: f.gangnam,
                down_station_id: f.seolleung,
                distance: 10,
            })
            .unwrap()
            .id
    }

    #[test]
    fn create_and_show() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        let resp = f.service.show_line(id).unwrap();
        assert_eq!(resp.name, "Line 2");
        assert_eq!(names(&resp), vec!["Gangnam", "Seolleung"]);
        assert_eq!(resp.distance, 10);
        assert_eq!(f.service.show_lines().unwrap(), vec![resp]);
    }

    #[test]
    fn create_with_a_bad_section_stores_nothing() {
        let mut f = fixture();
        let err = f
            .service
            .create_line(LineRequest {
                name: "Line 2".to_string(),
                color: "green".to_string(),
                up_station_id: f.gangnam,
                down_station_id: f.gangnam,
                distance: 10,
            })
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SectionError>(),
            Some(&SectionError::SameStation(f.gangnam))
        );
        assert!(f.service.show_lines().unwrap().is_empty());
    }

    #[test]
    fn add_sections() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        let resp = f
            .service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.seolleung,
                    down_station_id: f.samseong,
                    distance: 5,
                },
            )
            .unwrap();
        assert_eq!(names(&resp), vec!["Gangnam", "Seolleung", "Samseong"]);

        let resp = f
            .service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.gangnam,
                    down_station_id: f.yeoksam,
                    distance: 4,
                },
            )
            .unwrap();
        assert_eq!(
            names(&resp),
            vec!["Gangnam", "Yeoksam", "Seolleung", "Samseong"]
        );
        assert_eq!(resp.distance, 15);
    }

    #[test]
    fn failed_add_leaves_the_stored_line_alone() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        let before = f.service.show_line(id).unwrap();

        let err = f
            .service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.gangnam,
                    down_station_id: f.yeoksam,
                    distance: 10,
                },
            )
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<SectionError>(),
            Some(&SectionError::InvalidDistance(0))
        );

        let err = f
            .service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.yeoksam,
                    down_station_id: f.samseong,
                    distance: 3,
                },
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SectionError>(),
            Some(SectionError::DisconnectedSection { .. })
        ));

        assert_eq!(f.service.show_line(id).unwrap(), before);
    }

    #[test]
    fn add_with_unknown_station() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        let before = f.service.show_line(id).unwrap();
        assert!(f
            .service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.seolleung,
                    down_station_id: StationID::new(99),
                    distance: 3,
                },
            )
            .is_err());
        assert!(f.service.delete_section(id, StationID::new(99)).is_err());
        assert_eq!(f.service.show_line(id).unwrap(), before);
    }

    #[test]
    fn delete_sections() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        f.service
            .add_section(
                id,
                SectionRequest {
                    up_station_id: f.gangnam,
                    down_station_id: f.yeoksam,
                    distance: 4,
                },
            )
            .unwrap();

        f.service.delete_section(id, f.yeoksam).unwrap();
        let resp = f.service.show_line(id).unwrap();
        assert_eq!(names(&resp), vec!["Gangnam", "Seolleung"]);
        assert_eq!(resp.distance, 10);

        let err = f.service.delete_section(id, f.gangnam).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SectionError>(),
            Some(&SectionError::LastSection)
        );
    }

    #[test]
    fn update_and_delete_line() {
        let mut f = fixture();
        let id = create_line_2(&mut f);
        f.service
            .update_line(id, "Line 2".to_string(), "dark green".to_string())
            .unwrap();
        assert_eq!(f.service.show_line(id).unwrap().color, "dark green");

        f.service.delete_line(id).unwrap();
        assert!(f.service.show_line(id).is_err());
        assert!(f.service.delete_line(id).is_err());
    }
}
