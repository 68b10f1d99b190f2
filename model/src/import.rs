use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use subway::{orig, Line};

use crate::{Network, Repository};

/// Reads `stations.csv`, `lines.csv`, and `sections.csv` from a directory. Sections are added to
/// their line in file order, so the file has to describe a valid way of building each line.
pub fn load_dir(dir: &str) -> Result<Network> {
    let mut network = Network::new();
    load_stations(&mut network, fs_err::File::open(format!("{dir}/stations.csv"))?)?;
    let mut lines = load_lines(fs_err::File::open(format!("{dir}/lines.csv"))?)?;
    load_sections(
        &network,
        &mut lines,
        fs_err::File::open(format!("{dir}/sections.csv"))?,
    )?;

    for (name, line) in lines {
        if line.sections().is_empty() {
            warn!("{} has no sections; skipping it", name);
            continue;
        }
        network.persist(line)?;
    }
    info!(
        "Imported {} stations and {} lines from {}",
        network.stations.len(),
        network.lines.len(),
        dir
    );
    Ok(network)
}

pub fn load_stations<R: std::io::Read>(network: &mut Network, reader: R) -> Result<()> {
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: StationRecord = rec?;
        network.add_station(rec.station_id, rec.station_name)?;
    }
    Ok(())
}

/// Keyed by name, in the order they'll get IDs
pub fn load_lines<R: std::io::Read>(reader: R) -> Result<BTreeMap<String, Line>> {
    let mut lines = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: LineRecord = rec?;
        if lines.contains_key(&rec.line_name) {
            bail!("Duplicate line {}", rec.line_name);
        }
        lines.insert(
            rec.line_name.clone(),
            Line::new(rec.line_name, rec.line_color),
        );
    }
    Ok(lines)
}

pub fn load_sections<R: std::io::Read>(
    network: &Network,
    lines: &mut BTreeMap<String, Line>,
    reader: R,
) -> Result<()> {
    for (idx, rec) in csv::Reader::from_reader(reader).deserialize().enumerate() {
        // Row 1 is the header
        let row = idx + 2;
        let rec: SectionRecord = rec.with_context(|| format!("sections.csv row {row}"))?;
        let line = match lines.get_mut(&rec.line_name) {
            Some(x) => x,
            None => bail!("sections.csv row {row} refers to unknown line {}", rec.line_name),
        };
        let up = network
            .lookup_station(&rec.up_station_id)
            .with_context(|| format!("sections.csv row {row}"))?;
        let down = network
            .lookup_station(&rec.down_station_id)
            .with_context(|| format!("sections.csv row {row}"))?;
        line.add_section(up, down, rec.distance)
            .with_context(|| format!("sections.csv row {row}"))?;
    }
    Ok(())
}

#[derive(Deserialize)]
struct StationRecord {
    station_id: orig::StationID,
    station_name: String,
}

#[derive(Deserialize)]
struct LineRecord {
    line_name: String,
    line_color: String,
}

#[derive(Deserialize)]
struct SectionRecord {
    line_name: String,
    up_station_id: orig::StationID,
    down_station_id: orig::StationID,
    distance: u32,
}
