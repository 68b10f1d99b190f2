#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::Result;
use structopt::StructOpt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use model::{LineRequest, LineResponse, LineService, Network, Repository, SectionRequest};
use subway::{orig, StationID};

#[derive(StructOpt)]
#[structopt(name = "subway", about = "Inspect and edit the stations along subway lines")]
struct Args {
    /// A directory with stations.csv, lines.csv, and sections.csv
    #[structopt(long)]
    network: String,
    /// Print results as JSON
    #[structopt(long)]
    json: bool,
    /// Log more; repeat for even more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Show every line
    Lines,
    /// Show the stations along one line, in order
    Show {
        #[structopt(long)]
        line: String,
    },
    /// Create a new line with one section, then show it
    CreateLine {
        #[structopt(long)]
        name: String,
        #[structopt(long)]
        color: String,
        /// The original ID of the first station
        #[structopt(long)]
        up: String,
        /// The original ID of the second station
        #[structopt(long)]
        down: String,
        #[structopt(long)]
        distance: u32,
    },
    /// Splice a section into a line, then show it
    AddSection {
        #[structopt(long)]
        line: String,
        #[structopt(long)]
        up: String,
        #[structopt(long)]
        down: String,
        #[structopt(long)]
        distance: u32,
    },
    /// Remove a station from a line, then show it
    DeleteSection {
        #[structopt(long)]
        line: String,
        #[structopt(long)]
        station: String,
    },
    /// Check every line still forms a single path
    Validate,
}

impl Args {
    // Nothing is written back to the network directory; edits only affect what's printed.
    fn run(self) -> Result<()> {
        let network = model::import::load_dir(&self.network)?;
        let mut service = LineService::new(network);

        let results = match self.cmd {
            Command::Lines => service.show_lines()?,
            Command::Show { line } => {
                let id = service.repository().line_by_name(&line)?;
                vec![service.show_line(id)?]
            }
            Command::CreateLine {
                name,
                color,
                up,
                down,
                distance,
            } => {
                let up_station_id = station(service.repository(), up)?;
                let down_station_id = station(service.repository(), down)?;
                vec![service.create_line(LineRequest {
                    name,
                    color,
                    up_station_id,
                    down_station_id,
                    distance,
                })?]
            }
            Command::AddSection {
                line,
                up,
                down,
                distance,
            } => {
                let id = service.repository().line_by_name(&line)?;
                let up_station_id = station(service.repository(), up)?;
                let down_station_id = station(service.repository(), down)?;
                vec![service.add_section(
                    id,
                    SectionRequest {
                        up_station_id,
                        down_station_id,
                        distance,
                    },
                )?]
            }
            Command::DeleteSection { line, station: orig_id } => {
                let id = service.repository().line_by_name(&line)?;
                let station_id = station(service.repository(), orig_id)?;
                service.delete_section(id, station_id)?;
                vec![service.show_line(id)?]
            }
            Command::Validate => {
                let network = service.repository();
                for id in network.line_ids() {
                    let line = network.load(id)?;
                    if let Err(err) = line.sections().validate() {
                        bail!("{} is broken: {}", line.describe(), err);
                    }
                    info!("{} is fine", line.describe());
                }
                println!("All {} lines are valid", network.lines.len());
                return Ok(());
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for line in &results {
                print!("{}", describe(line));
            }
        }
        Ok(())
    }
}

fn station(network: &Network, orig_id: String) -> Result<StationID> {
    network.lookup_station(&orig::StationID(orig_id))
}

fn describe(line: &LineResponse) -> String {
    let mut out = format!(
        "{} ({}), {} stations, total distance {}\n",
        line.name,
        line.color,
        line.stations.len(),
        line.distance
    );
    for station in &line.stations {
        out.push_str(&format!("  - {}\n", station.name));
    }
    out
}

/// `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    // stdout is reserved for results, so --json output stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let args = Args::from_args();
    setup_logging(args.verbose);
    args.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_flags_mean_more_logs() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert_eq!(default_filter(2), "debug");
        assert_eq!(default_filter(7), "trace");
    }

    #[test]
    fn verbosity_is_counted() {
        let args = Args::from_iter(["subway", "--network", "data/seoul", "-vv", "lines"]);
        assert_eq!(args.verbose, 2);
        assert!(!args.json);
    }
}
