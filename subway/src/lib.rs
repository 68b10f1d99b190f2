//! The topology of a subway line: a chain of sections between stations, kept as one unbranched
//! path while sections are spliced in and stations are removed.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod chain;
mod error;
mod ids;
mod line;
mod section;
mod station;

pub use chain::SectionChain;
pub use error::SectionError;
pub use ids::{orig, CheapID, IDMapping, LineID, StationID};
pub use line::Line;
pub use section::Section;
pub use station::Station;
