//! Everything around a line that the topology itself doesn't care about: where lines and stations
//! are kept, the service layer that edits them one transaction at a time, and importing a network
//! from CSV files.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod import;
mod network;
mod service;

pub use self::network::{Network, Repository};
pub use self::service::{LineRequest, LineResponse, LineService, SectionRequest, StationResponse};
