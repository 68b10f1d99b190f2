use thiserror::Error;

use crate::StationID;

/// Everything that can go wrong while editing the sections of a line. Nothing here is recovered
/// from internally; a failed operation leaves the line exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SectionError {
    /// Both stations of the new section are already on the line.
    #[error("a section between {up:?} and {down:?} already exists on this line")]
    DuplicateSection { up: StationID, down: StationID },
    /// Neither station of the new section is on the line.
    #[error("neither {up:?} nor {down:?} is on this line, so the section would be disconnected")]
    DisconnectedSection { up: StationID, down: StationID },
    /// A split or merge would produce this distance, which isn't a positive u32.
    #[error("section distance must be positive and fit in a u32, but would be {0}")]
    InvalidDistance(i64),
    #[error("a line must keep at least one section")]
    LastSection,
    #[error("{0:?} isn't on this line")]
    StationNotFound(StationID),
    #[error("no section {0}")]
    SectionNotFound(String),
    #[error("a section can't start and end at {0:?}")]
    SameStation(StationID),
    /// A list of sections loaded from elsewhere doesn't form one simple path.
    #[error("sections don't form a single path: {0}")]
    MalformedChain(String),
}
