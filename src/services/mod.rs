//! Services module
//!
//! Business logic services that coordinate between the shell and the
//! repository.

pub mod photos;
pub mod records;
pub mod stats;

pub use photos::PhotosService;
pub use records::RecordsService;
pub use stats::StatsService;
