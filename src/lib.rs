//! Grade point, CGPA and scholarship arithmetic for UIU students.
//!
//! The engine modules (`grades`, `cgpa`, `projection`, `cohort`, `validate`,
//! `trimester`) are pure functions over plain data. `import`, `db` and
//! `report` are the collaborators the command line front end uses to feed
//! them and show their results.

pub mod cgpa;
pub mod cohort;
pub mod config;
pub mod db;
pub mod error;
pub mod grades;
pub mod import;
pub mod logging;
pub mod models;
pub mod projection;
pub mod report;
pub mod trimester;
pub mod validate;

pub use error::EngineError;
