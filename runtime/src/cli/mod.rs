//! CLI layer for the `census` binary.

pub mod census_cmd;
pub mod output;
pub mod report;
