//! Small cli for tracking what you did throughout the day in 15 minute intervals.
//! Every interval gets a hierarchical label like `work: code: project A`, days are stored as plain
//! json files and can later be aggregated into a breakdown of where the time went.
//!

pub mod cli;
pub mod config;
pub mod fs;
pub mod storage;
pub mod utils;
