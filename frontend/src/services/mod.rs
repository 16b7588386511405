//! Backend services.
//!
//! - [`report`] - Report, interaction and entity requests to the backend

pub mod report;

pub use report::*;
