//! Test fixtures for Vigil development.
//!
//! Ready-made attribute bags and record builders shared by the test
//! suites of the other crates.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{cell_bag, climate_bag, trajectory_bag, RecordBuilder};
