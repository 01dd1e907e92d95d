//! Test helpers module
//!
//! Shared database setup and test data builders for integration tests.
//! Not every test binary uses every helper.
#![allow(dead_code)]

pub mod database_helper;
pub mod test_data;

pub use database_helper::TestDatabase;
