//! Mapping model types.
//!
//! This module contains:
//! - `Id`, the fixed-width hex identifier shared by users, orgs and resources
//! - `UserType` and `ResourceType`
//! - `UserResourceMapping`, the stored record

mod types;
#[cfg(test)]
mod types_proptest;

pub use types::*;
