//! Tests for the deep resolver.
//!
//! Organized by functionality:
//! - Direct and inherited mappings
//! - Ordering and duplication
//! - Error propagation

mod mocks;

mod resolver_tests;
