//! Integration test suite for the roster engine.
//!
//! 1. Roster ordering and edit flows through the store
//! 2. Persistence and restart recovery
//! 3. Concurrent mutation through one store

pub mod concurrency_tests;
pub mod persistence_tests;
pub mod roster_tests;
