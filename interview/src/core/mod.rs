//! Deterministic, pure logic shared by the interview engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and reach collaborators only through the traits in
//! [`ports`], so every transition is reproducible in tests.

pub mod choice;
pub mod clock;
pub mod error;
pub mod invariants;
pub mod ports;
pub mod session;
pub mod tone;
pub mod transition;
pub mod types;
