//! Conversational interview engine.
//!
//! An interview walks a candidate through general questions, an occupation
//! branch, a job-role branch, job type and mode selections, and a resume
//! upload, then records the completed interview. The crate keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (session model, choice tables,
//!   the transition function). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (config, question catalogue,
//!   results store, upload storage).
//!
//! [`engine`] wires the two together: it owns the collaborators, applies each
//! transition all-or-nothing and carries out the persistence it requests.

pub mod core;
pub mod engine;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
