//! Mock provider implementations for testing.
//!
//! These stand in for real backends in orchestrator tests: a scripted
//! provider that returns fixed text, a failing provider, an empty-content
//! provider, and a slow provider for timeout tests. The first three count
//! their calls so tests can assert on cascade behavior.

mod scripted;

pub use scripted::{EmptyProvider, FailingProvider, ScriptedProvider, SlowProvider};
