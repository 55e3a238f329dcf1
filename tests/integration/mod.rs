//! Integration tests for harness runs
//!
//! Each test builds a fixture root in a temporary directory and runs the
//! harness over it

mod orchestrator;
mod record;
