//! mock-a-parser: test-harness glue around a fixed-response parser backend.
//!
//! Pieces:
//! - a one-shot TCP server that reads until a terminator and answers with a
//!   fixed JSON payload ([`server`])
//! - a thin client that frames source text and collects the reply
//!   ([`client`])
//! - a fixture generator producing mixed-content project files
//!   ([`generator`])
//!
//! None of this parses anything. The backend is a test double: one
//! connection, one canned answer, then it is gone.

pub mod client;
pub mod config;
pub mod generator;
pub mod protocol;
pub mod server;
