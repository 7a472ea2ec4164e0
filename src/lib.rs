// Library target shared by the binary, the integration tests in tests/ and
// the criterion benchmarks. main.rs only wires the terminal and the CLI.

pub mod app;
pub mod config;
pub mod event;
pub mod exit;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
