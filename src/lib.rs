//! Core library entry point that wires together the ScribeMate add-in subsystems.
//!
//! Each module is intentionally kept lightweight so that the boundaries
//! between responsibilities remain obvious when exploring the codebase:
//! - [`hosts`] adapts the four document-host object models to one selection contract.
//! - [`proxy`] authenticates and forwards requests to the remote AI service.
//! - [`api`] exposes the IPC surface that the task-pane UI invokes.
//! - [`session`] manages the single cached credential for the session.
//! - [`db`] initialises the SQLite workspace database and applies migrations.
//! - [`errors`] keeps the central error catalogue with human friendly metadata.
//! - [`logging`] writes structured diagnostics to the event log table.

pub mod api;
pub mod db;
pub mod errors;
pub mod hosts;
pub mod logging;
pub mod proxy;
pub mod session;
