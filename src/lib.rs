//! Taskboard: a team task table with automatic completion stamps and
//! monthly archiving.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the workbook and the scheduler
//! - **Adapters**: Concrete implementations of ports (in-memory, JSON file,
//!   Tokio timer)
//!
//! # Modules
//!
//! - [`config`]: Board configuration passed into every service
//! - [`task`]: Completion stamping, archive sweeps and dashboard counts
//! - [`telemetry`]: Tracing subscriber installation for binaries

pub mod config;
pub mod task;
pub mod telemetry;
