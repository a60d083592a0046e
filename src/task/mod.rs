//! Task lifecycle and archiving for a shared team task table.
//!
//! Checking a task's done box stamps its completion time, unchecking clears
//! it, and a weekly sweep moves tasks completed more than a grace period ago
//! into per-month archive sheets. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
