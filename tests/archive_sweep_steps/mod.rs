//! Step definitions for task archiving behaviour scenarios.

pub mod world;
