//! In-memory adapters used by tests and embedders.

mod scheduler;
mod store;

pub use scheduler::InMemoryScheduler;
pub use store::InMemoryTabularStore;
