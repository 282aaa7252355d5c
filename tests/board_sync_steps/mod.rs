//! Step definitions for kanban board synchronisation scenarios.

pub mod then;
pub mod world;
