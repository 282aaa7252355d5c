//! Adapter implementations for kanban ports.

pub mod memory;
pub mod postgres;
