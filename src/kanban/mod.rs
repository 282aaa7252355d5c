//! Kanban board synchronisation.
//!
//! Buckets (board columns), the placement of each task in one bucket per
//! board view, work-in-progress limits, done-bucket semantics and their
//! propagation across the boards of a project. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
