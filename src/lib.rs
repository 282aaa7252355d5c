//! Kanban board synchronisation engine.
//!
//! This crate manages board buckets and the placement of tasks into exactly
//! one bucket per board view, enforcing work-in-progress limits, applying
//! done-bucket semantics (including repeating tasks) and keeping every board
//! of a project in step when a task is completed.
//!
//! # Architecture
//!
//! The engine follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`kanban`]: Buckets, placements, limits and done-state synchronisation
//! - [`config`]: Engine configuration

pub mod config;
pub mod kanban;
