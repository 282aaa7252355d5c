//! Unit tests for the kanban module.
//!
//! Tests are organised by component: domain values, recurrence arithmetic,
//! the individual board services and the `PostgreSQL` row conversions.

mod support;
