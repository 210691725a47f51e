//! Board position entities and the payload they are built from.
//!
//! # Responsibility
//! - Define column/row handles carrying identity, order, ownership,
//!   visibility and lazily measured geometry.
//! - Define the anchor boundary used to measure rendered visuals.
//!
//! # Invariants
//! - Every column and row is identified by a stable string id.
//! - Geometry is never used to infer `index` or `column_id`.

pub mod anchor;
pub mod column;
pub mod dragged;
pub mod geometry;
pub mod row;
pub mod source;

/// Stable column identifier.
pub type ColumnId = String;

/// Stable row identifier.
pub type RowId = String;
