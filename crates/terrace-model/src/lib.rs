//! # terrace-model
//!
//! Data model for the Terrace partitioned store.
//!
//! This crate defines the representations the store is generic over:
//!
//! - **Values**: runtime values with map-key equality (`Value`)
//! - **Rows**: ordered tuples of values (`Row`)
//! - **Schemas**: named, typed fields (`DataType`, `Field`, `Schema`)
//! - **Batches**: schema-typed groups of rows (`RecordBatch`)
//! - **Expressions**: filter predicates over fields (`Expr`, `BinaryOp`)
//!
//! The store itself never inspects row contents beyond positional access
//! and equality on extracted values; everything type-specific lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Schema-typed row batches
pub mod batch;
/// Filter expressions
pub mod expr;
/// Row representation
pub mod row;
/// Schemas and data types
pub mod schema;
/// Runtime values
pub mod value;

pub use batch::RecordBatch;
pub use expr::{BinaryOp, Expr};
pub use row::Row;
pub use schema::{DataType, Field, Schema};
pub use value::Value;
