//! Path geometry and render-cache engine for a 2D vector editor.
//!
//! A [`topology::Primitive`] is a chain of cubic Bezier and arc segments. Edits go
//! through the command objects in [`operations::modification`], queries through
//! [`operations::query`], and [`controller::PrimitiveController`] keeps a GPU-ready
//! vertex cache in step with the chain.

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{Result, VectorCoreError};
