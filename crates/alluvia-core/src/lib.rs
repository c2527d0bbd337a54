//! Alluvia Core Types and Definitions
//!
//! This crate provides the renderer-agnostic building blocks of Alluvia
//! flow diagrams:
//!
//! - **Identifiers**: String-interned names for categories, nodes and lines ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Unit-space geometric types ([`geometry`] module)
//! - **Paths**: Straight and curved path segments and sampled flow paths ([`path`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod path;
