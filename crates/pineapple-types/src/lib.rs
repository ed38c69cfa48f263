//! Foundation types and traits for Perfect Pineapple Player.
//!
//! This crate contains the platform-agnostic types shared by every other
//! crate in the workspace: colors, input events, backend trait definitions,
//! the frame clock, and error types.

pub mod backend;
pub mod clock;
pub mod error;
pub mod input;
