//! The stream engine
//!
//! [`Stream`] wraps one single-pass producer. Combinators consume the handle
//! and return a new one without doing any work; terminal operations pull
//! from the end of the chain, forcing evaluation upstream.

pub mod aggregate;
pub mod constructors;
pub mod core;
pub mod parallel;
pub mod transform;

pub use self::core::{RS2Stream, Stream};
