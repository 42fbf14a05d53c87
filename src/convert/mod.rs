//! Convert module - The conversion engine.
//!
//! A [`Converter`] materializes Kinds from bytes, walks them up and down the
//! version graph of its [`Registry`](crate::registry::Registry), and keeps
//! the round-trip cache that makes lossy hops reversible.

mod cache;
mod converter;
mod traverse;


pub use converter::*;
