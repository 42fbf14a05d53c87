//! Codec module - Document streams and annotation maps.
//!
//! Splits and joins `---` separated streams, reads the identity header of a
//! document, and maps cache entries to annotation keys.

mod annotations;
mod documents;

pub use annotations::*;
pub use documents::*;
