//! Kind module - Versioned configuration types and the contracts they implement.
//!
//! A Kind is split into narrow capabilities: [`Identity`], [`Convertible`]
//! (and optionally [`Spoke`]), [`Defaultable`] and [`Validatable`]. The
//! object-safe [`KindObject`] layer is derived from serde and `Default`.

mod meta;
mod spec;
mod traits;

pub use meta::*;
pub use spec::*;
pub use traits::*;
