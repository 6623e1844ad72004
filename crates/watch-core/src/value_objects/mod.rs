//! Value objects - immutable types that represent domain concepts

mod color_scale;
mod identity;

pub use color_scale::{ColorBand, ColorScale};
pub use identity::{Namespace, PageId, PageIdentity, UserId};
