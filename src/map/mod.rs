mod geometry;
mod outline;

pub use outline::{national_fallback, regional_fallback, OutlineSheet};
