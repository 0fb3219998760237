//! Animated star-field background.
//!
//! [`Background`] owns the star population, the shooting-star spawner and the
//! frame loop. It renders through the [`Canvas`] trait and learns about its
//! environment through the [`Host`] trait, so it runs the same against the
//! terminal and against test doubles.

pub mod canvas;
pub mod host;
pub mod raster;
pub mod resolve;
pub mod scheduler;
pub mod shooting;
pub mod stars;

#[cfg(test)]
pub mod testing;

pub use host::{Host, TerminalHost, Viewport};
pub use raster::PixelCanvas;
pub use scheduler::{Background, FrameStats};
