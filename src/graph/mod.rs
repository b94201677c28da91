//! Composable building blocks for voice patches.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! note events, block-based rendering, and an activity flag the voice pool
//! uses to reclaim released slots.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Envelope generator node exposing ADSR state.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.boxed()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// Pitched oscillators with modulation-wheel vibrato.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
