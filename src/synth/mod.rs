// Purpose: Voice management, channels, mixing
// This layer sits above graph nodes and owns all realtime engine state

pub mod channel;
pub mod factory;
pub mod message;
pub mod pool;
pub mod synthesizer;
pub mod voice;
