//! Ready-made voice patches.
//!
//! Any `Fn() -> impl GraphNode` works as a [`VoiceFactory`](crate::synth::factory::VoiceFactory),
//! so these functions can be handed straight to
//! [`Synthesizer::new`](crate::synth::synthesizer::Synthesizer::new).
//!
//! ```
//! use polysynth::{synth::synthesizer::Synthesizer, voices};
//!
//! let synth = Synthesizer::new(&voices::soft);
//! assert_eq!(synth.channels().len(), 16);
//! ```

use crate::graph::{
    amplify::Amplify, envelope::EnvNode, extensions::NodeExt, oscillator::OscNode,
};

/// The patch every channel uses unless told otherwise.
pub type DefaultVoice = Amplify<OscNode, EnvNode>;

/// Square-wave chip voice: fast attack, short release.
///
/// The short release keeps voices cycling back into the pool quickly once
/// keys are let go.
pub fn chip() -> DefaultVoice {
    OscNode::square().amplify(EnvNode::adsr(0.005, 0.1, 0.6, 0.05))
}

/// Triangle voice with a slower attack and longer tail.
pub fn soft() -> DefaultVoice {
    OscNode::triangle().amplify(EnvNode::adsr(0.02, 0.2, 0.7, 0.3))
}
