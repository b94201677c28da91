use crate::graph::node::GraphNode;

/// Factory for creating voices with a specific patch/sound design
///
/// Every pool slot of every channel gets its own patch from the same factory,
/// once, at synthesizer construction.
pub trait VoiceFactory {
    type Voice: GraphNode;

    fn create_voice(&self) -> Self::Voice;
}

impl<F, T> VoiceFactory for F
where
    F: Fn() -> T,
    T: GraphNode,
{
    type Voice = T;

    fn create_voice(&self) -> Self::Voice {
        self()
    }
}
