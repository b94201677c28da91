//! Host audio output through cpal.
//!
//! [`AudioSession`] holds a synthesizer until the session is brought up, then
//! moves it into the device callback. It implements [`SessionHook`], so a
//! [`MidiDispatcher`](crate::io::dispatch::MidiDispatcher) can start audio
//! lazily on the first incoming MIDI message.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{
    config::SynthConfig, graph::node::GraphNode, io::dispatch::SessionHook,
    synth::synthesizer::Synthesizer, Error, Result,
};

pub struct AudioSession<T: GraphNode + 'static> {
    synth: Option<Synthesizer<T>>,
    config: SynthConfig,
    stream: Option<cpal::Stream>,
    sample_rate: Option<u32>,
}

impl<T: GraphNode + 'static> AudioSession<T> {
    /// Nothing touches the audio device until [`start`](Self::start).
    pub fn new(synth: Synthesizer<T>, config: SynthConfig) -> Self {
        Self {
            synth: Some(synth),
            config,
            stream: None,
            sample_rate: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Sample rate of the running stream.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Open the default output device and start rendering.
    pub fn start(&mut self) -> Result<()> {
        if self.synth.is_none() {
            return Err(Error::AlreadyStarted);
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(Error::NoOutputDevice)?;
        let supported = device.default_output_config()?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let mut stream_config = supported.config();
        if let Some(frames) = self.config.block_size {
            match supported.buffer_size() {
                cpal::SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&frames) => {
                    stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
                }
                _ => log::warn!("device does not accept {frames} frame buffers, using its default"),
            }
        }

        let sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;

        log::info!("initializing audio output");
        log::info!("  Sampling rate : {sample_rate} Hz");
        log::info!("  Buffer size   : {:?}", stream_config.buffer_size);
        log::info!("  Channels      : {channels}");

        let mut synth = self.synth.take().ok_or(Error::AlreadyStarted)?;
        let rate = sample_rate as f32;

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                synth.render_interleaved(data, channels, rate);
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        self.stream = Some(stream);
        self.sample_rate = Some(sample_rate);
        Ok(())
    }
}

impl<T: GraphNode + 'static> SessionHook for AudioSession<T> {
    fn bring_up(&mut self) {
        if let Err(err) = self.start() {
            log::error!("audio session failed to start: {err}");
        }
    }
}
