use crate::{Position, VocoderSettings, audio};
use arc_swap::ArcSwap;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam::channel::{Receiver, Sender};
use ringbuf::{
    HeapCons, HeapProd, HeapRb,
    traits::{Consumer, Producer, Split},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const PAD_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("failed to query the output configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

#[derive(Debug, Clone)]
pub enum EngineCommand {
    Touch(Position),
    Release,
    UpdateSettings(VocoderSettings),
    Play,
    Stop,
}

#[derive(Debug, Clone)]
pub enum EngineUpdate {
    PlaybackState { playing: bool },
    Location { position: Option<Position> },
    Error { message: String },
}

/// Pad gestures forwarded to the audio callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    Move(Position),
    Release,
}

pub struct EngineHandle {
    pub command_tx: Sender<EngineCommand>,
    pub update_rx: Receiver<EngineUpdate>,
}

pub fn spawn_engine(settings: VocoderSettings) -> EngineHandle {
    let (command_tx, command_rx) = crossbeam::channel::unbounded();
    let (update_tx, update_rx) = crossbeam::channel::unbounded();

    std::thread::spawn(move || {
        engine_thread(settings, command_rx, update_tx);
    });

    EngineHandle {
        command_tx,
        update_rx,
    }
}

struct EngineState {
    settings: Arc<ArcSwap<VocoderSettings>>,
    pad_events: Option<HeapProd<PadEvent>>,
    audio_stream: Option<cpal::Stream>,
    touching: bool,
    /// Position the vocoder should be sounding at, kept while stopped so
    /// the next stream starts where the pad is.
    held: Option<Position>,
}

impl EngineState {
    fn new(settings: VocoderSettings) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            pad_events: None,
            audio_stream: None,
            touching: false,
            held: None,
        }
    }

    fn send_pad_event(&mut self, event: PadEvent) {
        if let Some(producer) = self.pad_events.as_mut() {
            if producer.try_push(event).is_err() {
                warn!(?event, "pad event queue full, dropping event");
            }
        }
    }

    fn handle(&mut self, command: EngineCommand, update_tx: &Sender<EngineUpdate>) {
        match command {
            EngineCommand::Touch(position) => {
                self.touching = true;
                self.held = Some(position);
                self.send_pad_event(PadEvent::Move(position));
                let _ = update_tx.send(EngineUpdate::Location {
                    position: Some(position),
                });
            }
            EngineCommand::Release => {
                self.touching = false;
                self.send_pad_event(PadEvent::Release);
                if !self.settings.load().sustain {
                    self.held = None;
                    let _ = update_tx.send(EngineUpdate::Location { position: None });
                }
            }
            EngineCommand::UpdateSettings(settings) => match settings.validate() {
                Ok(()) => {
                    let released_with_sustain = !self.touching && self.settings.load().sustain;
                    let sustain = settings.sustain;
                    self.settings.store(Arc::new(settings));
                    info!("settings updated");
                    // Turning hold off while a sustained note rings lets it go.
                    if released_with_sustain && !sustain {
                        self.held = None;
                        self.send_pad_event(PadEvent::Release);
                        let _ = update_tx.send(EngineUpdate::Location { position: None });
                    }
                }
                Err(e) => {
                    warn!(error = %e, "rejected settings update");
                    let _ = update_tx.send(EngineUpdate::Error {
                        message: format!("Rejected settings: {}", e),
                    });
                }
            },
            EngineCommand::Play => {
                if self.audio_stream.is_some() {
                    let _ = update_tx.send(EngineUpdate::PlaybackState { playing: true });
                    return;
                }
                match setup_audio(self.settings.clone(), self.held) {
                    Ok((stream, producer)) => {
                        self.audio_stream = Some(stream);
                        self.pad_events = Some(producer);
                        let _ = update_tx.send(EngineUpdate::PlaybackState { playing: true });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to start audio");
                        let _ = update_tx.send(EngineUpdate::Error {
                            message: format!("Failed to start audio: {}", e),
                        });
                    }
                }
            }
            EngineCommand::Stop => {
                self.audio_stream = None;
                self.pad_events = None;
                let _ = update_tx.send(EngineUpdate::PlaybackState { playing: false });
            }
        }
    }
}

fn engine_thread(
    settings: VocoderSettings,
    command_rx: Receiver<EngineCommand>,
    update_tx: Sender<EngineUpdate>,
) {
    let mut state = EngineState::new(settings);

    while let Ok(command) = command_rx.recv() {
        state.handle(command, &update_tx);
    }

    debug!("engine thread exiting");
}

struct AudioState {
    vocoder: audio::Vocoder,
    oscillator: audio::Oscillator,
    consumer: HeapCons<PadEvent>,
    settings: Arc<ArcSwap<VocoderSettings>>,
    input: Vec<f32>,
    mono: Vec<f32>,
    sample_rate: f32,
    num_channels: usize,
}

impl AudioState {
    /// Everything runs at the stream's own rate; `held` starts the vocoder
    /// already sounding.
    fn new(
        stream_config: &cpal::StreamConfig,
        settings: Arc<ArcSwap<VocoderSettings>>,
        consumer: HeapCons<PadEvent>,
        held: Option<Position>,
    ) -> Self {
        let snapshot = settings.load_full();
        let sample_rate = stream_config.sample_rate as f32;

        let mut vocoder = audio::Vocoder::new(sample_rate, held.unwrap_or(snapshot.location));
        if let Some(position) = held {
            vocoder.touch(position);
        }

        // Sized for common callback lengths; the callback only grows them
        // when the host asks for a larger block.
        Self {
            vocoder,
            oscillator: audio::Oscillator::new(snapshot.oscillator_frequency),
            consumer,
            settings,
            input: vec![0.0; 4096],
            mono: vec![0.0; 4096],
            sample_rate,
            num_channels: (stream_config.channels as usize).max(1),
        }
    }
}

/// The device's default configuration, moved to the requested sample rate
/// when the device supports it with the same layout.
fn choose_output_config(
    device: &cpal::Device,
    requested_rate: u32,
) -> Result<cpal::SupportedStreamConfig, EngineError> {
    let default = device.default_output_config()?;
    let preferred = match device.supported_output_configs() {
        Ok(mut configs) => configs
            .find(|range| {
                range.channels() == default.channels()
                    && range.sample_format() == default.sample_format()
                    && range.min_sample_rate() <= requested_rate
                    && requested_rate <= range.max_sample_rate()
            })
            .map(|range| range.with_sample_rate(requested_rate)),
        Err(e) => {
            warn!(error = %e, "failed to list output configurations");
            None
        }
    };

    Ok(preferred.unwrap_or(default))
}

fn setup_audio(
    settings: Arc<ArcSwap<VocoderSettings>>,
    held: Option<Position>,
) -> Result<(cpal::Stream, HeapProd<PadEvent>), EngineError> {
    let requested_rate = settings.load().sample_rate;

    let ring_buffer = HeapRb::<PadEvent>::new(PAD_EVENT_CAPACITY);
    let (producer, consumer) = ring_buffer.split();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let config = choose_output_config(&device, requested_rate)?;
    let stream_config: cpal::StreamConfig = config.into();

    if stream_config.sample_rate != requested_rate {
        warn!(
            requested = requested_rate,
            actual = stream_config.sample_rate,
            "device does not support the requested sample rate"
        );
    }
    info!(
        channels = stream_config.channels,
        sample_rate = stream_config.sample_rate,
        "audio output"
    );

    let mut audio_state = AudioState::new(&stream_config, settings, consumer, held);

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            audio_callback(data, &mut audio_state);
        },
        |err| error!(error = %err, "audio stream error"),
        None,
    )?;

    stream.play()?;

    Ok((stream, producer))
}

/// Applies queued pad events in order, so the last one wins. Release is
/// ignored while sustain is on.
fn drain_pad_events(
    consumer: &mut HeapCons<PadEvent>,
    vocoder: &mut audio::Vocoder,
    sustain: bool,
) {
    while let Some(event) = consumer.try_pop() {
        match event {
            PadEvent::Move(position) => vocoder.touch(position),
            PadEvent::Release => {
                if !sustain {
                    vocoder.release();
                }
            }
        }
    }
}

fn audio_callback(data: &mut [f32], state: &mut AudioState) {
    let num_frames = data.len() / state.num_channels;
    let settings = state.settings.load();

    drain_pad_events(&mut state.consumer, &mut state.vocoder, settings.sustain);

    if state.input.len() < num_frames {
        state.input.resize(num_frames, 0.0);
        state.mono.resize(num_frames, 0.0);
    }

    let input = &mut state.input[..num_frames];
    let mono = &mut state.mono[..num_frames];

    state.oscillator.frequency = settings.oscillator_frequency;
    state.oscillator.render(input, state.sample_rate);
    state
        .vocoder
        .process_block(input, mono, &settings.modulation());

    for (frame, sample) in data.chunks_mut(state.num_channels).zip(mono.iter()) {
        frame.fill(*sample);
    }
}
