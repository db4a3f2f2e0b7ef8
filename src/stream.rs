//! ═══════════════════════════════════════════════════════════════════════════════
//! STREAM — Named, Typed Sample Streams + Producer Harnesses
//! ═══════════════════════════════════════════════════════════════════════════════
//! In-process model of the producer/consumer boundary: producers publish
//! multi-channel frames through a bounded channel registered under a name
//! and a semantic type tag ("EEG"); the consumer resolves a stream by type
//! with a bounded discovery timeout and polls it without ever blocking.
//!
//! The real network transport lives outside the core; this module is the
//! whole of its contract. Absence of a discoverable stream is not fatal.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;
use crate::error::{SwarmError, SwarmResult};

/// Frames buffered on the wire before the producer starts dropping
const WIRE_CAPACITY: usize = 4096;

/// How often discovery re-checks the registry while waiting
const DISCOVERY_POLL: Duration = Duration::from_millis(50);

/// Stream metadata, the consumer-visible half of the contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Stream name (e.g. "BioSemi", "Muse")
    pub name: String,
    /// Semantic type tag used for discovery (e.g. "EEG")
    pub stream_type: String,
    /// Channels per frame
    pub channel_count: usize,
    /// Nominal sample rate in Hz
    pub nominal_srate: f64,
    /// Producer identity
    pub source_id: String,
}

struct RegisteredStream {
    info: StreamInfo,
    receiver: Receiver<Vec<f64>>,
}

/// Process-wide stream registry. Producers register outlets here; consumers
/// resolve inlets by type tag.
pub struct StreamRegistry {
    streams: Mutex<Vec<RegisteredStream>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self {
            streams: Mutex::new(Vec::new()),
        }
    }

    /// The shared process-wide registry
    pub fn global() -> &'static StreamRegistry {
        static GLOBAL: std::sync::OnceLock<StreamRegistry> = std::sync::OnceLock::new();
        GLOBAL.get_or_init(StreamRegistry::new)
    }

    /// Register a new outlet under `info`. The matching inlet becomes
    /// discoverable immediately.
    pub fn create_outlet(&self, info: StreamInfo) -> Outlet {
        let (sender, receiver) = bounded(WIRE_CAPACITY);
        self.streams.lock().push(RegisteredStream {
            info: info.clone(),
            receiver,
        });
        Outlet { info, sender }
    }

    /// Resolve a stream by its semantic type tag, waiting up to `timeout`.
    /// Returns `None` when nothing shows up in time; the caller is expected
    /// to degrade gracefully, not fail.
    pub fn resolve(&self, stream_type: &str, timeout: Duration) -> Option<Inlet> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let streams = self.streams.lock();
                if let Some(s) = streams.iter().find(|s| s.info.stream_type == stream_type) {
                    return Some(Inlet {
                        info: s.info.clone(),
                        receiver: s.receiver.clone(),
                        channel: 0,
                    });
                }
            }
            if Instant::now() >= deadline {
                return None;
            }
            thread::sleep(DISCOVERY_POLL.min(deadline.saturating_duration_since(Instant::now())));
        }
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle: pushes multi-channel frames, never blocks
pub struct Outlet {
    info: StreamInfo,
    sender: Sender<Vec<f64>>,
}

impl Outlet {
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// Publish one frame. A full wire drops the frame rather than stalling
    /// the producer's cadence; a disconnected wire is silently ignored.
    pub fn push_sample(&self, frame: &[f64]) {
        match self.sender.try_send(frame.to_vec()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Consumer handle: non-blocking poll of pending frames
pub struct Inlet {
    info: StreamInfo,
    receiver: Receiver<Vec<f64>>,
    /// Representative channel extracted from each frame
    channel: usize,
}

impl Inlet {
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// Select which channel feeds the buffer (default 0)
    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    /// Drain every currently pending frame into `buffer`, extracting the
    /// configured channel. Malformed frames (missing channel, non-finite
    /// value) are dropped; this can never fail or block. Returns the number
    /// of samples ingested.
    pub fn drain_into(&self, buffer: &mut SampleBuffer) -> usize {
        let mut ingested = 0;
        while let Ok(frame) = self.receiver.try_recv() {
            match frame.get(self.channel) {
                Some(v) if v.is_finite() => {
                    buffer.push(*v);
                    ingested += 1;
                }
                // Malformed sample: drop it, keep the tick alive
                _ => {}
            }
        }
        ingested
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRODUCER HARNESSES
// ═══════════════════════════════════════════════════════════════════════════════
// Stand-ins for the external sample producers: each runs on its own thread
// at the stream's nominal cadence and stops when the shared flag is raised.

/// Handle to a running producer thread
pub struct ProducerHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ProducerHandle {
    /// Raise the stop flag and join the thread
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }
}

/// Synthetic brain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakeBrainConfig {
    /// Seconds to stay in each state before toggling
    pub toggle_interval_secs: f64,
    /// Alpha carrier frequency in Hz while relaxed
    pub alpha_freq: f64,
}

impl Default for FakeBrainConfig {
    fn default() -> Self {
        Self {
            toggle_interval_secs: 10.0,
            alpha_freq: 10.0,
        }
    }
}

/// Launch a synthetic EEG producer: smooth alpha sine with per-channel
/// jitter while "relaxed", broadband noise while "stressed", toggling every
/// `toggle_interval_secs`.
pub fn spawn_fake_brain(info: StreamInfo, config: FakeBrainConfig) -> ProducerHandle {
    let outlet = StreamRegistry::global().create_outlet(info.clone());
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();

    let handle = thread::spawn(move || {
        let period = Duration::from_secs_f64(1.0 / info.nominal_srate);
        let toggle_interval = Duration::from_secs_f64(config.toggle_interval_secs);
        let mut rng = rand::thread_rng();
        let start = Instant::now();
        let mut relaxed = true;
        let mut next_toggle = Instant::now() + toggle_interval;
        let mut next_wake = Instant::now();

        while !thread_stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= next_toggle {
                relaxed = !relaxed;
                next_toggle = now + toggle_interval;
            }

            let t = start.elapsed().as_secs_f64();
            let frame: Vec<f64> = if relaxed {
                let base = (std::f64::consts::TAU * config.alpha_freq * t).sin();
                (0..info.channel_count)
                    .map(|_| base + rng.gen_range(-0.1..0.1))
                    .collect()
            } else {
                (0..info.channel_count)
                    .map(|_| rng.gen_range(-2.0..2.0))
                    .collect()
            };
            outlet.push_sample(&frame);

            next_wake += period;
            let now = Instant::now();
            if next_wake > now {
                thread::sleep(next_wake - now);
            } else {
                next_wake = now;
            }
        }
    });

    ProducerHandle { stop, handle }
}

/// CSV playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Divisor applied to every value (e.g. 100.0 to bring µV-scale Muse
    /// recordings into simulation range)
    pub scale: f64,
    /// Loop back to the first row at end of file
    pub looped: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            looped: true,
        }
    }
}

/// Load a CSV recording: the first `channel_count` numeric columns of each
/// row become one frame. A header row and malformed rows are skipped.
pub fn load_csv_recording(
    path: &Path,
    channel_count: usize,
    scale: f64,
) -> SwarmResult<Vec<Vec<f64>>> {
    let contents = std::fs::read_to_string(path)?;
    let mut frames = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<f64> = line
            .split(',')
            .take(channel_count)
            .filter_map(|field| field.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v / scale)
            .collect();
        // Rows that don't yield a full frame (headers, truncated lines)
        // are dropped, not fatal
        if values.len() == channel_count {
            frames.push(values);
        }
    }

    if frames.is_empty() {
        return Err(SwarmError::Stream(format!(
            "no usable samples in {}",
            path.display()
        )));
    }
    Ok(frames)
}

/// Launch a producer replaying a pre-recorded CSV at the nominal rate
pub fn spawn_csv_playback(
    info: StreamInfo,
    path: &Path,
    config: PlaybackConfig,
) -> SwarmResult<ProducerHandle> {
    let frames = load_csv_recording(path, info.channel_count, config.scale)?;
    let outlet = StreamRegistry::global().create_outlet(info.clone());
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();

    let handle = thread::spawn(move || {
        let period = Duration::from_secs_f64(1.0 / info.nominal_srate);
        let mut next_wake = Instant::now();
        let mut row = 0usize;

        while !thread_stop.load(Ordering::Relaxed) {
            outlet.push_sample(&frames[row]);
            row += 1;
            if row >= frames.len() {
                if !config.looped {
                    break;
                }
                row = 0;
            }

            next_wake += period;
            let now = Instant::now();
            if next_wake > now {
                thread::sleep(next_wake - now);
            } else {
                next_wake = now;
            }
        }
    });

    Ok(ProducerHandle { stop, handle })
}
