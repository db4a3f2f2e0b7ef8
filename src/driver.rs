//! ═══════════════════════════════════════════════════════════════════════════════
//! DRIVER — Fixed-Rate Simulation Loop
//! ═══════════════════════════════════════════════════════════════════════════════
//! Owns the whole per-tick pipeline: drain the stream, re-classify when the
//! window is ready, swap the steering profile, advance the flock, emit a
//! render frame. The profile swap happens strictly between ticks; no agent
//! ever sees two profiles within one tick.
//!
//! Pacing: absolute deadline advanced by one period per tick. A loop that
//! falls behind its deadline resets the schedule instead of bursting to
//! catch up.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::buffer::SampleBuffer;
use crate::classifier::{build_classifier, Classification, Classifier};
use crate::config::SwarmConfig;
use crate::display;
use crate::flock::FlockEngine;
use crate::profile::{CognitiveState, Rgb, SteeringProfile};
use crate::stream::{Inlet, StreamRegistry};
use crate::vec2::Vec2;

/// One agent as the renderer sees it
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderAgent {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading angle in radians
    pub heading: f64,
}

/// Everything a rendering collaborator needs for one tick
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub tick: u64,
    pub agents: Vec<RenderAgent>,
    /// Display color of the active profile
    pub color: Rgb,
    /// State the tick ran under
    pub state: CognitiveState,
    /// Most recent classification, None until the first full window
    pub classification: Option<Classification>,
}

/// The simulation loop driver
pub struct SimLoop {
    config: SwarmConfig,
    engine: FlockEngine,
    buffer: SampleBuffer,
    classifier: Box<dyn Classifier>,
    inlet: Option<Inlet>,
    state: CognitiveState,
    latest: Option<Classification>,
    /// Samples ingested since the last classification
    fresh_samples: usize,
    tick: u64,
    transitions: u64,
    stop: Arc<AtomicBool>,
}

impl SimLoop {
    /// Build the full pipeline. Stream discovery happens here, bounded by
    /// the configured timeout; an absent stream degrades to a permanently
    /// RELAXED flock rather than failing.
    pub fn new(config: SwarmConfig) -> Self {
        let initial_state = CognitiveState::Relaxed;
        let initial_profile = config.profiles.profile_for(initial_state);
        let seed = config.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });

        let engine = FlockEngine::new(config.flock.clone(), &initial_profile, seed);
        let buffer = SampleBuffer::new(config.sample_rate);
        let classifier = build_classifier(
            config.classifier,
            config.spectral,
            config.magnitude,
            config.sample_rate as f64,
        );

        let timeout = Duration::from_secs_f64(config.resolve_timeout_secs);
        let inlet = StreamRegistry::global()
            .resolve(&config.stream_type, timeout)
            .map(|i| i.with_channel(config.stream_channel));
        if inlet.is_none() {
            display::warning(&format!(
                "no '{}' stream found within {:.1}s; running with the {} profile",
                config.stream_type,
                config.resolve_timeout_secs,
                initial_state.name()
            ));
        }

        Self {
            config,
            engine,
            buffer,
            classifier,
            inlet,
            state: initial_state,
            latest: None,
            fresh_samples: 0,
            tick: 0,
            transitions: 0,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked at the top of each loop iteration; raise it from any
    /// thread to stop the run cleanly.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn state(&self) -> CognitiveState {
        self.state
    }

    pub fn active_profile(&self) -> SteeringProfile {
        self.config.profiles.profile_for(self.state)
    }

    pub fn latest_classification(&self) -> Option<Classification> {
        self.latest
    }

    pub fn engine(&self) -> &FlockEngine {
        &self.engine
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Whether a producer was discovered at startup
    pub fn has_stream(&self) -> bool {
        self.inlet.is_some()
    }

    /// Run exactly one tick of the pipeline and return its render frame
    pub fn tick_once(&mut self) -> RenderFrame {
        // 1. Drain whatever the producer has pushed since last tick
        if let Some(inlet) = &self.inlet {
            self.fresh_samples += inlet.drain_into(&mut self.buffer);
        }

        // 2. Re-classify only on a full window that actually moved
        if self.buffer.is_full() && self.fresh_samples > 0 {
            let classification = self.classifier.classify(&self.buffer.snapshot());
            self.fresh_samples = 0;
            if classification.state != self.state {
                self.transitions += 1;
                if self.config.verbose {
                    display::state_change(self.state, classification.state, self.tick);
                }
                self.state = classification.state;
            }
            self.latest = Some(classification);
        }

        // 3. One profile for the whole tick
        let profile = self.config.profiles.profile_for(self.state);
        self.engine.tick(&profile);
        self.tick += 1;

        RenderFrame {
            tick: self.tick,
            agents: self
                .engine
                .boids()
                .iter()
                .map(|b| RenderAgent {
                    position: b.position,
                    velocity: b.velocity,
                    heading: b.heading(),
                })
                .collect(),
            color: profile.color,
            state: self.state,
            classification: self.latest,
        }
    }

    /// Drive the loop at the configured frame rate until the stop flag is
    /// raised or `max_ticks` elapse. Returns the number of ticks run.
    pub fn run(&mut self, max_ticks: Option<u64>) -> u64 {
        let period = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        // Dashboard cadence: once per simulated second
        let dashboard_every = self.config.frame_rate.max(1.0) as u64;
        let started_at = self.tick;
        let mut next_wake = Instant::now();

        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            if let Some(limit) = max_ticks {
                if self.tick - started_at >= limit {
                    break;
                }
            }

            let frame = self.tick_once();
            if self.config.verbose && frame.tick % dashboard_every == 0 {
                display::dashboard(&frame);
            }

            next_wake += period;
            let now = Instant::now();
            if next_wake > now {
                thread::sleep(next_wake - now);
            } else {
                // Fell behind the schedule: reset rather than burst
                next_wake = now;
            }
        }

        self.tick - started_at
    }
}
