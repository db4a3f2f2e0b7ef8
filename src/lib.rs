//! ═══════════════════════════════════════════════════════════════════════════════
//! NEUROSWARM — Unified Library
//! ═══════════════════════════════════════════════════════════════════════════════
//! A boids flock whose collective temperament is driven by a live scalar
//! signal stream: buffer one second of signal, classify it RELAXED or
//! STRESSED, swap the steering profile, tick the flock.
//! ═══════════════════════════════════════════════════════════════════════════════

// ═══════════════════════════════════════════════════════════════════════════════
// FOUNDATION MODULES — Geometry, windowing, state mapping
// ═══════════════════════════════════════════════════════════════════════════════

pub mod buffer;
pub mod profile;
pub mod vec2;

// ═══════════════════════════════════════════════════════════════════════════════
// CORE MODULES
// ═══════════════════════════════════════════════════════════════════════════════

pub mod classifier;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod flock;
pub mod stream;

// Re-export common error types
pub use error::{SwarmError, SwarmResult};

// Re-export core types
pub use buffer::SampleBuffer;
pub use classifier::{
    build_classifier, Classification, Classifier, ClassifierKind, ClassifierMetrics,
    MagnitudeClassifier, MagnitudeConfig, SpectralClassifier, SpectralConfig,
};
pub use config::SwarmConfig;
pub use driver::{RenderAgent, RenderFrame, SimLoop};
pub use flock::{Boid, FlockConfig, FlockEngine};
pub use profile::{CognitiveState, ProfileTable, Rgb, SteeringProfile};
pub use stream::{
    load_csv_recording, spawn_csv_playback, spawn_fake_brain, FakeBrainConfig, Inlet, Outlet,
    PlaybackConfig, ProducerHandle, StreamInfo, StreamRegistry,
};
pub use vec2::Vec2;
