//! Integration Tests - Does the whole pipeline hang together?
//!
//! Stream → buffer → classifier → profile → flock, driven through the
//! public API the way the binary drives it. Each test registers its own
//! stream type tag because the registry is process-global.

use neuroswarm::classifier::ClassifierKind;
use neuroswarm::config::SwarmConfig;
use neuroswarm::driver::SimLoop;
use neuroswarm::profile::{CognitiveState, Rgb};
use neuroswarm::stream::{StreamInfo, StreamRegistry};

const SRATE: usize = 64;

fn config(stream_type: &str, kind: ClassifierKind) -> SwarmConfig {
    let mut config = SwarmConfig::default();
    config.stream_type = stream_type.to_string();
    config.resolve_timeout_secs = 0.3;
    config.sample_rate = SRATE;
    config.classifier = kind;
    config.seed = Some(99);
    config
}

fn info(stream_type: &str) -> StreamInfo {
    StreamInfo {
        name: "IntegrationSource".into(),
        stream_type: stream_type.into(),
        channel_count: 1,
        nominal_srate: SRATE as f64,
        source_id: "integration_001".into(),
    }
}

/// One window's worth of a sinusoid at `freq` Hz
fn sine_window(freq: f64, amplitude: f64) -> Vec<f64> {
    (0..SRATE)
        .map(|i| amplitude * (std::f64::consts::TAU * freq * i as f64 / SRATE as f64).sin())
        .collect()
}

/// I1: Missing stream degrades to a permanently relaxed flock
#[test]
fn integration_absent_stream_degrades_gracefully() {
    let mut sim = SimLoop::new(config("IT-ABSENT", ClassifierKind::Spectral));
    assert!(!sim.has_stream());

    for _ in 0..30 {
        let frame = sim.tick_once();
        assert_eq!(frame.state, CognitiveState::Relaxed);
        assert_eq!(frame.color, Rgb::CYAN);
    }
    assert!(sim.latest_classification().is_none());
}

/// I2: Alpha-dominant signal keeps the flock relaxed through the full
/// spectral path
#[test]
fn integration_alpha_signal_stays_relaxed() {
    let outlet = StreamRegistry::global().create_outlet(info("IT-ALPHA"));
    let mut sim = SimLoop::new(config("IT-ALPHA", ClassifierKind::Spectral));

    for v in sine_window(10.0, 1.0) {
        outlet.push_sample(&[v]);
    }
    let frame = sim.tick_once();
    assert!(frame.classification.is_some(), "full window must classify");
    assert_eq!(frame.state, CognitiveState::Relaxed);
    assert_eq!(frame.color, Rgb::CYAN);
}

/// I3: Beta-dominant signal flips the flock to the stressed profile, and a
/// return to alpha flips it back (the spectral path carries no memory)
#[test]
fn integration_beta_signal_switches_profile() {
    let outlet = StreamRegistry::global().create_outlet(info("IT-BETA"));
    let mut sim = SimLoop::new(config("IT-BETA", ClassifierKind::Spectral));

    // 20 Hz carrier with a trace of alpha
    let beta = sine_window(20.0, 1.0);
    let alpha_trace = sine_window(10.0, 0.05);
    for (b, a) in beta.iter().zip(alpha_trace.iter()) {
        outlet.push_sample(&[b + a]);
    }
    let frame = sim.tick_once();
    assert_eq!(frame.state, CognitiveState::Stressed);
    assert_eq!(frame.color, Rgb::RED);
    assert_eq!(sim.active_profile().max_speed, 10.0);
    assert_eq!(sim.active_profile().cohesion_weight, -2.0);

    for v in sine_window(10.0, 1.0) {
        outlet.push_sample(&[v]);
    }
    let frame = sim.tick_once();
    assert_eq!(frame.state, CognitiveState::Relaxed);
    assert_eq!(sim.transitions(), 2);
}

/// I4: Malformed frames on the wire never reach the classifier
#[test]
fn integration_malformed_frames_dropped_end_to_end() {
    let outlet = StreamRegistry::global().create_outlet(info("IT-NAN"));
    let mut sim = SimLoop::new(config("IT-NAN", ClassifierKind::Magnitude));

    // Interleave garbage with a clean high-magnitude signal
    for _ in 0..SRATE {
        outlet.push_sample(&[f64::NAN]);
        outlet.push_sample(&[f64::INFINITY]);
        outlet.push_sample(&[]);
        outlet.push_sample(&[5.0]);
    }
    let frame = sim.tick_once();

    // Only the 5.0s survive, so the mean is exactly 5.0 and the state flips
    assert_eq!(frame.state, CognitiveState::Stressed);
    match frame.classification {
        Some(c) => match c.metrics {
            neuroswarm::classifier::ClassifierMetrics::Magnitude { mean } => {
                assert!((mean - 5.0).abs() < 1e-12, "garbage leaked into the window")
            }
            other => panic!("unexpected metrics {:?}", other),
        },
        None => panic!("window should have filled"),
    }
}

/// I5: The render frame's color always agrees with the state it ran under
#[test]
fn integration_frame_color_tracks_state() {
    let outlet = StreamRegistry::global().create_outlet(info("IT-COLOR"));
    let mut sim = SimLoop::new(config("IT-COLOR", ClassifierKind::Magnitude));

    for _ in 0..SRATE {
        outlet.push_sample(&[5.0]);
    }
    for _ in 0..20 {
        let frame = sim.tick_once();
        let expected = match frame.state {
            CognitiveState::Relaxed => Rgb::CYAN,
            CognitiveState::Stressed => Rgb::RED,
        };
        assert_eq!(frame.color, expected);
    }
}

/// I6: Kinematic invariants hold across a profile switch
#[test]
fn integration_velocity_capped_across_switch() {
    let outlet = StreamRegistry::global().create_outlet(info("IT-CAP"));
    let mut sim = SimLoop::new(config("IT-CAP", ClassifierKind::Magnitude));

    // Relaxed warm-up
    for _ in 0..50 {
        let frame = sim.tick_once();
        for agent in &frame.agents {
            assert!(agent.velocity.length() <= 4.0 + 1e-9);
        }
    }

    // Flip to stressed: the cap rises to the stressed profile's
    for _ in 0..SRATE {
        outlet.push_sample(&[5.0]);
    }
    for _ in 0..50 {
        let frame = sim.tick_once();
        assert_eq!(frame.state, CognitiveState::Stressed);
        for agent in &frame.agents {
            assert!(agent.velocity.length() <= 10.0 + 1e-9);
        }
    }
}

/// I7: Agents stay inside the toroidal domain forever
#[test]
fn integration_agents_stay_in_bounds() {
    let cfg = config("IT-BOUNDS", ClassifierKind::Spectral);
    let width = cfg.flock.width;
    let height = cfg.flock.height;
    let mut sim = SimLoop::new(cfg);

    for _ in 0..500 {
        let frame = sim.tick_once();
        for agent in &frame.agents {
            assert!(agent.position.x >= 0.0 && agent.position.x <= width);
            assert!(agent.position.y >= 0.0 && agent.position.y <= height);
        }
    }
}
