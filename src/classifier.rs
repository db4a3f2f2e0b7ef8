//! ═══════════════════════════════════════════════════════════════════════════════
//! CLASSIFIER — Signal Window → Physiological State
//! ═══════════════════════════════════════════════════════════════════════════════
//! Two interchangeable strategies behind one trait, selected at
//! configuration time:
//!
//! - Spectral (canonical): FFT band-power ratio beta/alpha against a fixed
//!   threshold. Memoryless: every full-buffer evaluation decides fresh.
//! - Magnitude-hysteresis (simplified): running mean of |sample| with an
//!   upper/lower threshold pair. Stateful: inside the dead band the prior
//!   state is retained, so the output never flickers near one boundary.
//!
//! Neither strategy subsumes the other; they intentionally disagree on
//! thresholds and on whether classification carries memory.
//! ═══════════════════════════════════════════════════════════════════════════════

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::profile::CognitiveState;

/// Strategy selector, set in the config surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Spectral,
    Magnitude,
}

/// Per-evaluation diagnostics, sufficient for an observability overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClassifierMetrics {
    Spectral {
        alpha_power: f64,
        beta_power: f64,
        /// beta/alpha; defined as 0 when alpha power is 0
        ratio: f64,
    },
    Magnitude {
        /// Mean of |sample| over the window
        mean: f64,
    },
}

/// Immutable classification result. Superseded each time the buffer becomes
/// eligible for re-classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: CognitiveState,
    pub metrics: ClassifierMetrics,
}

/// Common contract: consume a full window, emit a state plus diagnostics.
/// `&mut self` because the magnitude strategy is inherently stateful.
pub trait Classifier: Send {
    fn classify(&mut self, window: &[f64]) -> Classification;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPECTRAL STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

/// Spectral thresholds (all externally configurable)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Alpha band in Hz, inclusive
    pub alpha_band: (f64, f64),
    /// Beta band in Hz, inclusive
    pub beta_band: (f64, f64),
    /// STRESSED when beta/alpha exceeds this
    pub ratio_threshold: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            alpha_band: (8.0, 12.0),
            beta_band: (13.0, 30.0),
            ratio_threshold: 2.0,
        }
    }
}

/// Band-power ratio classifier over the FFT of the buffered window
pub struct SpectralClassifier {
    config: SpectralConfig,
    /// Nominal sample rate, used to map FFT bins to frequencies
    sample_rate: f64,
    planner: FftPlanner<f64>,
}

impl SpectralClassifier {
    pub fn new(config: SpectralConfig, sample_rate: f64) -> Self {
        Self {
            config,
            sample_rate,
            planner: FftPlanner::new(),
        }
    }

    /// Summed squared spectral magnitude over bins whose frequency falls
    /// inside `band` (inclusive). Only bins up to Nyquist are scanned.
    fn band_power(spectrum: &[Complex<f64>], bin_hz: f64, band: (f64, f64)) -> f64 {
        let nyquist_bin = spectrum.len() / 2;
        spectrum
            .iter()
            .take(nyquist_bin + 1)
            .enumerate()
            .filter(|(k, _)| {
                let freq = *k as f64 * bin_hz;
                freq >= band.0 && freq <= band.1
            })
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }
}

impl Classifier for SpectralClassifier {
    fn classify(&mut self, window: &[f64]) -> Classification {
        let n = window.len();
        let fft = self.planner.plan_fft_forward(n);
        let mut spectrum: Vec<Complex<f64>> =
            window.iter().map(|&v| Complex::new(v, 0.0)).collect();
        fft.process(&mut spectrum);

        let bin_hz = self.sample_rate / n as f64;
        let alpha_power = Self::band_power(&spectrum, bin_hz, self.config.alpha_band);
        let beta_power = Self::band_power(&spectrum, bin_hz, self.config.beta_band);

        // Division-by-zero guard: no alpha energy means ratio 0, not a fault
        let ratio = if alpha_power > 0.0 {
            beta_power / alpha_power
        } else {
            0.0
        };

        let state = if ratio > self.config.ratio_threshold {
            CognitiveState::Stressed
        } else {
            CognitiveState::Relaxed
        };

        Classification {
            state,
            metrics: ClassifierMetrics::Spectral {
                alpha_power,
                beta_power,
                ratio,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAGNITUDE-HYSTERESIS STRATEGY
// ═══════════════════════════════════════════════════════════════════════════════

/// Hysteresis thresholds. Invariant: lower < upper, and inside
/// [lower, upper] the prior state is retained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MagnitudeConfig {
    /// RELAXED → STRESSED only above this
    pub upper_threshold: f64,
    /// STRESSED → RELAXED only below this
    pub lower_threshold: f64,
}

impl Default for MagnitudeConfig {
    fn default() -> Self {
        Self {
            upper_threshold: 0.9,
            lower_threshold: 0.8,
        }
    }
}

/// Mean-magnitude classifier with a hysteresis dead band. Starts RELAXED.
pub struct MagnitudeClassifier {
    config: MagnitudeConfig,
    state: CognitiveState,
}

impl MagnitudeClassifier {
    pub fn new(config: MagnitudeConfig) -> Self {
        Self {
            config,
            state: CognitiveState::Relaxed,
        }
    }
}

impl Classifier for MagnitudeClassifier {
    fn classify(&mut self, window: &[f64]) -> Classification {
        let mean = if window.is_empty() {
            0.0
        } else {
            window.iter().map(|s| s.abs()).sum::<f64>() / window.len() as f64
        };

        self.state = match self.state {
            CognitiveState::Relaxed if mean > self.config.upper_threshold => {
                CognitiveState::Stressed
            }
            CognitiveState::Stressed if mean < self.config.lower_threshold => {
                CognitiveState::Relaxed
            }
            prior => prior,
        };

        Classification {
            state: self.state,
            metrics: ClassifierMetrics::Magnitude { mean },
        }
    }
}

/// Build the configured strategy
pub fn build_classifier(
    kind: ClassifierKind,
    spectral: SpectralConfig,
    magnitude: MagnitudeConfig,
    sample_rate: f64,
) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::Spectral => Box::new(SpectralClassifier::new(spectral, sample_rate)),
        ClassifierKind::Magnitude => Box::new(MagnitudeClassifier::new(magnitude)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRATE: f64 = 256.0;
    const WINDOW: usize = 256;

    /// One second of a pure sinusoid at `freq` Hz, unit amplitude
    fn sine(freq: f64, amplitude: f64) -> Vec<f64> {
        (0..WINDOW)
            .map(|i| amplitude * (std::f64::consts::TAU * freq * i as f64 / SRATE).sin())
            .collect()
    }

    fn mix(a: &[f64], b: &[f64]) -> Vec<f64> {
        a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
    }

    #[test]
    fn test_spectral_alpha_sine_is_relaxed() {
        let mut c = SpectralClassifier::new(SpectralConfig::default(), SRATE);
        let result = c.classify(&sine(10.0, 1.0));
        assert_eq!(result.state, CognitiveState::Relaxed);

        match result.metrics {
            ClassifierMetrics::Spectral {
                alpha_power,
                beta_power,
                ratio,
            } => {
                assert!(alpha_power > beta_power, "10 Hz energy lands in alpha");
                assert!(ratio < 2.0);
            }
            other => panic!("spectral strategy must emit spectral metrics, got {:?}", other),
        }
    }

    #[test]
    fn test_spectral_beta_energy_is_stressed() {
        let mut c = SpectralClassifier::new(SpectralConfig::default(), SRATE);
        // Broadband beta energy with a whisper of alpha so the ratio is a
        // genuine quotient rather than the division-by-zero fallback
        let window = mix(
            &mix(&sine(18.0, 1.0), &sine(22.0, 1.0)),
            &mix(&sine(27.0, 1.0), &sine(10.0, 0.05)),
        );
        let result = c.classify(&window);
        assert_eq!(result.state, CognitiveState::Stressed);

        match result.metrics {
            ClassifierMetrics::Spectral { ratio, .. } => {
                assert!(ratio > 2.0, "beta-dominant ratio, got {}", ratio)
            }
            other => panic!("unexpected metrics {:?}", other),
        }
    }

    #[test]
    fn test_spectral_zero_alpha_ratio_is_zero() {
        let mut c = SpectralClassifier::new(SpectralConfig::default(), SRATE);
        let result = c.classify(&vec![0.0; WINDOW]);
        assert_eq!(result.state, CognitiveState::Relaxed);
        match result.metrics {
            ClassifierMetrics::Spectral { ratio, alpha_power, .. } => {
                assert_eq!(alpha_power, 0.0);
                assert_eq!(ratio, 0.0);
            }
            other => panic!("unexpected metrics {:?}", other),
        }
    }

    #[test]
    fn test_spectral_is_memoryless() {
        let mut c = SpectralClassifier::new(SpectralConfig::default(), SRATE);
        let beta = mix(&sine(20.0, 1.0), &sine(10.0, 0.01));
        let alpha = sine(10.0, 1.0);
        assert_eq!(c.classify(&beta).state, CognitiveState::Stressed);
        // Immediately flips back: no hysteresis in the spectral path
        assert_eq!(c.classify(&alpha).state, CognitiveState::Relaxed);
    }

    #[test]
    fn test_magnitude_hysteresis_sequence() {
        let mut c = MagnitudeClassifier::new(MagnitudeConfig::default());

        // mean 0.95: crosses the upper threshold
        let r = c.classify(&vec![0.95; WINDOW]);
        assert_eq!(r.state, CognitiveState::Stressed);

        // mean 0.85: inside the dead band, prior state retained
        let r = c.classify(&vec![0.85; WINDOW]);
        assert_eq!(r.state, CognitiveState::Stressed);

        // mean 0.75: below the lower threshold
        let r = c.classify(&vec![0.75; WINDOW]);
        assert_eq!(r.state, CognitiveState::Relaxed);

        // back inside the dead band from below: still RELAXED
        let r = c.classify(&vec![0.85; WINDOW]);
        assert_eq!(r.state, CognitiveState::Relaxed);
    }

    #[test]
    fn test_magnitude_never_oscillates_in_dead_band() {
        let mut c = MagnitudeClassifier::new(MagnitudeConfig::default());
        c.classify(&vec![0.95; WINDOW]);
        for _ in 0..50 {
            let r = c.classify(&vec![0.85; WINDOW]);
            assert_eq!(r.state, CognitiveState::Stressed);
        }
    }

    #[test]
    fn test_magnitude_uses_absolute_values() {
        let mut c = MagnitudeClassifier::new(MagnitudeConfig::default());
        let r = c.classify(&vec![-0.95; WINDOW]);
        assert_eq!(r.state, CognitiveState::Stressed);
        match r.metrics {
            ClassifierMetrics::Magnitude { mean } => assert!((mean - 0.95).abs() < 1e-12),
            other => panic!("unexpected metrics {:?}", other),
        }
    }
}
