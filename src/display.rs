//! ═══════════════════════════════════════════════════════════════════════════════
//! DISPLAY — Terminal Output Formatting
//! ═══════════════════════════════════════════════════════════════════════════════

use chrono::Local;
use colored::*;

use crate::classifier::ClassifierMetrics;
use crate::driver::RenderFrame;
use crate::profile::CognitiveState;

fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Display welcome banner
pub fn welcome(boid_count: usize, stream_type: &str) {
    println!();
    println!("{}", "═".repeat(60).cyan());
    println!(
        "{}",
        "  NEUROSWARM — EEG-Driven Flocking".bright_white().bold()
    );
    println!("{}", "═".repeat(60).cyan());
    println!();
    println!(
        "{} {} agents │ {} stream '{}'",
        "Flock:".bright_black(),
        boid_count.to_string().white(),
        "listening for".bright_black(),
        stream_type.yellow()
    );
    println!();
}

/// Per-tick dashboard line (verbose mode)
pub fn dashboard(frame: &RenderFrame) {
    let state_label = match frame.state {
        CognitiveState::Relaxed => frame.state.name().cyan().bold(),
        CognitiveState::Stressed => frame.state.name().red().bold(),
    };

    let metrics = match frame.classification.map(|c| c.metrics) {
        Some(ClassifierMetrics::Spectral {
            alpha_power,
            beta_power,
            ratio,
        }) => format!(
            "α {:>9.1} │ β {:>9.1} │ ratio {:>6.2}",
            alpha_power, beta_power, ratio
        ),
        Some(ClassifierMetrics::Magnitude { mean }) => format!("mean |x| {:>6.3}", mean),
        None => "awaiting full window".to_string(),
    };

    println!(
        "{} {} tick {:>6} │ {} │ {}",
        timestamp().bright_black(),
        "▸".bright_black(),
        frame.tick.to_string().white(),
        state_label,
        metrics.bright_black()
    );
}

/// Announce a state transition
pub fn state_change(from: CognitiveState, to: CognitiveState, tick: u64) {
    let to_label = match to {
        CognitiveState::Relaxed => to.name().cyan().bold(),
        CognitiveState::Stressed => to.name().red().bold(),
    };
    println!(
        "{} {} {} → {} (tick {})",
        timestamp().bright_black(),
        "STATE:".yellow().bold(),
        from.name().bright_black(),
        to_label,
        tick
    );
}

/// Display informational message
pub fn info(message: &str) {
    println!("{} {}", timestamp().bright_black(), message.white());
}

/// Display warning message
pub fn warning(message: &str) {
    println!(
        "{} {} {}",
        timestamp().bright_black(),
        "WARNING:".yellow().bold(),
        message.yellow()
    );
}

/// Display error
pub fn error(message: &str) {
    println!(
        "{} {} {}",
        timestamp().bright_black(),
        "ERROR:".red().bold(),
        message.red()
    );
}

/// Final run summary
pub fn summary(ticks: u64, transitions: u64, final_state: CognitiveState) {
    println!();
    println!("{}", "─".repeat(60).bright_black());
    println!(
        "{} {} ticks │ {} state changes │ final {}",
        "Run complete:".white().bold(),
        ticks.to_string().white(),
        transitions.to_string().white(),
        match final_state {
            CognitiveState::Relaxed => final_state.name().cyan(),
            CognitiveState::Stressed => final_state.name().red(),
        }
    );
    println!("{}", "─".repeat(60).bright_black());
}
