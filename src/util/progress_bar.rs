
use indicatif::{ProgressState, ProgressStyle};

/// Shared function to pull our progress spinner styling; we stream records, so there is no known length
pub fn get_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {spinner:.cyan} {pos} records; Speed: {per_sec} {msg}")
        .unwrap()
        .with_key("per_sec", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.0}/s", state.per_sec()).unwrap())
}
