//! Display formatting for magnitudes and elapsed time.
//!
//! Pure functions with no hidden state.

/// Suffixes by number of divisions by 1000.
const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Round to 3 significant figures and render with a thousands suffix.
///
/// `999` stays `"999"`, `1000` becomes `"1K"`, `1500000` becomes `"1.5M"`.
/// Trailing zeros and a trailing decimal point are stripped. Values past the
/// `T` range keep the `T` suffix rather than inventing one.
pub fn format_magnitude(value: f64) -> String {
    let mut n = round_significant(value, 3);
    let mut magnitude = 0;
    while n.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        n /= 1000.0;
        magnitude += 1;
    }

    let rendered = format!("{n:.6}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{}", SUFFIXES[magnitude])
}

/// Round a value to the given number of significant figures.
fn round_significant(value: f64, figures: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let scale = figures - 1 - value.abs().log10().floor() as i32;
    let factor = 10f64.powi(scale);
    (value * factor).round() / factor
}

/// Whole seconds rendered as `H:MM:SS`. Hours are not capped at 24.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
