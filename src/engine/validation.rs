// Gain arithmetic and input validation shared across the engine
//
// Configuration arrives from a cooperating but possibly stale UI, so
// malformed values are clamped or ignored here rather than surfaced as
// errors to the caller.

use anyhow::Result;

use super::types::EQ_GAIN_RANGE_DB;

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Clamp an equalizer gain to the supported range. Non-finite input is
/// coerced to 0 dB (flat).
#[inline]
pub fn clamp_eq_gain(gain_db: f32) -> f32 {
    if gain_db.is_finite() {
        gain_db.clamp(-EQ_GAIN_RANGE_DB, EQ_GAIN_RANGE_DB)
    } else {
        0.0
    }
}

/// Validate that a number is within safe floating point bounds
pub fn validate_safe_float(value: f32, name: &str) -> Result<()> {
    if value.is_nan() {
        return Err(anyhow::anyhow!("{} is NaN", name));
    }
    if value.is_infinite() {
        return Err(anyhow::anyhow!("{} is infinite", name));
    }
    if value.abs() > 1e6 {
        return Err(anyhow::anyhow!("{} is too large: {}", name, value));
    }
    Ok(())
}

/// Validate a crossover band's frequency range.
pub fn validate_band_range(low_hz: f32, high_hz: f32) -> Result<()> {
    validate_safe_float(low_hz, "band low corner")?;
    validate_safe_float(high_hz, "band high corner")?;
    if low_hz <= 0.0 {
        return Err(anyhow::anyhow!(
            "Band low corner must be positive, got {}",
            low_hz
        ));
    }
    if high_hz <= low_hz {
        return Err(anyhow::anyhow!(
            "Band high corner ({}) must exceed low corner ({})",
            high_hz,
            low_hz
        ));
    }
    Ok(())
}
