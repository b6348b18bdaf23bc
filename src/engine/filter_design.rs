// Windowed-sinc FIR filter design
//
// Linear phase is the point: symmetric coefficients give every frequency the
// same delay, so the bands can be summed later without the phase smear a
// minimum-phase (biquad) crossover would introduce.

use std::f32::consts::PI;

use super::types::{FilterKind, DEFAULT_TAP_COUNT};

/// Magnitudes below this skip normalization entirely.
const NORMALIZATION_FLOOR: f32 = 1e-12;

/// A complete FIR design request. Pure value; coefficients are a function of
/// these inputs alone and are recomputed whenever cutoff changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub sample_rate: u32,
    pub kind: FilterKind,
    pub cutoff_hz: f32,
    pub tap_count: usize,
}

impl FilterSpec {
    pub fn low_pass(sample_rate: u32, cutoff_hz: f32) -> Self {
        Self {
            sample_rate,
            kind: FilterKind::Lowpass,
            cutoff_hz,
            tap_count: DEFAULT_TAP_COUNT,
        }
    }

    pub fn high_pass(sample_rate: u32, cutoff_hz: f32) -> Self {
        Self {
            sample_rate,
            kind: FilterKind::Highpass,
            cutoff_hz,
            tap_count: DEFAULT_TAP_COUNT,
        }
    }

    pub fn design(&self) -> Vec<f32> {
        design(self.sample_rate, self.kind, self.cutoff_hz, self.tap_count)
    }
}

/// Synthesize windowed-sinc FIR coefficients.
///
/// The ideal low-pass sinc response is Hamming-windowed; a high-pass is the
/// spectral inversion of that low-pass (unit impulse at the center tap minus
/// the low-pass response). Normalization is kind-aware: low-pass scales to
/// unity coefficient sum (unity DC gain), high-pass scales by peak absolute
/// magnitude since its coefficient sum is near zero.
pub fn design(sample_rate: u32, kind: FilterKind, cutoff_hz: f32, tap_count: usize) -> Vec<f32> {
    let nyquist = sample_rate as f32 / 2.0;
    let normalized_freq = (cutoff_hz / nyquist).min(0.99);
    let half_length = tap_count / 2;

    let mut coefficients = vec![0.0_f32; tap_count];
    for (i, coeff) in coefficients.iter_mut().enumerate() {
        let n = i as i64 - half_length as i64;
        let sinc = if n == 0 {
            2.0 * normalized_freq
        } else {
            (2.0 * PI * normalized_freq * n as f32).sin() / (PI * n as f32)
        };
        let window = 0.54 - 0.46 * (2.0 * PI * i as f32 / (tap_count - 1) as f32).cos();
        *coeff = sinc * window;
    }

    // Spectral inversion: subtract the low-pass impulse response from a unit
    // impulse centered at the same tap.
    if kind == FilterKind::Highpass {
        for (i, coeff) in coefficients.iter_mut().enumerate() {
            let impulse = if i == half_length { 1.0 } else { 0.0 };
            *coeff = impulse - *coeff;
        }
    }

    match kind {
        FilterKind::Lowpass => normalize_by_sum(&mut coefficients),
        FilterKind::Highpass => normalize_by_peak(&mut coefficients),
    }

    coefficients
}

fn normalize_by_sum(coefficients: &mut [f32]) {
    let sum: f32 = coefficients.iter().sum();
    if sum.abs() > NORMALIZATION_FLOOR {
        let factor = 1.0 / sum;
        for coeff in coefficients.iter_mut() {
            *coeff *= factor;
        }
    }
}

fn normalize_by_peak(coefficients: &mut [f32]) {
    let max_abs = coefficients.iter().fold(0.0_f32, |acc, c| acc.max(c.abs()));
    if max_abs > NORMALIZATION_FLOOR {
        let factor = 1.0 / max_abs;
        for coeff in coefficients.iter_mut() {
            *coeff *= factor;
        }
    }
}
