use serde::{Deserialize, Serialize};

/// Monotonic mapping from normalized relative speed to an impulse factor.
///
/// Inputs and outputs are both clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseCurve {
    Linear,
    /// Hermite ease-in-out, 3t² - 2t³
    SmoothStep,
    Constant(f32),
    /// Piecewise-linear through `[input, output]` keys, sorted by input
    Keyframes(Vec<[f32; 2]>),
}

impl Default for ResponseCurve {
    fn default() -> Self {
        ResponseCurve::SmoothStep
    }
}

impl ResponseCurve {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = clamp01(t);
        let value = match self {
            ResponseCurve::Linear => t,
            ResponseCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
            ResponseCurve::Constant(v) => *v,
            ResponseCurve::Keyframes(keys) => evaluate_keys(keys, t),
        };
        clamp01(value)
    }

    /// True when outputs never decrease over the input range
    pub fn is_monotonic(&self) -> bool {
        match self {
            ResponseCurve::Keyframes(keys) => keys
                .windows(2)
                .all(|pair| pair[1][0] >= pair[0][0] && pair[1][1] >= pair[0][1]),
            _ => true,
        }
    }
}

fn evaluate_keys(keys: &[[f32; 2]], t: f32) -> f32 {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return t,
    };
    if t <= first[0] {
        return first[1];
    }
    if t >= last[0] {
        return last[1];
    }
    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a[0] && t <= b[0] {
            let span = b[0] - a[0];
            if span <= f32::EPSILON {
                return b[1];
            }
            return a[1] + (b[1] - a[1]) * (t - a[0]) / span;
        }
    }
    last[1]
}

/// Clamp into `[0, 1]`, mapping NaN to 0
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
