//! Easing curve catalog
//!
//! Every curve is a pure mapping from a normalized progress value to an
//! interpolation factor. `ease` turns that factor into a value between a start
//! and an end point. Curves that overshoot (back, elastic, bounce, spring) only
//! do so strictly inside the (0, 1) range; both endpoints are exact.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

const BACK_OVERSHOOT: f32 = 1.70158;
const BACK_IN_OUT_SCALE: f32 = 1.525;
const ELASTIC_PERIOD: f32 = 0.3;

// =============================================================================
// Curve Names
// =============================================================================

/// Named easing curves
///
/// Serialized by name (`"easeInOutExpo"`, `"linear"`, ...). Unknown names
/// deserialize to [`Curve::Linear`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Curve {
    /// Straight interpolation
    #[default]
    Linear,
    /// Damped oscillation that settles on the end value
    Spring,
    /// Quadratic, accelerating
    EaseInQuad,
    /// Quadratic, decelerating
    EaseOutQuad,
    /// Quadratic, accelerating then decelerating
    EaseInOutQuad,
    /// Cubic, accelerating
    EaseInCubic,
    /// Cubic, decelerating
    EaseOutCubic,
    /// Cubic, accelerating then decelerating
    EaseInOutCubic,
    /// Quartic, accelerating
    EaseInQuart,
    /// Quartic, decelerating
    EaseOutQuart,
    /// Quartic, accelerating then decelerating
    EaseInOutQuart,
    /// Quintic, accelerating
    EaseInQuint,
    /// Quintic, decelerating
    EaseOutQuint,
    /// Quintic, accelerating then decelerating
    EaseInOutQuint,
    /// Sinusoidal, accelerating
    EaseInSine,
    /// Sinusoidal, decelerating
    EaseOutSine,
    /// Sinusoidal, accelerating then decelerating
    EaseInOutSine,
    /// Exponential, accelerating
    EaseInExpo,
    /// Exponential, decelerating
    EaseOutExpo,
    /// Exponential, accelerating then decelerating
    EaseInOutExpo,
    /// Circular, accelerating
    EaseInCirc,
    /// Circular, decelerating
    EaseOutCirc,
    /// Circular, accelerating then decelerating
    EaseInOutCirc,
    /// Bounce at the start
    EaseInBounce,
    /// Bounce at the end
    EaseOutBounce,
    /// Bounce at both ends
    EaseInOutBounce,
    /// Pull back before moving
    EaseInBack,
    /// Overshoot then settle
    EaseOutBack,
    /// Pull back, then overshoot and settle
    EaseInOutBack,
    /// Elastic wind-up
    EaseInElastic,
    /// Elastic settle
    EaseOutElastic,
    /// Elastic wind-up and settle
    EaseInOutElastic,
}

impl Curve {
    /// Every curve in the catalog
    pub const ALL: [Curve; 32] = [
        Curve::Linear,
        Curve::Spring,
        Curve::EaseInQuad,
        Curve::EaseOutQuad,
        Curve::EaseInOutQuad,
        Curve::EaseInCubic,
        Curve::EaseOutCubic,
        Curve::EaseInOutCubic,
        Curve::EaseInQuart,
        Curve::EaseOutQuart,
        Curve::EaseInOutQuart,
        Curve::EaseInQuint,
        Curve::EaseOutQuint,
        Curve::EaseInOutQuint,
        Curve::EaseInSine,
        Curve::EaseOutSine,
        Curve::EaseInOutSine,
        Curve::EaseInExpo,
        Curve::EaseOutExpo,
        Curve::EaseInOutExpo,
        Curve::EaseInCirc,
        Curve::EaseOutCirc,
        Curve::EaseInOutCirc,
        Curve::EaseInBounce,
        Curve::EaseOutBounce,
        Curve::EaseInOutBounce,
        Curve::EaseInBack,
        Curve::EaseOutBack,
        Curve::EaseInOutBack,
        Curve::EaseInElastic,
        Curve::EaseOutElastic,
        Curve::EaseInOutElastic,
    ];

    /// Catalog name of the curve
    pub fn name(&self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::Spring => "spring",
            Curve::EaseInQuad => "easeInQuad",
            Curve::EaseOutQuad => "easeOutQuad",
            Curve::EaseInOutQuad => "easeInOutQuad",
            Curve::EaseInCubic => "easeInCubic",
            Curve::EaseOutCubic => "easeOutCubic",
            Curve::EaseInOutCubic => "easeInOutCubic",
            Curve::EaseInQuart => "easeInQuart",
            Curve::EaseOutQuart => "easeOutQuart",
            Curve::EaseInOutQuart => "easeInOutQuart",
            Curve::EaseInQuint => "easeInQuint",
            Curve::EaseOutQuint => "easeOutQuint",
            Curve::EaseInOutQuint => "easeInOutQuint",
            Curve::EaseInSine => "easeInSine",
            Curve::EaseOutSine => "easeOutSine",
            Curve::EaseInOutSine => "easeInOutSine",
            Curve::EaseInExpo => "easeInExpo",
            Curve::EaseOutExpo => "easeOutExpo",
            Curve::EaseInOutExpo => "easeInOutExpo",
            Curve::EaseInCirc => "easeInCirc",
            Curve::EaseOutCirc => "easeOutCirc",
            Curve::EaseInOutCirc => "easeInOutCirc",
            Curve::EaseInBounce => "easeInBounce",
            Curve::EaseOutBounce => "easeOutBounce",
            Curve::EaseInOutBounce => "easeInOutBounce",
            Curve::EaseInBack => "easeInBack",
            Curve::EaseOutBack => "easeOutBack",
            Curve::EaseInOutBack => "easeInOutBack",
            Curve::EaseInElastic => "easeInElastic",
            Curve::EaseOutElastic => "easeOutElastic",
            Curve::EaseInOutElastic => "easeInOutElastic",
        }
    }

    /// Look up a curve by catalog name, falling back to linear
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| curve.name() == name)
            .unwrap_or(Curve::Linear)
    }

    /// Whether the curve leaves the [start, end] range mid-flight
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Curve::Spring
                | Curve::EaseInBack
                | Curve::EaseOutBack
                | Curve::EaseInOutBack
                | Curve::EaseInElastic
                | Curve::EaseOutElastic
                | Curve::EaseInOutElastic
        )
    }

    /// Interpolation factor for a normalized progress value
    pub fn factor(&self, t: f32) -> f32 {
        match self {
            Curve::Linear => t,
            Curve::Spring => spring(t),
            Curve::EaseInQuad => t * t,
            Curve::EaseOutQuad => t * (2.0 - t),
            Curve::EaseInOutQuad => in_out(t, |u| u * u),
            Curve::EaseInCubic => t.powi(3),
            Curve::EaseOutCubic => (t - 1.0).powi(3) + 1.0,
            Curve::EaseInOutCubic => in_out(t, |u| u.powi(3)),
            Curve::EaseInQuart => t.powi(4),
            Curve::EaseOutQuart => 1.0 - (t - 1.0).powi(4),
            Curve::EaseInOutQuart => in_out(t, |u| u.powi(4)),
            Curve::EaseInQuint => t.powi(5),
            Curve::EaseOutQuint => (t - 1.0).powi(5) + 1.0,
            Curve::EaseInOutQuint => in_out(t, |u| u.powi(5)),
            Curve::EaseInSine => 1.0 - (t * PI * 0.5).cos(),
            Curve::EaseOutSine => (t * PI * 0.5).sin(),
            Curve::EaseInOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Curve::EaseInExpo => in_expo(t),
            Curve::EaseOutExpo => 1.0 - in_expo(1.0 - t),
            Curve::EaseInOutExpo => in_out(t, in_expo),
            Curve::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Curve::EaseOutCirc => (1.0 - (t - 1.0) * (t - 1.0)).max(0.0).sqrt(),
            Curve::EaseInOutCirc => in_out(t, |u| 1.0 - (1.0 - u * u).max(0.0).sqrt()),
            Curve::EaseInBounce => 1.0 - out_bounce(1.0 - t),
            Curve::EaseOutBounce => out_bounce(t),
            Curve::EaseInOutBounce => in_out(t, |u| 1.0 - out_bounce(1.0 - u)),
            Curve::EaseInBack => in_back(t, BACK_OVERSHOOT),
            Curve::EaseOutBack => 1.0 - in_back(1.0 - t, BACK_OVERSHOOT),
            Curve::EaseInOutBack => in_out(t, |u| in_back(u, BACK_OVERSHOOT * BACK_IN_OUT_SCALE)),
            Curve::EaseInElastic => in_elastic(t),
            Curve::EaseOutElastic => 1.0 - in_elastic(1.0 - t),
            Curve::EaseInOutElastic => in_out(t, in_elastic),
        }
    }

    /// Interpolate between `start` and `end` at `progress`
    pub fn ease(&self, start: f32, end: f32, progress: f32) -> f32 {
        // Pin the endpoints so rounding in the shape functions never leaks out.
        if progress == 0.0 {
            start
        } else if progress == 1.0 {
            end
        } else {
            start + (end - start) * self.factor(progress)
        }
    }
}

impl From<String> for Curve {
    fn from(name: String) -> Self {
        Curve::from_name(&name)
    }
}

impl From<Curve> for String {
    fn from(curve: Curve) -> Self {
        curve.name().to_string()
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interpolate between `start` and `end` with the given curve
pub fn ease(curve: Curve, start: f32, end: f32, progress: f32) -> f32 {
    curve.ease(start, end, progress)
}

/// Interpolate using a curve looked up by name (unknown names are linear)
pub fn ease_named(name: &str, start: f32, end: f32, progress: f32) -> f32 {
    Curve::from_name(name).ease(start, end, progress)
}

// =============================================================================
// Curve Shapes
// =============================================================================

/// Mirror an ease-in shape into an ease-in-out shape
fn in_out(t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        0.5 * ease_in(t * 2.0)
    } else {
        1.0 - 0.5 * ease_in((1.0 - t) * 2.0)
    }
}

fn in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        2f32.powf(10.0 * (t - 1.0))
    }
}

fn in_back(t: f32, overshoot: f32) -> f32 {
    t * t * ((overshoot + 1.0) * t - overshoot)
}

fn out_bounce(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let u = t - 1.5 / D;
        N * u * u + 0.75
    } else if t < 2.5 / D {
        let u = t - 2.25 / D;
        N * u * u + 0.9375
    } else if t < 1.0 {
        let u = t - 2.625 / D;
        N * u * u + 0.984375
    } else {
        1.0
    }
}

fn in_elastic(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let shift = ELASTIC_PERIOD / 4.0;
    let u = t - 1.0;
    -(2f32.powf(10.0 * u) * ((u - shift) * (2.0 * PI) / ELASTIC_PERIOD).sin())
}

fn spring(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    ((t * PI * (0.2 + 2.5 * t * t * t)).sin() * (1.0 - t).powf(2.2) + t) * (1.0 + 1.2 * (1.0 - t))
}
