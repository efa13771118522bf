// SPDX-License-Identifier: MIT OR Apache-2.0
//! Colour gradients sampled along a noodle.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// A colour key in a gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    /// Position along the gradient (0.0 to 1.0)
    pub time: f32,
    /// Colour (RGBA, unmultiplied)
    pub color: [u8; 4],
}

/// Piecewise-linear colour gradient
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gradient {
    /// Keys sorted by time
    keys: Vec<GradientKey>,
}

impl Gradient {
    /// Create a gradient from keys in any order
    pub fn new(mut keys: Vec<GradientKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// A single colour everywhere
    pub fn solid(color: Color32) -> Self {
        Self::new(vec![GradientKey {
            time: 0.0,
            color: color.to_srgba_unmultiplied(),
        }])
    }

    /// Blend from `from` at the start to `to` at the end
    pub fn between(from: Color32, to: Color32) -> Self {
        Self::new(vec![
            GradientKey {
                time: 0.0,
                color: from.to_srgba_unmultiplied(),
            },
            GradientKey {
                time: 1.0,
                color: to.to_srgba_unmultiplied(),
            },
        ])
    }

    /// Keys sorted by time
    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Sample the gradient at `t`
    pub fn evaluate(&self, t: f32) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return Color32::WHITE;
        };

        if t <= first.time {
            return to_color(first.color);
        }
        if t >= last.time {
            return to_color(last.color);
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.time && t <= b.time {
                let span = b.time - a.time;
                let f = if span > 0.0 { (t - a.time) / span } else { 0.0 };
                return to_color(lerp_rgba(a.color, b.color, f));
            }
        }

        to_color(last.color)
    }
}

// Channels are clamped to the u8 range before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_rgba(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (channel, (&from, &to)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        let value = f32::from(from) + (f32::from(to) - f32::from(from)) * t;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn to_color([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}
