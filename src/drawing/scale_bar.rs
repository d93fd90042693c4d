//! Scale bar layout

use std::fmt;

use crate::projection::Scale;
use crate::types::Vector2;

/// Number of alternating segments in a scale bar.
pub const SEGMENTS: usize = 5;

/// Unit shown on the scale bar ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleUnit {
    Centimetres,
    Metres,
    Kilometres,
}

impl fmt::Display for ScaleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Centimetres => write!(f, "cm"),
            Self::Metres => write!(f, "m"),
            Self::Kilometres => write!(f, "km"),
        }
    }
}

/// A segmented scale bar in document units.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    /// Left end of the bar
    pub origin: Vector2,
    /// Length of one segment in document units
    pub segment_length: f64,
    pub segments: usize,
    /// Tick texts from 0 to the full length, the last one with its unit
    pub ticks: Vec<String>,
    pub unit: ScaleUnit,
    /// Ratio caption, `1:N`
    pub caption: String,
}

impl ScaleBar {
    /// Lay out a bar for `scale`: segments of 1, 2 or 5 times a power of
    /// ten, labelled in the largest unit that keeps the numbers readable.
    pub fn for_scale(scale: &Scale, origin: Vector2) -> Self {
        let denominator = scale.denominator;
        let magnitude = decimal_magnitude(denominator);
        let power = 10f64.powi(magnitude);

        let (unit, unit_factor) = if magnitude < 2 {
            (ScaleUnit::Centimetres, power)
        } else if magnitude < 5 {
            (ScaleUnit::Metres, 10f64.powi(magnitude - 2))
        } else {
            (ScaleUnit::Kilometres, 10f64.powi(magnitude - 5))
        };

        let leading = denominator / power;
        let step = if leading < 2.0 {
            1.0
        } else if leading < 5.0 {
            2.0
        } else {
            5.0
        };

        // step * 10^magnitude centimetres of cave per segment
        let segment_metres = step * power / 100.0;
        let ticks = (0..=SEGMENTS)
            .map(|i| {
                let text = format_number(step * i as f64 * unit_factor);
                if i == SEGMENTS {
                    format!("{}{}", text, unit)
                } else {
                    text
                }
            })
            .collect();

        Self {
            origin,
            segment_length: segment_metres * scale.factor(),
            segments: SEGMENTS,
            ticks,
            unit,
            caption: format!("1:{}", format_number(denominator)),
        }
    }

    pub fn length(&self) -> f64 {
        self.segment_length * self.segments as f64
    }
}

/// `floor(log10(value))`, exact at powers of ten.
fn decimal_magnitude(value: f64) -> i32 {
    let estimate = value.log10().floor() as i32;
    if 10f64.powi(estimate + 1) <= value {
        estimate + 1
    } else if 10f64.powi(estimate) > value {
        estimate - 1
    } else {
        estimate
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        // drop float noise such as 0.30000000000000004
        let text = format!("{:.6}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
