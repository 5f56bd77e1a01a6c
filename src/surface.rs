//! Drawing surface: the only way layout results leave the engine
//!
//! The engine measures text and queues draw calls through [`DrawingSurface`].
//! [`RecordingSurface`] keeps the calls in order so a caller can replay them
//! onto a real graphics backend, and so tests can compare transcripts.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::connection::HorizAlign;
use crate::types::{Angle, Length, Position, RectSize, Size};

pub trait DrawingSurface {
    /// Size of a block of text set in the style of `asset`
    fn measure_text_block(&self, asset: &str, lines: &[String]) -> RectSize;

    /// Queue a text block whose lower-left corner is `lower_left`
    fn place_text_block(&mut self, asset: &str, lower_left: Position, lines: &[String], align: HorizAlign);

    /// Queue a named symbol from `group`, rotated by `angle` around `pin`
    fn place_symbol(&mut self, group: &str, name: &str, pin: Position, angle: Angle);

    fn draw_line_segment(&mut self, asset: &str, from: Position, to: Position);

    fn draw_polyline(&mut self, asset: &str, vertices: &[Position]);
}

/// Proportional character widths in hundredths of the average character width.
#[rustfmt::skip]
const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Width of `text` in hundredths of the average character width
pub fn proportional_text_length(text: &str) -> u32 {
    text.chars()
        .map(|c| {
            if (' '..='~').contains(&c) {
                AW_CHAR[(c as usize) - 0x20] as u32
            } else {
                100
            }
        })
        .sum()
}

/// How a [`RecordingSurface`] sizes text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextMetrics {
    /// Every display column has the same advance
    Monospace { char_width: Length, line_height: Length },
    /// Advance taken from the proportional width table
    Proportional { char_width: Length, line_height: Length },
}

impl Default for TextMetrics {
    fn default() -> Self {
        TextMetrics::Proportional {
            char_width: Length(6.0),
            line_height: Length(12.0),
        }
    }
}

impl TextMetrics {
    pub fn measure(&self, lines: &[String]) -> RectSize {
        let (line_height, widest) = match *self {
            TextMetrics::Monospace { char_width, line_height } => {
                let widest = lines.iter().map(|l| l.as_str().width()).max().unwrap_or(0);
                (line_height, char_width * widest as f64)
            }
            TextMetrics::Proportional { char_width, line_height } => {
                let widest = lines.iter().map(|l| proportional_text_length(l)).max().unwrap_or(0);
                (line_height, char_width * (widest as f64 / 100.0))
            }
        };
        Size::new(line_height * lines.len() as f64, widest)
    }
}

/// One queued drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text {
        asset: String,
        lower_left: Position,
        lines: Vec<String>,
        align: HorizAlign,
    },
    Symbol {
        group: String,
        name: String,
        pin: Position,
        angle: Angle,
    },
    Line {
        asset: String,
        from: Position,
        to: Position,
    },
    Polyline {
        asset: String,
        vertices: Vec<Position>,
    },
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCall::Text { asset, lower_left, lines, align } => {
                write!(f, "text [{asset}] at {lower_left} {align}: {}", lines.join(" / "))
            }
            DrawCall::Symbol { group, name, pin, angle } => {
                write!(f, "symbol [{group}] {name} at {pin} angle {angle}")
            }
            DrawCall::Line { asset, from, to } => write!(f, "line [{asset}] {from} -> {to}"),
            DrawCall::Polyline { asset, vertices } => {
                write!(f, "polyline [{asset}]")?;
                for (i, v) in vertices.iter().enumerate() {
                    let sep = if i == 0 { " " } else { " -> " };
                    write!(f, "{sep}{v}")?;
                }
                Ok(())
            }
        }
    }
}

/// Surface that records every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub metrics: TextMetrics,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: TextMetrics) -> Self {
        Self { metrics, calls: Vec::new() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// All calls, one per line
    pub fn transcript(&self) -> String {
        self.calls
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DrawingSurface for RecordingSurface {
    fn measure_text_block(&self, _asset: &str, lines: &[String]) -> RectSize {
        self.metrics.measure(lines)
    }

    fn place_text_block(&mut self, asset: &str, lower_left: Position, lines: &[String], align: HorizAlign) {
        self.calls.push(DrawCall::Text {
            asset: asset.to_string(),
            lower_left,
            lines: lines.to_vec(),
            align,
        });
    }

    fn place_symbol(&mut self, group: &str, name: &str, pin: Position, angle: Angle) {
        self.calls.push(DrawCall::Symbol {
            group: group.to_string(),
            name: name.to_string(),
            pin,
            angle,
        });
    }

    fn draw_line_segment(&mut self, asset: &str, from: Position, to: Position) {
        self.calls.push(DrawCall::Line {
            asset: asset.to_string(),
            from,
            to,
        });
    }

    fn draw_polyline(&mut self, asset: &str, vertices: &[Position]) {
        self.calls.push(DrawCall::Polyline {
            asset: asset.to_string(),
            vertices: vertices.to_vec(),
        });
    }
}
