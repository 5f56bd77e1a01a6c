//! Connection vocabulary: node faces, stretch policies, names and path requests
//!
//! Face-dependent geometry lives in a single table so the axis, sign,
//! opposite face and icon angle of each face can be audited together.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::types::{Angle, UnitVec};

/// A side of a node's bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeFace {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
}

/// One row of the face table
#[derive(Debug, Clone, Copy)]
struct FaceGeometry {
    /// Direction a stem travels when leaving the face
    outward: UnitVec,
    opposite: NodeFace,
    /// Rotation applied to a directional icon placed on the face
    angle: Angle,
}

#[rustfmt::skip]
const FACE_TABLE: [FaceGeometry; 4] = [
    // Top
    FaceGeometry { outward: UnitVec::UP,    opposite: NodeFace::Bottom, angle: Angle(90.0) },
    // Bottom
    FaceGeometry { outward: UnitVec::DOWN,  opposite: NodeFace::Top,    angle: Angle(270.0) },
    // Left
    FaceGeometry { outward: UnitVec::LEFT,  opposite: NodeFace::Right,  angle: Angle(180.0) },
    // Right
    FaceGeometry { outward: UnitVec::RIGHT, opposite: NodeFace::Left,   angle: Angle(0.0) },
];

impl NodeFace {
    pub const ALL: [NodeFace; 4] = [NodeFace::Top, NodeFace::Bottom, NodeFace::Left, NodeFace::Right];

    fn geometry(self) -> &'static FaceGeometry {
        &FACE_TABLE[self as usize]
    }

    pub fn opposite(self) -> NodeFace {
        self.geometry().opposite
    }

    /// Unit direction pointing away from the node
    pub fn outward(self) -> UnitVec {
        self.geometry().outward
    }

    /// Icon angle associated with this face
    pub fn stem_angle(self) -> Angle {
        self.geometry().angle
    }

    /// LEFT and RIGHT stems run horizontally
    pub fn is_horizontal(self) -> bool {
        self.outward().is_horizontal()
    }
}

impl fmt::Display for NodeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeFace::Top => "top",
            NodeFace::Bottom => "bottom",
            NodeFace::Left => "left",
            NodeFace::Right => "right",
        };
        f.write_str(s)
    }
}

/// How the far (vine) end of a stem is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stretch {
    /// Vine end at exactly the minimum length from the root
    Fixed,
    /// Vine end at the minimum length; the connector line may continue past it
    Free,
    /// Vine end placed by the owning connector
    Hanging,
}

/// Which end of a stem an icon is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconOrientation {
    Root,
    Vine,
}

/// Horizontal alignment of the lines in a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizAlign {
    Left,
    Center,
    Right,
}

impl fmt::Display for HorizAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HorizAlign::Left => "left",
            HorizAlign::Center => "center",
            HorizAlign::Right => "right",
        };
        f.write_str(s)
    }
}

/// Text wrapped onto a fixed number of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub lines: Vec<String>,
}

impl TextBlock {
    /// Break `text` at word boundaries into at most `wrap` lines of similar display width.
    pub fn wrap(text: &str, wrap: u32) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let wrap = wrap.max(1) as usize;
        if wrap == 1 || words.len() <= 1 {
            return TextBlock { lines: vec![words.join(" ")] };
        }
        let total: usize = words.iter().map(|w| w.width()).sum::<usize>() + words.len() - 1;
        let target = total.div_ceil(wrap);

        let mut lines: Vec<String> = Vec::with_capacity(wrap);
        let mut current = String::new();
        for (i, word) in words.iter().enumerate() {
            let words_left = words.len() - i;
            let lines_left = wrap - lines.len();
            let must_break = !current.is_empty() && words_left < lines_left;
            let would_overflow = !current.is_empty()
                && current.width() + 1 + word.width() > target
                && lines.len() + 1 < wrap;
            if must_break || would_overflow {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
        TextBlock { lines }
    }
}

/// Name attached beside a stem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemName {
    pub text: String,
    /// +1 or -1, the side of the stem axis where the name sits
    pub side: i32,
    #[serde(default = "one")]
    pub wrap: u32,
}

/// Name attached beside a connector line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorName {
    pub text: String,
    /// +1 or -1, the side of the line where the name sits
    pub side: i32,
    /// 1-based segment (or branch) the name is attached to
    #[serde(default = "one_usize")]
    pub bend: usize,
    /// Signed step along the segment, 0 is the segment midpoint
    #[serde(default)]
    pub notch: i32,
    #[serde(default = "one")]
    pub wrap: u32,
}

/// One requested corridor on a bent route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    /// 1-based grid row or column number
    pub lane: u32,
    /// Signed track within the lane; `None` lets the allocator choose
    #[serde(default)]
    pub rut: Option<i32>,
}

fn one() -> u32 {
    1
}

fn one_usize() -> usize {
    1
}
