//! Static style tables: per-kind sizes and colors, the community palette,
//! density-aware scaling, and per-kind edge styles.
//!
//! Everything here is a pure lookup. The tables are the single source of
//! truth for builder-assigned presentation; the resolver only layers
//! interaction overrides on top.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeKind, NodeKind};

/// An opaque sRGB color.
///
/// Dimming is a linear per-channel blend toward a background color rather
/// than alpha transparency, so a renderer can paint dimmed elements
/// without compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from raw channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    ///
    /// # Returns
    ///
    /// `None` if the string is not exactly `#` followed by six hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Blend toward `background`, keeping `keep` of this color.
    ///
    /// `keep = 1.0` returns this color unchanged, `keep = 0.0` returns the
    /// background. Values outside `[0, 1]` are clamped.
    #[must_use]
    pub fn blend_toward(self, background: Self, keep: f32) -> Self {
        let keep = keep.clamp(0.0, 1.0);
        let channel = |from: u8, to: u8| -> u8 {
            let blended = f32::from(to) + (f32::from(from) - f32::from(to)) * keep;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                blended.round().clamp(0.0, 255.0) as u8
            }
        };
        Self {
            r: channel(self.r, background.r),
            g: channel(self.g, background.g),
            b: channel(self.b, background.b),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

/// Cyclic 12-entry palette for community coloring.
///
/// Indexed by `community_index % 12`, so `community_color(i)` is periodic
/// with period 12 for any community count.
const COMMUNITY_PALETTE: [Color; 12] = [
    Color::new(0x3b, 0x82, 0xf6), // blue
    Color::new(0x22, 0xc5, 0x5e), // green
    Color::new(0xf9, 0x73, 0x16), // orange
    Color::new(0xa8, 0x55, 0xf7), // purple
    Color::new(0x06, 0xb6, 0xd4), // cyan
    Color::new(0xea, 0xb3, 0x08), // yellow
    Color::new(0xec, 0x48, 0x99), // pink
    Color::new(0x14, 0xb8, 0xa6), // teal
    Color::new(0x8b, 0x5c, 0xf6), // violet
    Color::new(0x84, 0xcc, 0x16), // lime
    Color::new(0xf4, 0x3f, 0x5e), // rose
    Color::new(0x0e, 0xa5, 0xe9), // sky
];

/// Color for the community at `index`, cycling every 12 communities.
#[must_use]
pub fn community_color(index: usize) -> Color {
    COMMUNITY_PALETTE[index % COMMUNITY_PALETTE.len()]
}

/// Builder-assigned color for a node kind.
///
/// A symbol node with a community membership takes `community_color`
/// instead; this table is the fallback for everything else.
#[must_use]
pub fn node_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Folder => Color::new(0x8a, 0x91, 0x9e),
        NodeKind::File => Color::new(0x9c, 0xa3, 0xaf),
        NodeKind::Package => Color::new(0xa7, 0x8b, 0xfa),
        NodeKind::Module => Color::new(0x7d, 0xd3, 0xfc),
        NodeKind::Namespace => Color::new(0x93, 0xc5, 0xfd),
        NodeKind::Function => Color::new(0x60, 0xa5, 0xfa),
        NodeKind::Method => Color::new(0x38, 0xbd, 0xf8),
        NodeKind::Class => Color::new(0xf5, 0x9e, 0x0b),
        NodeKind::Interface => Color::new(0x2d, 0xd4, 0xbf),
        NodeKind::Struct => Color::new(0xfb, 0x92, 0x3c),
        NodeKind::Trait => Color::new(0x34, 0xd3, 0x99),
        NodeKind::Enum => Color::new(0xf4, 0x72, 0xb6),
        NodeKind::Record => Color::new(0xe8, 0x79, 0xf9),
        NodeKind::Delegate => Color::new(0xc0, 0x84, 0xfc),
        NodeKind::Variable => Color::new(0x94, 0xa3, 0xb8),
        NodeKind::Community => Color::new(0xfa, 0xcc, 0x15),
        NodeKind::Process => Color::new(0xfb, 0x71, 0x85),
        NodeKind::Unknown => Color::new(0x6b, 0x72, 0x80),
    }
}

/// Base (unscaled) render size for a node kind.
#[must_use]
pub fn base_size(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Package => 16.0,
        NodeKind::Folder => 14.0,
        NodeKind::Module | NodeKind::Namespace => 13.0,
        NodeKind::Community => 12.0,
        NodeKind::Process => 11.0,
        NodeKind::File => 10.0,
        NodeKind::Class | NodeKind::Struct => 9.0,
        NodeKind::Interface | NodeKind::Trait => 8.5,
        NodeKind::Enum | NodeKind::Record => 8.0,
        NodeKind::Delegate => 7.0,
        NodeKind::Function => 6.0,
        NodeKind::Method => 5.0,
        NodeKind::Variable => 4.0,
        NodeKind::Unknown => 5.0,
    }
}

/// Density-aware scale factor: shrink everything as the graph grows so a
/// large graph stays legible and cheap to paint.
///
/// Non-increasing in `node_count`; applied uniformly to every node after
/// placement.
#[must_use]
pub fn density_scale(node_count: usize) -> f32 {
    if node_count < 1_000 {
        1.0
    } else if node_count < 5_000 {
        0.8
    } else if node_count < 20_000 {
        0.65
    } else if node_count < 50_000 {
        0.5
    } else {
        0.4
    }
}

/// Builder-assigned style for an edge kind: `(color, width)`.
#[must_use]
pub fn edge_style(kind: EdgeKind) -> (Color, f32) {
    match kind {
        EdgeKind::Contains => (Color::new(0x3f, 0x44, 0x51), 0.6),
        EdgeKind::Defines => (Color::new(0x4b, 0x52, 0x63), 0.7),
        EdgeKind::Imports => (Color::new(0x64, 0x74, 0x8b), 0.8),
        EdgeKind::Calls => (Color::new(0x3b, 0x82, 0xf6), 1.0),
        EdgeKind::Extends => (Color::new(0x8b, 0x5c, 0xf6), 1.1),
        EdgeKind::Implements => (Color::new(0x14, 0xb8, 0xa6), 1.0),
        EdgeKind::MemberOf => (Color::new(0x2f, 0x34, 0x41), 0.5),
        EdgeKind::StepInProcess => (Color::new(0xd9, 0x77, 0x06), 1.2),
        EdgeKind::Uses => (Color::new(0x06, 0xb6, 0xd4), 0.9),
        EdgeKind::Overrides => (Color::new(0xec, 0x48, 0x99), 1.0),
        EdgeKind::Decorates => (Color::new(0x84, 0xcc, 0x16), 0.9),
    }
}
