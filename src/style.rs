//! Fixed visual legend for the sky plot.
//!
//! Shape and color are keyed on constellation only and are not user
//! configurable. Fix usage changes the paint style, never the shape.

use serde::{Deserialize, Serialize};

use crate::satellite::Constellation;

// ---------- Colors ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Packed `0xAARRGGBB`, the layout host canvases take.
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
pub const GRAY: Rgba = Rgba::rgb(0x88, 0x88, 0x88);
pub const GREEN: Rgba = Rgba::rgb(0x00, 0xFF, 0x00);
pub const BLUE: Rgba = Rgba::rgb(0x00, 0x00, 0xFF);
pub const RED: Rgba = Rgba::rgb(0xFF, 0x00, 0x00);
pub const MAGENTA: Rgba = Rgba::rgb(0xFF, 0x00, 0xFF);
pub const CYAN: Rgba = Rgba::rgb(0x00, 0xFF, 0xFF);

pub const SKY_COLOR: Rgba = BLACK;
pub const GRID_COLOR: Rgba = GRAY.with_alpha(100);
pub const TEXT_COLOR: Rgba = WHITE;
pub const DEFAULT_HORIZON_COLOR: Rgba = GREEN;

// ---------- Strokes & text ----------

pub const HORIZON_STROKE: f32 = 2.0;
pub const GRID_STROKE: f32 = 1.0;
pub const IN_FIX_STROKE: f32 = 1.0;
pub const NOT_IN_FIX_STROKE: f32 = 2.0;
pub const TEXT_SIZE: f32 = 20.0;

/// Offset of a satellite's id label from the marker center (down and right).
pub const SATELLITE_LABEL_OFFSET: (f32, f32) = (15.0, 15.0);

// ---------- Markers ----------

/// Marker geometry relative to the projected satellite position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerShape {
    Circle { radius: f32 },
    Rect { half_width: f32, half_height: f32 },
    /// Square turned about its own center.
    RotatedSquare { half_extent: f32, rotation_degrees: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub color: Rgba,
}

const GPS_MARKER: MarkerStyle = MarkerStyle {
    shape: MarkerShape::Circle { radius: 12.0 },
    color: BLUE,
};
const GLONASS_MARKER: MarkerStyle = MarkerStyle {
    shape: MarkerShape::Rect { half_width: 10.0, half_height: 10.0 },
    color: RED,
};
const BEIDOU_MARKER: MarkerStyle = MarkerStyle {
    shape: MarkerShape::Rect { half_width: 12.0, half_height: 8.0 },
    color: MAGENTA,
};
const GALILEO_MARKER: MarkerStyle = MarkerStyle {
    shape: MarkerShape::RotatedSquare { half_extent: 10.0, rotation_degrees: 45.0 },
    color: CYAN,
};
const OTHER_MARKER: MarkerStyle = MarkerStyle {
    shape: MarkerShape::Circle { radius: 10.0 },
    color: WHITE,
};

pub fn marker_style(constellation: Constellation) -> MarkerStyle {
    match constellation {
        Constellation::Gps => GPS_MARKER,
        Constellation::Glonass => GLONASS_MARKER,
        Constellation::Beidou => BEIDOU_MARKER,
        Constellation::Galileo => GALILEO_MARKER,
        Constellation::Other => OTHER_MARKER,
    }
}
