//! Sky plot projection and scene construction.
//!
//! `render` is a pure function of viewport, satellites, settings and theme.
//! It returns a declarative list of draw primitives; the host owns the actual
//! drawing surface and supplies localized strings for the non-numeric labels.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::satellite::SatelliteRecord;
use crate::settings::FilterSettings;
use crate::style::{
    self, MarkerShape, Rgba, GRID_COLOR, GRID_STROKE, HORIZON_STROKE, IN_FIX_STROKE, NOT_IN_FIX_STROKE,
    SATELLITE_LABEL_OFFSET, SKY_COLOR, TEXT_COLOR, TEXT_SIZE,
};

pub const DEFAULT_PADDING: f32 = 40.0;

// Count overlays sit in the top-left corner, outside the polar projection.
const VISIBLE_COUNT_ANCHOR: (f32, f32) = (20.0, 40.0);
const USED_IN_FIX_COUNT_ANCHOR: (f32, f32) = (20.0, 70.0);

// ---------- Inputs ----------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Host-tunable appearance. Everything else in the legend is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyTheme {
    pub horizon_color: Rgba,
    pub padding: f32,
}

impl Default for SkyTheme {
    fn default() -> Self {
        Self {
            horizon_color: style::DEFAULT_HORIZON_COLOR,
            padding: DEFAULT_PADDING,
        }
    }
}

// ---------- Output ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintStyle {
    Fill,
    Stroke,
    FillAndStroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Rgba,
    pub style: PaintStyle,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    S,
    E,
    W,
}

/// What a text primitive says. Only satellite ids are literal; the host
/// localizes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TextContent {
    Cardinal(Cardinal),
    SatelliteId(i32),
    VisibleCount(u32),
    UsedInFixCount(u32),
}

impl TextContent {
    pub fn literal(&self) -> Option<String> {
        match self {
            TextContent::SatelliteId(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Circle { cx: f32, cy: f32, radius: f32, paint: Paint },
    /// A satellite marker centered on its projected position.
    Marker { x: f32, y: f32, shape: MarkerShape, paint: Paint },
    Text { x: f32, y: f32, content: TextContent, color: Rgba, size: f32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub visible_count: u32,
    pub used_in_fix_count: u32,
}

impl Scene {
    pub fn markers(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Marker { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = (f32, f32, TextContent)> + '_ {
        self.primitives.iter().filter_map(|p| match *p {
            Primitive::Text { x, y, content, .. } => Some((x, y, content)),
            _ => None,
        })
    }
}

// ---------- Geometry ----------

/// Center and horizon radius of the polar plot inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGeometry {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

impl SkyGeometry {
    /// Non-positive or non-finite sizes count as zero; the radius never goes negative.
    pub fn new(viewport: Viewport, padding: f32) -> Self {
        let width = extent(viewport.width);
        let height = extent(viewport.height);
        let radius = (width.min(height) / 2.0 - extent(padding)).max(0.0);
        Self { cx: width / 2.0, cy: height / 2.0, radius }
    }

    pub fn project(&self, elevation_degrees: f32, azimuth_degrees: f32) -> (f32, f32) {
        project(elevation_degrees, azimuth_degrees, (self.cx, self.cy), self.radius)
    }
}

fn extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Linear elevation mapping: zenith at the center, horizon on the outer ring.
pub fn radial_distance(elevation_degrees: f32, radius: f32) -> f32 {
    (90.0 - elevation_degrees) / 90.0 * radius
}

/// Polar to screen coordinates. Azimuth 0 points up (-y) and grows clockwise.
/// Below-horizon elevations land outside the horizon ring.
pub fn project(elevation_degrees: f32, azimuth_degrees: f32, center: (f32, f32), radius: f32) -> (f32, f32) {
    let r = radial_distance(elevation_degrees, radius);
    let a = azimuth_degrees.to_radians();
    (center.0 + r * a.sin(), center.1 - r * a.cos())
}

pub fn should_display(satellite: &SatelliteRecord, settings: &FilterSettings) -> bool {
    settings.should_display(satellite)
}

// ---------- Rendering ----------

pub fn render(width: f32, height: f32, satellites: &[SatelliteRecord], settings: &FilterSettings) -> Scene {
    render_with_theme(Viewport::new(width, height), satellites, settings, &SkyTheme::default())
}

pub fn render_with_theme(
    viewport: Viewport,
    satellites: &[SatelliteRecord],
    settings: &FilterSettings,
    theme: &SkyTheme,
) -> Scene {
    let geo = SkyGeometry::new(viewport, theme.padding);
    let mut scene = Scene::default();

    draw_background(&mut scene, &geo, theme);

    for sat in satellites {
        if !settings.should_display(sat) {
            continue;
        }
        scene.visible_count += 1;
        if sat.used_in_fix() {
            scene.used_in_fix_count += 1;
        }

        let (x, y) = geo.project(sat.elevation_degrees(), sat.azimuth_degrees());
        draw_satellite(&mut scene, x, y, sat);
    }

    scene.primitives.push(text(VISIBLE_COUNT_ANCHOR, TextContent::VisibleCount(scene.visible_count)));
    scene.primitives.push(text(USED_IN_FIX_COUNT_ANCHOR, TextContent::UsedInFixCount(scene.used_in_fix_count)));

    debug!(
        "[render] {}x{} r={:.1}: {} of {} satellites visible, {} used in fix",
        viewport.width, viewport.height, geo.radius, scene.visible_count, satellites.len(), scene.used_in_fix_count
    );
    scene
}

fn draw_background(scene: &mut Scene, geo: &SkyGeometry, theme: &SkyTheme) {
    let (cx, cy, radius) = (geo.cx, geo.cy, geo.radius);
    let grid = Paint { color: GRID_COLOR, style: PaintStyle::Stroke, stroke_width: GRID_STROKE };

    scene.primitives.extend([
        Primitive::Circle {
            cx,
            cy,
            radius,
            paint: Paint { color: SKY_COLOR, style: PaintStyle::Fill, stroke_width: 0.0 },
        },
        Primitive::Circle {
            cx,
            cy,
            radius,
            paint: Paint { color: theme.horizon_color, style: PaintStyle::Stroke, stroke_width: HORIZON_STROKE },
        },
        // 30 and 60 degree elevation rings
        Primitive::Circle { cx, cy, radius: radius * 2.0 / 3.0, paint: grid },
        Primitive::Circle { cx, cy, radius: radius / 3.0, paint: grid },
        text((cx - 10.0, cy - radius - 10.0), TextContent::Cardinal(Cardinal::N)),
        text((cx - 10.0, cy + radius + 30.0), TextContent::Cardinal(Cardinal::S)),
        text((cx + radius + 10.0, cy + 10.0), TextContent::Cardinal(Cardinal::E)),
        text((cx - radius - 30.0, cy + 10.0), TextContent::Cardinal(Cardinal::W)),
    ]);
}

fn draw_satellite(scene: &mut Scene, x: f32, y: f32, sat: &SatelliteRecord) {
    let marker = style::marker_style(sat.constellation());
    let paint = if sat.used_in_fix() {
        Paint { color: marker.color, style: PaintStyle::FillAndStroke, stroke_width: IN_FIX_STROKE }
    } else {
        Paint { color: marker.color, style: PaintStyle::Stroke, stroke_width: NOT_IN_FIX_STROKE }
    };

    scene.primitives.push(Primitive::Marker { x, y, shape: marker.shape, paint });
    scene.primitives.push(text(
        (x + SATELLITE_LABEL_OFFSET.0, y + SATELLITE_LABEL_OFFSET.1),
        TextContent::SatelliteId(sat.id()),
    ));
}

fn text((x, y): (f32, f32), content: TextContent) -> Primitive {
    Primitive::Text { x, y, content, color: TEXT_COLOR, size: TEXT_SIZE }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn radial_distance_is_linear_and_decreasing() {
        let radius = 160.0;
        assert_eq!(radial_distance(90.0, radius), 0.0);
        assert_eq!(radial_distance(0.0, radius), radius);
        let mut last = f32::INFINITY;
        for e in 0..=90 {
            let r = radial_distance(e as f32, radius);
            assert!(r < last, "r({e}) = {r} should be below {last}");
            last = r;
        }
    }

    #[test]
    fn north_is_up_and_azimuth_turns_clockwise() {
        let center = (200.0, 200.0);
        let (x, y) = project(0.0, 0.0, center, 100.0);
        assert!((x - 200.0).abs() < EPS);
        assert!((y - 100.0).abs() < EPS);

        let (x, y) = project(0.0, 90.0, center, 100.0);
        assert!((x - 300.0).abs() < EPS, "east is right, got {x}");
        assert!((y - 200.0).abs() < EPS);

        let (x, y) = project(0.0, 180.0, center, 100.0);
        assert!((x - 200.0).abs() < EPS);
        assert!((y - 300.0).abs() < EPS, "south is down, got {y}");

        let (x, _) = project(0.0, 270.0, center, 100.0);
        assert!((x - 100.0).abs() < EPS, "west is left, got {x}");
    }

    #[test]
    fn below_horizon_lands_outside_ring() {
        let (_, y) = project(-9.0, 0.0, (0.0, 0.0), 90.0);
        assert!((y + 99.0).abs() < EPS);
    }

    #[test]
    fn geometry_clamps_degenerate_viewports() {
        for (w, h) in [(0.0, 0.0), (-50.0, 300.0), (60.0, 60.0), (f32::NAN, 100.0)] {
            let geo = SkyGeometry::new(Viewport::new(w, h), DEFAULT_PADDING);
            assert!(geo.radius >= 0.0);
            assert!(geo.cx >= 0.0 && geo.cy >= 0.0);
        }
        let geo = SkyGeometry::new(Viewport::new(400.0, 300.0), DEFAULT_PADDING);
        assert_eq!(geo, SkyGeometry { cx: 200.0, cy: 150.0, radius: 110.0 });
    }

    #[test]
    fn odd_viewport_keeps_fractional_center() {
        let geo = SkyGeometry::new(Viewport::new(401.0, 401.0), DEFAULT_PADDING);
        assert_eq!(geo, SkyGeometry { cx: 200.5, cy: 200.5, radius: 160.5 });

        let (x, y) = geo.project(90.0, 0.0);
        assert_eq!((x, y), (200.5, 200.5));
    }

    #[test]
    fn satellite_label_text_is_its_id() {
        assert_eq!(TextContent::SatelliteId(5).literal().as_deref(), Some("5"));
        assert_eq!(TextContent::VisibleCount(5).literal(), None);
    }
}
