//! Canvas zoom and pan geometry.
//!
//! A canvas point `c` appears on screen at `c * zoom + pan`. Zoom is always
//! kept inside the configured limits; pan is unbounded.

use seating_types::{Position, Table};

use crate::config::ViewportConfig;

/// Width and height of the visible area, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The centre point of an area of this size anchored at the origin.
    pub fn center(self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Position,
    /// Bottom-right corner.
    pub max: Position,
}

impl Bounds {
    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Zoom factor and pan offset of the seating canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Position,
    limits: ViewportConfig,
}

impl Viewport {
    /// A viewport at 100% with no pan.
    pub const fn new(limits: ViewportConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Position::ORIGIN,
            limits,
        }
    }

    /// Current zoom factor.
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset, in screen pixels.
    pub const fn pan(&self) -> Position {
        self.pan
    }

    /// Clamp a zoom factor into the configured range.
    ///
    /// A misconfigured range (min above max) is read with its ends swapped.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let lo = self.limits.min_zoom.min(self.limits.max_zoom);
        let hi = self.limits.min_zoom.max(self.limits.max_zoom);
        zoom.max(lo).min(hi)
    }

    /// Change zoom by `delta`, keeping the canvas point under `focal` fixed.
    ///
    /// Returns `false` when the clamped zoom equals the current one.
    pub fn zoom_at(&mut self, focal: Position, delta: f64) -> bool {
        let next = self.clamp_zoom(self.zoom + delta);
        if (next - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let anchor = self.screen_to_canvas(focal);
        self.zoom = next;
        self.pan = Position::new(
            anchor.x.mul_add(-next, focal.x),
            anchor.y.mul_add(-next, focal.y),
        );
        true
    }

    /// Zoom in one step around `center`.
    pub fn zoom_in(&mut self, center: Position) -> bool {
        self.zoom_at(center, self.limits.zoom_step)
    }

    /// Zoom out one step around `center`.
    pub fn zoom_out(&mut self, center: Position) -> bool {
        self.zoom_at(center, -self.limits.zoom_step)
    }

    /// Back to 100% with no pan.
    pub const fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Position::ORIGIN;
    }

    /// Clear the pan offset, keeping the zoom.
    pub const fn reset_pan(&mut self) {
        self.pan = Position::ORIGIN;
    }

    /// Shift the view by `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Position) {
        self.pan = self.pan.offset(delta);
    }

    /// Map a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, point: Position) -> Position {
        Position::new(
            (point.x - self.pan.x) / self.zoom,
            (point.y - self.pan.y) / self.zoom,
        )
    }

    /// Map a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, point: Position) -> Position {
        Position::new(
            point.x.mul_add(self.zoom, self.pan.x),
            point.y.mul_add(self.zoom, self.pan.y),
        )
    }

    /// Smallest rectangle covering every table plus its radius and padding.
    ///
    /// Returns `None` when there are no tables.
    pub fn bounding_box(&self, tables: &[Table]) -> Option<Bounds> {
        let margin = self.limits.table_radius + self.limits.fit_padding;
        tables.iter().fold(None, |acc: Option<Bounds>, table| {
            let p = table.position;
            let min = Position::new(p.x - margin, p.y - margin);
            let max = Position::new(p.x + margin, p.y + margin);
            Some(match acc {
                None => Bounds { min, max },
                Some(b) => Bounds {
                    min: Position::new(b.min.x.min(min.x), b.min.y.min(min.y)),
                    max: Position::new(b.max.x.max(max.x), b.max.y.max(max.y)),
                },
            })
        })
    }

    /// Zoom and pan so every table is visible and centred.
    ///
    /// Returns `false` (and changes nothing) when there are no tables.
    pub fn fit_all(&mut self, tables: &[Table], viewport: Size) -> bool {
        let Some(bounds) = self.bounding_box(tables) else {
            return false;
        };
        let fit_x = fit_ratio(viewport.width, bounds.width());
        let fit_y = fit_ratio(viewport.height, bounds.height());
        let zoom = self.clamp_zoom(fit_x.min(fit_y) * self.limits.fit_margin);
        self.center_on(bounds.center(), zoom, viewport);
        true
    }

    /// Zoom to the focus level and centre `table`.
    pub fn focus_table(&mut self, table: &Table, viewport: Size) {
        let zoom = self.clamp_zoom(self.limits.focus_zoom);
        self.center_on(table.position, zoom, viewport);
    }

    fn center_on(&mut self, point: Position, zoom: f64, viewport: Size) {
        let middle = viewport.center();
        self.zoom = zoom;
        self.pan = Position::new(
            point.x.mul_add(-zoom, middle.x),
            point.y.mul_add(-zoom, middle.y),
        );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

/// Zoom that makes `extent` fill `available`; unbounded for a flat extent.
fn fit_ratio(available: f64, extent: f64) -> f64 {
    if extent > f64::EPSILON {
        available / extent
    } else {
        f64::INFINITY
    }
}
