//! Bounding boxes, capture regions and coordinate-space mapping.
//!
//! OCR backends may run on a cropped and rescaled copy of the screen, so the
//! boxes they report live in that processed image space. [`map_to_absolute`]
//! brings them back to absolute screen pixels.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LocateError;

/// Axis-aligned box as `(x, y, width, height)` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from left/top/right/bottom edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Center point. Actuation layers derive their click position from this.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Center shifted by an offset.
    pub fn offset_center(&self, dx: i32, dy: i32) -> (i32, i32) {
        let (cx, cy) = self.center();
        (cx + dx, cy + dy)
    }
}

/// Rectangular sub-area of the screen constraining capture and matching.
///
/// `padding` grows the captured area on every side without changing the
/// nominal region, which helps when a menu label sits right on the region
/// border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub padding: i32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            padding: 0,
        }
    }

    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// Reject empty or inverted regions before any capture happens.
    pub fn validate(&self) -> Result<(), LocateError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LocateError::InvalidRegion {
                width: self.width,
                height: self.height,
            });
        }
        if self.padding < 0 {
            return Err(LocateError::NegativePadding(self.padding));
        }
        Ok(())
    }

    /// The area the capture collaborator is asked to grab: the region grown
    /// by its padding on every side.
    pub fn capture_bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.left - self.padding,
            self.top - self.padding,
            self.width + 2 * self.padding,
            self.height + 2 * self.padding,
        )
    }
}

/// Map a box found in a processed (cropped, rescaled) capture back to
/// absolute screen coordinates.
///
/// `scale_x`/`scale_y` describe how much the capture was enlarged before
/// recognition; a factor of 2 means the processed image is twice the
/// captured size, so coordinates are divided by it. When a region was
/// supplied its capture origin is added afterwards; otherwise coordinates
/// are treated as already screen-relative. A non-positive scale factor is
/// replaced by a neutral 1.0 - recoverable, never fatal.
pub fn map_to_absolute(
    bbox: BoundingBox,
    region: Option<&Region>,
    scale_x: f32,
    scale_y: f32,
) -> BoundingBox {
    let sx = sanitize_scale(scale_x, "x");
    let sy = sanitize_scale(scale_y, "y");

    let (dx, dy) = match region {
        Some(r) => {
            let bounds = r.capture_bounds();
            (bounds.x, bounds.y)
        }
        None => (0, 0),
    };

    BoundingBox::new(
        (bbox.x as f32 / sx).round() as i32 + dx,
        (bbox.y as f32 / sy).round() as i32 + dy,
        (bbox.width as f32 / sx).round() as i32,
        (bbox.height as f32 / sy).round() as i32,
    )
}

fn sanitize_scale(scale: f32, axis: &str) -> f32 {
    if scale > 0.0 {
        scale
    } else {
        warn!(axis, scale, "degenerate scale factor, substituting 1.0");
        1.0
    }
}
