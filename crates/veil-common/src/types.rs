use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-assigned identifier of an embeddable content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Handle returned by a host window for a tab-event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// A rectangle in logical window coordinates, possibly fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap to whole pixels. Every edge rounds half-up (toward +inf), so
    /// `10.5` becomes `11` and `-2.5` becomes `-2`. Negative sizes clamp to 0.
    pub fn snapped(&self) -> Bounds {
        Bounds {
            x: round_half_up(self.x) as i32,
            y: round_half_up(self.y) as i32,
            width: round_half_up(self.width).max(0.0) as u32,
            height: round_half_up(self.height).max(0.0) as u32,
        }
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Integer pixel bounds, the only form host windows accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        rect.snapped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapped_rounds_half_up() {
        let b = Rect::new(10.6, 20.4, 330.0, 470.0).snapped();
        assert_eq!(
            b,
            Bounds {
                x: 11,
                y: 20,
                width: 330,
                height: 470
            }
        );
    }

    #[test]
    fn snapped_halves_go_toward_positive_infinity() {
        let b = Rect::new(10.5, -2.5, 0.5, 1.49).snapped();
        assert_eq!(b.x, 11);
        assert_eq!(b.y, -2);
        assert_eq!(b.width, 1);
        assert_eq!(b.height, 1);
    }

    #[test]
    fn snapped_clamps_negative_sizes() {
        let b = Rect::new(0.0, 0.0, -40.0, -0.2).snapped();
        assert_eq!(b.width, 0);
        assert_eq!(b.height, 0);
    }

    #[test]
    fn rect_serialization() {
        let r = Rect::new(100.0, 50.0, 330.0, 470.0);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn id_display() {
        assert_eq!(SurfaceId(4).to_string(), "4");
        assert_eq!(TabId(2).to_string(), "tab-2");
        assert_eq!(WindowId(1).to_string(), "window-1");
    }

    #[test]
    fn surface_id_orders_numerically() {
        let mut ids = vec![SurfaceId(3), SurfaceId(1), SurfaceId(2)];
        ids.sort();
        assert_eq!(ids, vec![SurfaceId(1), SurfaceId(2), SurfaceId(3)]);
    }
}
