// SPDX-License-Identifier: MPL-2.0
//! Where a toast goes on screen.
//!
//! Three position modes are supported: centered over a window (optionally
//! following the toast's measured size), absolute screen coordinates, and
//! next to an anchor node on a chosen side.

use iced_core::{Point, Rectangle, Size, Vector};

use crate::host::Host;

/// Display target passed to [`Toaster::request_show`](super::Toaster::request_show).
#[derive(Debug, Clone, PartialEq)]
pub enum Target<W, A> {
    /// Centered over a window, shifted by the toast's offset.
    Window(W),
    /// Top-left corner at absolute screen coordinates, owned by `window`.
    Screen { window: W, at: Point },
    /// Centered over the window the anchor belongs to. Always auto-centers.
    Anchor(A),
    /// Next to the anchor on `side`, shifted by `offset`. Never auto-centers.
    AnchorSide { anchor: A, side: Side, offset: Vector },
}

/// Side of an anchor node a toast is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A target resolved against the host: the owning window and how to place
/// the toast inside it.
#[derive(Debug, Clone)]
pub(crate) struct Resolved<W, A> {
    pub window: W,
    pub placement: Placement<A>,
}

#[derive(Debug, Clone)]
pub(crate) enum Placement<A> {
    /// Centered on the window; `follow` re-centers on every size change.
    Centered { offset: Vector, follow: bool },
    Fixed(Point),
    Beside { anchor: A, side: Side, offset: Vector },
}

impl<A> Placement<A> {
    pub fn follows_size(&self) -> bool {
        matches!(self, Placement::Centered { follow: true, .. })
    }
}

/// Top-left corner that centers a toast of `size` over `window`, plus `offset`.
#[must_use]
pub fn centered(window: Rectangle, size: Size, offset: Vector) -> Point {
    Point::new(
        window.x + window.width / 2.0 - size.width / 2.0 + offset.x,
        window.y + window.height / 2.0 - size.height / 2.0 + offset.y,
    )
}

/// Top-left corner that puts a toast of `size` against `side` of `anchor`,
/// centered along that side, plus `offset`.
#[must_use]
pub fn beside(anchor: Rectangle, size: Size, side: Side, offset: Vector) -> Point {
    let center_x = anchor.x + (anchor.width - size.width) / 2.0;
    let center_y = anchor.y + (anchor.height - size.height) / 2.0;
    let (x, y) = match side {
        Side::Top => (center_x, anchor.y - size.height),
        Side::Bottom => (center_x, anchor.y + anchor.height),
        Side::Left => (anchor.x - size.width, center_y),
        Side::Right => (anchor.x + anchor.width, center_y),
    };
    Point::new(x + offset.x, y + offset.y)
}

/// Resolves a target to its window and placement.
///
/// Returns a human-readable reason when the window or anchor is gone.
pub(crate) fn resolve<H: Host>(
    host: &H,
    target: &Target<H::Window, H::Anchor>,
    auto_center: bool,
    offset: Vector,
) -> Result<Resolved<H::Window, H::Anchor>, String> {
    let live = |window: H::Window| {
        if host.window_bounds(&window).is_some() {
            Ok(window)
        } else {
            Err(format!("window {window:?} is closed"))
        }
    };
    let anchor_window = |anchor: &H::Anchor| {
        host.anchor_window(anchor)
            .ok_or_else(|| format!("anchor {anchor:?} is not attached to a window"))
            .and_then(live)
    };

    match target {
        Target::Window(window) => Ok(Resolved {
            window: live(window.clone())?,
            placement: Placement::Centered {
                offset,
                follow: auto_center,
            },
        }),
        Target::Screen { window, at } => Ok(Resolved {
            window: live(window.clone())?,
            placement: Placement::Fixed(*at),
        }),
        Target::Anchor(anchor) => Ok(Resolved {
            window: anchor_window(anchor)?,
            placement: Placement::Centered {
                offset,
                follow: true,
            },
        }),
        Target::AnchorSide {
            anchor,
            side,
            offset,
        } => {
            let window = anchor_window(anchor)?;
            if host.anchor_bounds(anchor).is_none() {
                return Err(format!("anchor {anchor:?} has no screen bounds"));
            }
            Ok(Resolved {
                window,
                placement: Placement::Beside {
                    anchor: anchor.clone(),
                    side: *side,
                    offset: *offset,
                },
            })
        }
    }
}

/// Computes the toast's top-left corner for a resolved placement.
///
/// Returns `None` if the window or anchor disappeared since resolution.
pub(crate) fn position<H: Host>(
    host: &H,
    resolved: &Resolved<H::Window, H::Anchor>,
    size: Size,
) -> Option<Point> {
    match &resolved.placement {
        Placement::Centered { offset, .. } => host
            .window_bounds(&resolved.window)
            .map(|bounds| centered(bounds, size, *offset)),
        Placement::Fixed(at) => Some(*at),
        Placement::Beside {
            anchor,
            side,
            offset,
        } => host
            .anchor_bounds(anchor)
            .map(|bounds| beside(bounds, size, *side, *offset)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rectangle {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn centered_without_offset() {
        let at = centered(
            rect(100.0, 50.0, 800.0, 600.0),
            Size::new(200.0, 40.0),
            Vector::new(0.0, 0.0),
        );
        assert_abs_diff_eq!(at.x, 400.0);
        assert_abs_diff_eq!(at.y, 330.0);
    }

    #[test]
    fn centered_applies_offset() {
        let at = centered(
            rect(0.0, 0.0, 800.0, 600.0),
            Size::new(100.0, 100.0),
            Vector::new(10.0, -20.0),
        );
        assert_abs_diff_eq!(at.x, 360.0);
        assert_abs_diff_eq!(at.y, 230.0);
    }

    #[test]
    fn beside_each_side() {
        let anchor = rect(100.0, 100.0, 50.0, 20.0);
        let size = Size::new(30.0, 10.0);
        let none = Vector::new(0.0, 0.0);

        let top = beside(anchor, size, Side::Top, none);
        assert_abs_diff_eq!(top.x, 110.0);
        assert_abs_diff_eq!(top.y, 90.0);

        let bottom = beside(anchor, size, Side::Bottom, none);
        assert_abs_diff_eq!(bottom.x, 110.0);
        assert_abs_diff_eq!(bottom.y, 120.0);

        let left = beside(anchor, size, Side::Left, none);
        assert_abs_diff_eq!(left.x, 70.0);
        assert_abs_diff_eq!(left.y, 105.0);

        let right = beside(anchor, size, Side::Right, none);
        assert_abs_diff_eq!(right.x, 150.0);
        assert_abs_diff_eq!(right.y, 105.0);
    }

    #[test]
    fn beside_applies_offset() {
        let at = beside(
            rect(0.0, 0.0, 10.0, 10.0),
            Size::new(10.0, 10.0),
            Side::Bottom,
            Vector::new(5.0, 3.0),
        );
        assert_abs_diff_eq!(at.x, 5.0);
        assert_abs_diff_eq!(at.y, 13.0);
    }

    #[test]
    fn only_following_center_tracks_size() {
        let follow: Placement<()> = Placement::Centered {
            offset: Vector::new(0.0, 0.0),
            follow: true,
        };
        let once: Placement<()> = Placement::Centered {
            offset: Vector::new(0.0, 0.0),
            follow: false,
        };
        assert!(follow.follows_size());
        assert!(!once.follows_size());
        assert!(!Placement::<()>::Fixed(Point::new(1.0, 1.0)).follows_size());
    }
}
