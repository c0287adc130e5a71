//! Alignment guides and the nearest-guide search used for snapping.

use crate::geometry::Frame;
use kurbo::Size;
use serde::{Deserialize, Serialize};

pub use crate::config::SNAP_TOLERANCE;

/// Direction of an alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// A line of constant x.
    Vertical,
    /// A line of constant y.
    Horizontal,
}

/// An alignment guide derived from the canvas or a sibling element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapLine {
    /// x for vertical lines, y for horizontal lines.
    pub position: f64,
    pub orientation: Orientation,
}

impl SnapLine {
    pub const fn vertical(x: f64) -> Self {
        Self {
            position: x,
            orientation: Orientation::Vertical,
        }
    }

    pub const fn horizontal(y: f64) -> Self {
        Self {
            position: y,
            orientation: Orientation::Horizontal,
        }
    }
}

/// Which part of a rectangle lines up with a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Left or top edge.
    Start,
    /// Horizontal or vertical centre.
    Center,
    /// Right or bottom edge.
    End,
}

/// A point on one axis of a moving rectangle that may snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub position: f64,
}

impl Anchor {
    pub const fn new(kind: AnchorKind, position: f64) -> Self {
        Self { kind, position }
    }
}

/// The guide an anchor snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMatch {
    pub line: SnapLine,
    pub anchor: AnchorKind,
    /// Signed distance from the anchor to the line (`line - anchor`).
    pub offset: f64,
}

impl SnapMatch {
    pub fn distance(&self) -> f64 {
        self.offset.abs()
    }
}

/// Anchors of `frame` on the axis the given guides measure.
pub fn frame_anchors(frame: &Frame, orientation: Orientation) -> [Anchor; 3] {
    match orientation {
        Orientation::Vertical => [
            Anchor::new(AnchorKind::Start, frame.left),
            Anchor::new(AnchorKind::Center, frame.center_x()),
            Anchor::new(AnchorKind::End, frame.right()),
        ],
        Orientation::Horizontal => [
            Anchor::new(AnchorKind::Start, frame.top),
            Anchor::new(AnchorKind::Center, frame.center_y()),
            Anchor::new(AnchorKind::End, frame.bottom()),
        ],
    }
}

/// Guides for a rectangle: left, centre, right, then top, centre, bottom.
pub fn frame_snap_lines(frame: &Frame) -> [SnapLine; 6] {
    [
        SnapLine::vertical(frame.left),
        SnapLine::vertical(frame.center_x()),
        SnapLine::vertical(frame.right()),
        SnapLine::horizontal(frame.top),
        SnapLine::horizontal(frame.center_y()),
        SnapLine::horizontal(frame.bottom()),
    ]
}

/// Collect the guides for one gesture: canvas edges and centre lines first,
/// then each sibling's edges and centres in document order.
///
/// `siblings` must not include the element being manipulated.
pub fn compute_reference_lines(canvas: Size, siblings: &[Frame]) -> Vec<SnapLine> {
    let mut lines = Vec::with_capacity(6 * (siblings.len() + 1));
    lines.extend(frame_snap_lines(&Frame::from_canvas(canvas)));
    for sibling in siblings {
        lines.extend(frame_snap_lines(sibling));
    }
    lines
}

/// Find the closest guide of `orientation` to any of `anchors`.
///
/// Only matches within `tolerance` (inclusive) that pass `accept` qualify.
/// On equal distance the first guide in `lines` wins, then the first anchor.
pub fn closest_snap(
    lines: &[SnapLine],
    orientation: Orientation,
    anchors: &[Anchor],
    tolerance: f64,
    accept: impl Fn(&SnapMatch) -> bool,
) -> Option<SnapMatch> {
    let mut best: Option<SnapMatch> = None;

    for line in lines.iter().filter(|line| line.orientation == orientation) {
        for anchor in anchors {
            let candidate = SnapMatch {
                line: *line,
                anchor: anchor.kind,
                offset: line.position - anchor.position,
            };
            if candidate.distance() > tolerance {
                continue;
            }
            if best.is_some_and(|b| b.distance() <= candidate.distance()) {
                continue;
            }
            if accept(&candidate) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// Check whether `line` passes exactly through one of the frame's anchors.
pub fn is_aligned(line: &SnapLine, frame: &Frame) -> bool {
    const EPSILON: f64 = 1e-9;
    frame_anchors(frame, line.orientation)
        .iter()
        .any(|anchor| (anchor.position - line.position).abs() <= EPSILON * line.position.abs().max(1.0))
}
