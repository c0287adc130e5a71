//! Move/resize correction: minimum size, snapping, aspect-ratio lock and
//! canvas clamping.
//!
//! Every solve applies, in order:
//!
//! 1. the minimum-size floor (resize only),
//! 2. the snap search on the axes the gesture moves,
//! 3. the aspect-ratio lock (resize only, when requested),
//! 4. the canvas clamp.
//!
//! The solver is stateless and never fails; non-finite input is not checked.

use crate::config::SNAP_TOLERANCE;
use crate::geometry::Frame;
use crate::snap::{Anchor, AnchorKind, Orientation, SnapLine, SnapMatch, closest_snap, is_aligned};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};

/// What the pointer is dragging: the whole element or one of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResizeMode {
    Move,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which edge of an axis a resize handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Left or top.
    Near,
    /// Right or bottom.
    Far,
}

/// How one axis of the rectangle changes under a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Translate,
    Resize(Side),
    Fixed,
}

impl ResizeMode {
    pub fn is_move(self) -> bool {
        self == ResizeMode::Move
    }

    fn horizontal(self) -> Motion {
        match self {
            ResizeMode::Move => Motion::Translate,
            ResizeMode::Left | ResizeMode::TopLeft | ResizeMode::BottomLeft => Motion::Resize(Side::Near),
            ResizeMode::Right | ResizeMode::TopRight | ResizeMode::BottomRight => Motion::Resize(Side::Far),
            ResizeMode::Top | ResizeMode::Bottom => Motion::Fixed,
        }
    }

    fn vertical(self) -> Motion {
        match self {
            ResizeMode::Move => Motion::Translate,
            ResizeMode::Top | ResizeMode::TopLeft | ResizeMode::TopRight => Motion::Resize(Side::Near),
            ResizeMode::Bottom | ResizeMode::BottomLeft | ResizeMode::BottomRight => Motion::Resize(Side::Far),
            ResizeMode::Left | ResizeMode::Right => Motion::Fixed,
        }
    }

    /// The naive rectangle after dragging by `delta`, before any correction.
    pub fn apply_delta(self, frame: Frame, delta: Vec2) -> Frame {
        let x = Span::horizontal(&frame).drag(self.horizontal(), delta.x);
        let y = Span::vertical(&frame).drag(self.vertical(), delta.y);
        Span::frame(x, y)
    }
}

/// One axis of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: f64,
    len: f64,
}

impl Span {
    fn horizontal(frame: &Frame) -> Self {
        Self {
            start: frame.left,
            len: frame.width,
        }
    }

    fn vertical(frame: &Frame) -> Self {
        Self {
            start: frame.top,
            len: frame.height,
        }
    }

    fn frame(x: Span, y: Span) -> Frame {
        Frame::new(x.start, y.start, x.len, y.len)
    }

    fn end(self) -> f64 {
        self.start + self.len
    }

    fn center(self) -> f64 {
        self.start + self.len / 2.0
    }

    fn drag(self, motion: Motion, delta: f64) -> Self {
        match motion {
            Motion::Translate => Self {
                start: self.start + delta,
                ..self
            },
            Motion::Resize(Side::Near) => Self {
                start: self.start + delta,
                len: self.len - delta,
            },
            Motion::Resize(Side::Far) => Self {
                len: self.len + delta,
                ..self
            },
            Motion::Fixed => self,
        }
    }

    /// Give the span a new length, keeping the edge opposite the dragged one in place.
    fn with_len(self, motion: Motion, len: f64) -> Self {
        match motion {
            Motion::Resize(Side::Near) => Self {
                start: self.end() - len,
                len,
            },
            Motion::Resize(Side::Far) | Motion::Translate | Motion::Fixed => Self {
                start: self.start,
                len,
            },
        }
    }

    /// Anchors whose position changes under `motion`.
    fn moving_anchors(self, motion: Motion) -> Vec<Anchor> {
        match motion {
            Motion::Translate => vec![
                Anchor::new(AnchorKind::Start, self.start),
                Anchor::new(AnchorKind::Center, self.center()),
                Anchor::new(AnchorKind::End, self.end()),
            ],
            Motion::Resize(Side::Near) => vec![
                Anchor::new(AnchorKind::Start, self.start),
                Anchor::new(AnchorKind::Center, self.center()),
            ],
            Motion::Resize(Side::Far) => vec![
                Anchor::new(AnchorKind::Center, self.center()),
                Anchor::new(AnchorKind::End, self.end()),
            ],
            Motion::Fixed => Vec::new(),
        }
    }

    /// Move the matched anchor exactly onto its guide.
    fn snapped(self, motion: Motion, found: &SnapMatch) -> Self {
        let d = found.offset;
        match (motion, found.anchor) {
            (Motion::Translate, _) => Self {
                start: self.start + d,
                ..self
            },
            (Motion::Resize(Side::Near), AnchorKind::Start) => Self {
                start: found.line.position,
                len: self.end() - found.line.position,
            },
            (Motion::Resize(Side::Far), AnchorKind::End) => Self {
                len: found.line.position - self.start,
                ..self
            },
            // With one edge pinned the centre moves half as far as the dragged edge.
            (Motion::Resize(Side::Near), _) => Self {
                start: self.start + 2.0 * d,
                len: self.len - 2.0 * d,
            },
            (Motion::Resize(Side::Far), _) => Self {
                len: self.len + 2.0 * d,
                ..self
            },
            (Motion::Fixed, _) => self,
        }
    }

    fn clamp_min(self, motion: Motion, min: f64) -> Self {
        match motion {
            Motion::Resize(_) if self.len < min => self.with_len(motion, min),
            _ => self,
        }
    }

    /// Room available for the span before the dragged edge leaves `[0, limit]`.
    fn room(self, motion: Motion, limit: f64) -> f64 {
        match motion {
            Motion::Resize(Side::Near) => self.end(),
            Motion::Resize(Side::Far) | Motion::Translate | Motion::Fixed => limit - self.start,
        }
    }

    /// Translate the span into `[0, limit]`; assumes `len <= limit`.
    fn shift_inside(self, limit: f64) -> Self {
        let max_start = (limit - self.len).max(0.0);
        Self {
            start: self.start.min(max_start).max(0.0),
            ..self
        }
    }
}

/// Output of a constraint solve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintResult {
    /// The corrected rectangle.
    pub rect: Frame,
    /// Guides the rectangle is snapped to: at most one per orientation.
    pub active_lines: Vec<SnapLine>,
}

impl ConstraintResult {
    /// The active guide of one orientation, if any.
    pub fn line(&self, orientation: Orientation) -> Option<SnapLine> {
        self.active_lines
            .iter()
            .copied()
            .find(|line| line.orientation == orientation)
    }
}

/// Fixed inputs of a gesture's constraint solves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Slide size; results never leave `[0, width] x [0, height]`.
    pub canvas: Size,
    /// Resize floor.
    pub min_size: Size,
    /// Snap distance (inclusive).
    pub tolerance: f64,
}

impl Constraints {
    pub fn new(canvas: Size, min_size: Size) -> Self {
        Self {
            canvas,
            min_size,
            tolerance: SNAP_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Correct `candidate` (the raw drag result of `original` under `mode`).
    pub fn solve(
        &self,
        original: Frame,
        candidate: Frame,
        mode: ResizeMode,
        reference_lines: &[SnapLine],
        lock_aspect_ratio: bool,
    ) -> ConstraintResult {
        let (x_motion, y_motion) = (mode.horizontal(), mode.vertical());

        // 1. Minimum size.
        let mut x = Span::horizontal(&candidate).clamp_min(x_motion, self.min_size.width);
        let mut y = Span::vertical(&candidate).clamp_min(y_motion, self.min_size.height);

        // 2. Snap, one guide per axis.
        let snap_x = self.snap_axis(x, x_motion, Orientation::Vertical, reference_lines, self.min_size.width);
        let snap_y = self.snap_axis(y, y_motion, Orientation::Horizontal, reference_lines, self.min_size.height);
        if let Some(found) = &snap_x {
            x = x.snapped(x_motion, found);
        }
        if let Some(found) = &snap_y {
            y = y.snapped(y_motion, found);
        }

        // 3. Aspect ratio.
        let ratio = if lock_aspect_ratio && !mode.is_move() {
            original.aspect_ratio()
        } else {
            None
        };
        if let Some(ratio) = ratio {
            (x, y) = self.lock_ratio(original, x, y, mode, ratio, snap_x.is_some(), snap_y.is_some());
        }

        // 4. Canvas.
        let rect = self.clamp_to_canvas(x, y, mode, ratio);

        let active_lines = [snap_x, snap_y]
            .into_iter()
            .flatten()
            .map(|found| found.line)
            .filter(|line| is_aligned(line, &rect))
            .collect();

        ConstraintResult { rect, active_lines }
    }

    fn snap_axis(
        &self,
        span: Span,
        motion: Motion,
        orientation: Orientation,
        lines: &[SnapLine],
        min: f64,
    ) -> Option<SnapMatch> {
        let anchors = span.moving_anchors(motion);
        if anchors.is_empty() {
            return None;
        }
        closest_snap(lines, orientation, &anchors, self.tolerance, |found| match motion {
            // A snap may not pull a resized edge through the size floor.
            Motion::Resize(_) => span.snapped(motion, found).len >= min,
            Motion::Translate | Motion::Fixed => true,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn lock_ratio(
        &self,
        original: Frame,
        x: Span,
        y: Span,
        mode: ResizeMode,
        ratio: f64,
        snapped_x: bool,
        snapped_y: bool,
    ) -> (Span, Span) {
        let (x_motion, y_motion) = (mode.horizontal(), mode.vertical());
        let width_drives = match (x_motion, y_motion) {
            (Motion::Resize(_), Motion::Fixed) => true,
            (Motion::Fixed, Motion::Resize(_)) => false,
            _ => match (snapped_x, snapped_y) {
                (true, false) => true,
                (false, true) => false,
                // Follow whichever dimension the pointer stretched more.
                _ => x.len / original.width >= y.len / original.height,
            },
        };

        let min = self.min_size;
        let (width, height) = if width_drives {
            let width = x.len.max(min.width).max(min.height * ratio);
            (width, width / ratio)
        } else {
            let height = y.len.max(min.height).max(min.width / ratio);
            (height * ratio, height)
        };

        (x.with_len(x_motion, width), y.with_len(y_motion, height))
    }

    fn clamp_to_canvas(&self, x: Span, y: Span, mode: ResizeMode, ratio: Option<f64>) -> Frame {
        let canvas = self.canvas;
        let (x_motion, y_motion) = (mode.horizontal(), mode.vertical());

        let (x, y) = if mode.is_move() {
            (
                Span { len: x.len.min(canvas.width), ..x },
                Span { len: y.len.min(canvas.height), ..y },
            )
        } else {
            // Pull the dragged edges back inside, but not below the floor
            // (the whole rectangle is shifted instead).
            let max_width = x.room(x_motion, canvas.width).max(self.min_size.width).min(canvas.width);
            let max_height = y.room(y_motion, canvas.height).max(self.min_size.height).min(canvas.height);

            let (width, height) = match ratio {
                Some(ratio) => {
                    // One factor for both dimensions: fit the dragged edges,
                    // never below the floor, never beyond the canvas.
                    let fit = (max_width / x.len).min(max_height / y.len).min(1.0);
                    let floor = (self.min_size.width / x.len).max(self.min_size.height / y.len);
                    let bound = (canvas.width / x.len).min(canvas.height / y.len);
                    let width = x.len * fit.max(floor).min(bound);
                    (width, width / ratio)
                }
                None => (x.len.min(max_width), y.len.min(max_height)),
            };
            (x.with_len(x_motion, width), y.with_len(y_motion, height))
        };

        Span::frame(x.shift_inside(canvas.width), y.shift_inside(canvas.height))
    }
}

/// Solve one move/resize frame with the default snap tolerance.
pub fn solve_constraint(
    original: Frame,
    candidate: Frame,
    mode: ResizeMode,
    reference_lines: &[SnapLine],
    lock_aspect_ratio: bool,
    canvas: Size,
    min_size: Size,
) -> ConstraintResult {
    Constraints::new(canvas, min_size).solve(original, candidate, mode, reference_lines, lock_aspect_ratio)
}
