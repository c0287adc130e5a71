//! Interactive move/resize sessions and keyboard nudging.

use crate::constraints::{ConstraintResult, Constraints, ResizeMode};
use crate::editor::Presentation;
use crate::element::ElementId;
use crate::geometry::Frame;
use crate::snap::{SnapLine, compute_reference_lines};
use kurbo::{Size, Vec2};

/// State of an in-progress drag or resize of the current element.
///
/// Intermediate frames live only here; the history sees a single commit
/// from [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct Gesture {
    /// The element being manipulated.
    element_id: ElementId,
    mode: ResizeMode,
    /// Frame at gesture start.
    original: Frame,
    constraints: Constraints,
    /// Guides from the canvas and siblings, fixed for the whole gesture.
    reference_lines: Vec<SnapLine>,
    /// History revision the gesture was started from.
    revision: u64,
    solved: Option<ConstraintResult>,
}

impl Gesture {
    /// Start manipulating the current element.
    ///
    /// `frames` are the rendered frames of the current slide's elements in
    /// paint order (text boxes may have no stored size). Returns `None` when
    /// nothing is selected or `frames` does not cover the selection.
    pub fn begin(presentation: &Presentation, mode: ResizeMode, frames: &[Frame], canvas: Size) -> Option<Self> {
        let snapshot = presentation.snapshot();
        let index = snapshot.current_element_index?;
        let element = snapshot.current_element()?;
        let original = *frames.get(index)?;

        let siblings: Vec<Frame> = frames
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, frame)| *frame)
            .collect();
        let config = presentation.config();
        let constraints =
            Constraints::new(canvas, element.min_size(config)).with_tolerance(config.snap_tolerance);

        log::debug!("Begin {:?} gesture on element {}", mode, element.id);
        Some(Self {
            element_id: element.id.clone(),
            mode,
            original,
            constraints,
            reference_lines: compute_reference_lines(canvas, &siblings),
            revision: presentation.history().revision(),
            solved: None,
        })
    }

    /// Solve the frame for the pointer having moved `delta` since the start.
    pub fn update(&mut self, delta: Vec2, lock_aspect_ratio: bool) -> &ConstraintResult {
        let candidate = self.mode.apply_delta(self.original, delta);
        let result = self.constraints.solve(
            self.original,
            candidate,
            self.mode,
            &self.reference_lines,
            lock_aspect_ratio,
        );
        self.solved.insert(result)
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    pub fn original_frame(&self) -> Frame {
        self.original
    }

    /// The frame to display: the last solve, or the original before any update.
    pub fn current_frame(&self) -> Frame {
        self.solved.as_ref().map_or(self.original, |solved| solved.rect)
    }

    /// Guides to highlight.
    pub fn active_lines(&self) -> &[SnapLine] {
        match &self.solved {
            Some(solved) => &solved.active_lines,
            None => &[],
        }
    }

    pub fn reference_lines(&self) -> &[SnapLine] {
        &self.reference_lines
    }

    /// Commit the last solved frame.
    ///
    /// Returns false if there was no update, or the history moved since the
    /// gesture began (the gesture is then discarded).
    pub fn finish(self, presentation: &mut Presentation) -> bool {
        let Some(solved) = self.solved else {
            log::debug!("Gesture on element {} ended without movement", self.element_id);
            return false;
        };
        if presentation.history().revision() != self.revision {
            log::warn!("Discarding stale gesture on element {}", self.element_id);
            return false;
        }
        log::debug!("Finish {:?} gesture at {:?}", self.mode, solved.rect);
        presentation.set_element_frame(solved.rect, self.mode)
    }

    /// Abandon the gesture without touching the history.
    pub fn cancel(self) {
        log::debug!("Cancelled gesture on element {}", self.element_id);
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Unit vector in slide coordinates (y grows downwards).
    pub fn unit(self) -> Vec2 {
        match self {
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
            NudgeDirection::Up => Vec2::new(0.0, -1.0),
            NudgeDirection::Down => Vec2::new(0.0, 1.0),
        }
    }
}

/// Move the current element one step and commit it.
///
/// Guides only activate on exact alignment, so repeated presses never stick
/// to a nearby line. Returns the guides to highlight, or `None` when nothing
/// was committed.
pub fn nudge(
    presentation: &mut Presentation,
    direction: NudgeDirection,
    large: bool,
    frames: &[Frame],
    canvas: Size,
) -> Option<Vec<SnapLine>> {
    let step = if large {
        presentation.config().nudge_step_large
    } else {
        presentation.config().nudge_step
    };

    let mut gesture = Gesture::begin(presentation, ResizeMode::Move, frames, canvas)?;
    gesture.constraints = gesture.constraints.with_tolerance(0.0);
    let active_lines = gesture.update(direction.unit() * step, false).active_lines.clone();
    gesture.finish(presentation).then_some(active_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementContent, ElementStyle};

    const CANVAS: Size = Size::new(1000.0, 700.0);

    fn setup() -> (Presentation, Vec<Frame>) {
        let mut presentation = Presentation::new();
        let sibling = ElementStyle::at(100.0, 400.0, 40.0, 40.0);
        let moving = ElementStyle::at(100.0, 100.0, 200.0, 50.0);
        presentation.drop_element(ElementContent::image("a.png"), sibling.clone());
        presentation.drop_element(ElementContent::image("b.png"), moving.clone());
        let frames = vec![sibling.frame().unwrap(), moving.frame().unwrap()];
        (presentation, frames)
    }

    #[test]
    fn test_begin_requires_selection() {
        let (mut presentation, frames) = setup();
        presentation.select_element(None);
        assert!(Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).is_none());
    }

    #[test]
    fn test_reference_lines_exclude_current_element() {
        let (presentation, frames) = setup();
        let gesture = Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).unwrap();
        assert_eq!(Some(gesture.element_id()), presentation.current_element().map(|e| &e.id));
        assert_eq!(gesture.mode(), ResizeMode::Move);
        assert_eq!(gesture.original_frame(), frames[1]);
        assert_eq!(gesture.reference_lines().len(), 12);
        assert!(gesture.reference_lines().contains(&SnapLine::vertical(120.0)));
        assert!(!gesture.reference_lines().contains(&SnapLine::vertical(300.0)));
    }

    #[test]
    fn test_move_snaps_and_commits_once() {
        let (mut presentation, frames) = setup();
        let len = presentation.history().len();
        let mut gesture = Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).unwrap();

        gesture.update(Vec2::new(30.0, 0.0), false);
        gesture.update(Vec2::new(10.0, 0.0), false);
        let result = gesture.update(Vec2::new(2.0, 0.0), false).clone();
        assert_eq!(result.rect.left, 100.0);
        assert_eq!(result.active_lines, vec![SnapLine::vertical(100.0)]);
        assert_eq!(presentation.history().len(), len);

        assert!(gesture.finish(&mut presentation));
        assert_eq!(presentation.history().len(), len + 1);
        let style = &presentation.current_element().unwrap().style;
        assert_eq!((style.left, style.top), (100.0, 100.0));
    }

    #[test]
    fn test_resize_commits_size() {
        let (mut presentation, frames) = setup();
        let mut gesture = Gesture::begin(&presentation, ResizeMode::Left, &frames, CANVAS).unwrap();
        gesture.update(Vec2::new(500.0, 0.0), false);
        assert!(gesture.finish(&mut presentation));
        let frame = presentation.current_element().unwrap().style.frame().unwrap();
        assert_eq!(frame.width, presentation.config().min_media_size.width);
        assert_eq!(frame.right(), 300.0);
        assert_eq!(frame.height, 50.0);
    }

    #[test]
    fn test_cancel_and_idle_finish_leave_history() {
        let (mut presentation, frames) = setup();
        let len = presentation.history().len();

        let mut gesture = Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).unwrap();
        gesture.update(Vec2::new(250.0, 200.0), false);
        assert_eq!(gesture.current_frame().left, 350.0);
        gesture.cancel();
        assert_eq!(presentation.history().len(), len);

        let gesture = Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).unwrap();
        assert_eq!(gesture.current_frame(), frames[1]);
        assert!(gesture.active_lines().is_empty());
        assert!(!gesture.finish(&mut presentation));
        assert_eq!(presentation.history().len(), len);
    }

    #[test]
    fn test_stale_gesture_is_discarded() {
        let (mut presentation, frames) = setup();
        let mut gesture = Gesture::begin(&presentation, ResizeMode::Move, &frames, CANVAS).unwrap();
        gesture.update(Vec2::new(50.0, 0.0), false);

        presentation.undo();
        let len = presentation.history().len();
        let index = presentation.history().index();
        assert!(!gesture.finish(&mut presentation));
        assert_eq!(presentation.history().len(), len);
        assert_eq!(presentation.history().index(), index);
    }

    #[test]
    fn test_nudge_moves_one_step_per_press() {
        let (mut presentation, mut frames) = setup();
        let len = presentation.history().len();

        // 1 unit from the sibling's left edge: no snap pull.
        frames[1] = Frame::new(101.0, 100.0, 200.0, 50.0);
        let lines = nudge(&mut presentation, NudgeDirection::Right, false, &frames, CANVAS).unwrap();
        assert_eq!(presentation.current_element().unwrap().style.left, 102.0);
        assert!(lines.is_empty());

        frames[1] = Frame::new(102.0, 100.0, 200.0, 50.0);
        nudge(&mut presentation, NudgeDirection::Up, true, &frames, CANVAS).unwrap();
        let style = &presentation.current_element().unwrap().style;
        assert_eq!((style.left, style.top), (102.0, 90.0));
        assert_eq!(presentation.history().len(), len + 2);
    }

    #[test]
    fn test_nudge_reports_exact_alignment() {
        let (mut presentation, mut frames) = setup();
        frames[1] = Frame::new(101.0, 100.0, 200.0, 50.0);
        let lines = nudge(&mut presentation, NudgeDirection::Left, false, &frames, CANVAS).unwrap();
        assert_eq!(lines, vec![SnapLine::vertical(100.0)]);
    }

    #[test]
    fn test_nudge_without_selection() {
        let (mut presentation, frames) = setup();
        presentation.select_element(None);
        assert!(nudge(&mut presentation, NudgeDirection::Down, false, &frames, CANVAS).is_none());
    }
}
