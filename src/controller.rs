//! Carousel state machine
//!
//! Owns the interaction mode, the focused index, and the transient drag
//! state. Raw pointer phases come in through `pointer_down` / `pointer_moved`
//! / `pointer_up` / `tick`, get interpreted into `CarouselAction`s, and every
//! state change flows through the single `apply` transition function. The
//! host queries `frame()` each redraw and, if it cares, subscribes to the
//! feedback channel for discrete transitions.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::constants::gesture;
use crate::geometry::{self, LayoutMetrics};
use crate::gesture::{DragState, GestureInterpreter, PageOutcome};
use crate::persistence::{OrderPersistence, PersistedLayout};
use crate::registry::SectionRegistry;
use crate::types::{CardGeometry, Section, Vec2};

/// Discrete transition broadcast on the feedback channel. The host decides
/// what (if anything) each one triggers; delivery content is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    EnterReorder,
    CommitReorder,
    PageChange,
}

/// Interaction mode. Reorder tracks which card, if any, is being dragged;
/// the continuous offset lives in the controller's drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Reorder { dragged_index: Option<usize> },
}

/// Domain-level actions consumed by [`CarouselController::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselAction {
    PagePrevious,
    PageNext,
    SnapBack,
    Select { index: usize },
    EnterReorder,
    ExitReorder,
    DragStart { index: usize },
    DragUpdate { delta: Vec2 },
    DragEnd,
}

pub struct CarouselController<S: OrderPersistence> {
    registry: SectionRegistry,
    store: S,
    interpreter: GestureInterpreter,
    metrics: LayoutMetrics,
    selected: usize,
    mode: Mode,
    /// Pointer tracking for the in-flight gesture, if any
    drag: Option<DragState>,
    /// Card the in-flight gesture started on
    pressed_index: Option<usize>,
    /// Accumulated horizontal Reorder drag offset, clamped to the slot row;
    /// the reorder row's y is fixed, so vertical drift is discarded
    reorder_offset: f32,
    /// Live Browse paging offset fed into the geometry
    browse_offset: f32,
    feedback: Vec<Sender<Feedback>>,
}

impl<S: OrderPersistence> CarouselController<S> {
    /// Build the session controller: merge the persisted order into the
    /// default set and restore focus. A first launch (or a corrupt store)
    /// starts focused on the first card; later launches restore and clamp.
    pub fn new(defaults: Vec<Section>, store: S, metrics: LayoutMetrics) -> Self {
        let persisted = store.load();
        let (registry, selected) = match persisted {
            Some(layout) => {
                let registry = SectionRegistry::load(defaults, Some(&layout.section_order));
                let selected = if layout.has_launched {
                    layout.focused_index.min(registry.len().saturating_sub(1))
                } else {
                    0
                };
                (registry, selected)
            }
            None => (SectionRegistry::load(defaults, None), 0),
        };
        info!(
            sections = registry.len(),
            focused = selected,
            "Carousel session started"
        );

        Self {
            registry,
            store,
            interpreter: GestureInterpreter::default(),
            metrics,
            selected,
            mode: Mode::Browse,
            drag: None,
            pressed_index: None,
            reorder_offset: 0.0,
            browse_offset: 0.0,
            feedback: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn sections(&self) -> &[Section] {
        self.registry.sections()
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Update layout metrics (container resize). Geometry is pure, so this
    /// takes effect on the next frame with no other bookkeeping.
    pub fn set_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
    }

    /// Subscribe to discrete transition feedback. Disconnected receivers are
    /// pruned on the next emit.
    pub fn subscribe(&mut self) -> Receiver<Feedback> {
        let (tx, rx) = mpsc::channel();
        self.feedback.push(tx);
        rx
    }

    /// Geometry for every section, in registry order, for the current state.
    pub fn frame(&self) -> Vec<CardGeometry> {
        let count = self.registry.len();
        match self.mode {
            Mode::Browse => {
                geometry::browse_frame(count, self.selected, self.browse_offset, &self.metrics)
            }
            Mode::Reorder { dragged_index } => geometry::reorder_frame(
                count,
                self.selected,
                dragged_index.map(|dragged| (dragged, self.reorder_offset)),
                &self.metrics,
            ),
        }
    }

    /// Explicit mode toggle, e.g. from an edit button.
    pub fn toggle_reorder(&mut self) {
        match self.mode {
            Mode::Browse => self.apply(CarouselAction::EnterReorder),
            Mode::Reorder { .. } => self.apply(CarouselAction::ExitReorder),
        }
    }

    // ==========================================================================
    // Pointer surface
    // ==========================================================================

    /// Pointer contact. `hit` is the card index under the pointer, if any;
    /// `at` is a host-supplied monotonic timestamp shared by all phases.
    pub fn pointer_down(&mut self, position: Vec2, hit: Option<usize>, at: Duration) {
        self.drag = Some(DragState::begin(position, at));
        self.pressed_index = hit.filter(|_| !self.registry.is_empty()).map(|index| {
            index.min(self.registry.len() - 1)
        });
    }

    /// Pointer movement while down.
    pub fn pointer_moved(&mut self, position: Vec2, at: Duration) {
        let (previous, translation) = {
            let Some(drag) = self.drag.as_mut() else {
                return;
            };
            let previous = drag.translation();
            drag.push(position, at);
            (previous, drag.translation())
        };

        match self.mode {
            Mode::Browse => {
                self.browse_offset = if self.interpreter.is_paging_gesture(translation) {
                    translation.x
                } else {
                    0.0
                };
                self.try_long_press(at);
            }
            Mode::Reorder { dragged_index } => match dragged_index {
                Some(_) => self.apply(CarouselAction::DragUpdate {
                    delta: translation - previous,
                }),
                None => {
                    // A press on a card only becomes a drag once it moves
                    // past the slop distance; a still press stays a tap.
                    if let Some(index) = self.pressed_index
                        && translation.length() > gesture::DRAG_SLOP
                    {
                        self.apply(CarouselAction::DragStart { index });
                    }
                }
            },
        }
    }

    /// Pointer release. Classifies the gesture and applies its one outcome.
    pub fn pointer_up(&mut self, position: Vec2, at: Duration) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        drag.push(position, at);

        match self.mode {
            Mode::Browse => {
                let outcome = self.interpreter.classify_release(
                    drag.translation(),
                    drag.velocity(),
                    self.selected,
                    self.registry.len(),
                );
                self.apply(match outcome {
                    PageOutcome::PagePrevious => CarouselAction::PagePrevious,
                    PageOutcome::PageNext => CarouselAction::PageNext,
                    PageOutcome::SnapBack => CarouselAction::SnapBack,
                });
            }
            Mode::Reorder { dragged_index } => match dragged_index {
                Some(_) => self.apply(CarouselAction::DragEnd),
                // Tap on a card or the background with no drag active.
                None => self.apply(CarouselAction::ExitReorder),
            },
        }
        self.pressed_index = None;
    }

    /// Time-only update. Long-press recognition must fire from elapsed time
    /// alone, with no movement event to carry the timestamp.
    pub fn tick(&mut self, now: Duration) {
        self.try_long_press(now);
    }

    fn try_long_press(&mut self, now: Duration) {
        if self.mode != Mode::Browse || self.pressed_index.is_none() {
            return;
        }
        let recognized = self
            .drag
            .as_ref()
            .is_some_and(|drag| self.interpreter.long_press_recognized(drag, now));
        if recognized {
            // The rest of this contact belongs to Reorder mode.
            self.drag = None;
            self.pressed_index = None;
            self.apply(CarouselAction::EnterReorder);
        }
    }

    // ==========================================================================
    // State transitions
    // ==========================================================================

    /// The single transition function. Invalid or out-of-mode actions are
    /// clamped or ignored; nothing here panics.
    pub fn apply(&mut self, action: CarouselAction) {
        match self.mode {
            Mode::Browse => self.apply_browse(action),
            Mode::Reorder { dragged_index } => self.apply_reorder(action, dragged_index),
        }
    }

    fn apply_browse(&mut self, action: CarouselAction) {
        match action {
            CarouselAction::PagePrevious => {
                self.browse_offset = 0.0;
                if self.selected > 0 {
                    self.selected -= 1;
                    self.persist();
                    self.emit(Feedback::PageChange);
                    debug!(selected = self.selected, "Paged to previous card");
                }
            }
            CarouselAction::PageNext => {
                self.browse_offset = 0.0;
                if self.selected + 1 < self.registry.len() {
                    self.selected += 1;
                    self.persist();
                    self.emit(Feedback::PageChange);
                    debug!(selected = self.selected, "Paged to next card");
                }
            }
            CarouselAction::SnapBack => {
                self.browse_offset = 0.0;
            }
            CarouselAction::Select { index } => {
                if self.registry.is_empty() {
                    return;
                }
                let index = index.min(self.registry.len() - 1);
                if index != self.selected {
                    self.selected = index;
                    self.persist();
                    self.emit(Feedback::PageChange);
                }
            }
            CarouselAction::EnterReorder => {
                self.browse_offset = 0.0;
                self.mode = Mode::Reorder {
                    dragged_index: None,
                };
                self.emit(Feedback::EnterReorder);
                info!("Entered reorder mode");
            }
            other => {
                debug!(action = ?other, "Ignoring reorder action in Browse mode");
            }
        }
    }

    fn apply_reorder(&mut self, action: CarouselAction, dragged_index: Option<usize>) {
        match action {
            CarouselAction::DragStart { index } => {
                if dragged_index.is_some() || self.registry.is_empty() {
                    return;
                }
                let index = index.min(self.registry.len() - 1);
                self.reorder_offset = 0.0;
                self.mode = Mode::Reorder {
                    dragged_index: Some(index),
                };
                debug!(index, "Picked up card for reorder");
            }
            CarouselAction::DragUpdate { delta } => {
                let Some(dragged) = dragged_index else {
                    return;
                };
                let count = self.registry.len();
                let pitch = self.metrics.slot_pitch();
                self.reorder_offset = geometry::clamp_drag_offset(
                    dragged,
                    self.reorder_offset + delta.x,
                    pitch,
                    count,
                );
            }
            CarouselAction::DragEnd => {
                if let Some(dragged) = dragged_index {
                    self.commit_drag(dragged);
                }
            }
            CarouselAction::ExitReorder => {
                // Ignored while a card is in hand; the drag ends first.
                if dragged_index.is_none() {
                    self.mode = Mode::Browse;
                    self.reorder_offset = 0.0;
                    info!("Left reorder mode");
                }
            }
            other => {
                debug!(action = ?other, "Ignoring browse action in Reorder mode");
            }
        }
    }

    /// Commit the drop: resolve the nearest slot, move the section, and
    /// re-resolve focus by the id that was focused before the move. Identity
    /// keeps the same section focused even when it is the one being dragged.
    fn commit_drag(&mut self, dragged: usize) {
        let count = self.registry.len();
        let target = geometry::commit_slot(dragged, self.reorder_offset, &self.metrics, count);

        if target != dragged {
            let focused_id = self.registry.get(self.selected).map(|s| s.id.clone());
            if self.registry.move_section(dragged, target) {
                if let Some(id) = focused_id
                    && let Some(index) = self.registry.index_of(&id)
                {
                    self.selected = index;
                }
                self.persist();
                self.emit(Feedback::CommitReorder);
                info!(from = dragged, to = target, "Committed section reorder");
            }
        }

        self.reorder_offset = 0.0;
        self.mode = Mode::Reorder {
            dragged_index: None,
        };
    }

    fn persist(&mut self) {
        let layout = PersistedLayout {
            section_order: self.registry.ids(),
            focused_index: self.selected,
            has_launched: true,
        };
        if let Err(e) = self.store.save(&layout) {
            // Persistence failure degrades to session-only state.
            error!(error = %e, "Failed to persist carousel layout");
        }
    }

    fn emit(&mut self, event: Feedback) {
        self.feedback.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryLayoutStore;
    use crate::types::ContentRef;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn sections(ids: &[&str]) -> Vec<Section> {
        ids.iter()
            .map(|id| Section::new(*id, *id, ContentRef::new(0)))
            .collect()
    }

    fn metrics() -> LayoutMetrics {
        LayoutMetrics {
            container_width: 1000.0,
            container_height: 600.0,
            card_width: 100.0,
            card_gap: 20.0,
        }
    }

    fn controller() -> CarouselController<MemoryLayoutStore> {
        CarouselController::new(sections(&["A", "B", "C"]), MemoryLayoutStore::new(), metrics())
    }

    #[test]
    fn test_long_press_enters_reorder() {
        let mut c = controller();
        let feedback = c.subscribe();
        c.pointer_down(Vec2::new(500.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(502.0, 300.0), ms(200));
        assert_eq!(c.mode(), Mode::Browse);
        c.tick(ms(600));
        assert_eq!(
            c.mode(),
            Mode::Reorder {
                dragged_index: None
            }
        );
        assert_eq!(feedback.try_recv(), Ok(Feedback::EnterReorder));
    }

    #[test]
    fn test_early_movement_cancels_long_press() {
        let mut c = controller();
        c.pointer_down(Vec2::new(500.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(520.0, 300.0), ms(100));
        c.tick(ms(900));
        assert_eq!(c.mode(), Mode::Browse);
    }

    #[test]
    fn test_long_press_on_background_does_nothing() {
        let mut c = controller();
        c.pointer_down(Vec2::new(500.0, 300.0), None, ms(0));
        c.tick(ms(900));
        assert_eq!(c.mode(), Mode::Browse);
    }

    #[test]
    fn test_slow_leftward_swipe_pages_next() {
        let mut c = controller();
        let feedback = c.subscribe();
        c.pointer_down(Vec2::new(500.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(470.0, 300.0), ms(120));
        c.pointer_up(Vec2::new(460.0, 300.0), ms(240));
        assert_eq!(c.selected_index(), 1);
        assert_eq!(c.mode(), Mode::Browse);
        assert_eq!(feedback.try_recv(), Ok(Feedback::PageChange));
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut c = controller();
        c.pointer_down(Vec2::new(500.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(490.0, 300.0), ms(700));
        c.pointer_up(Vec2::new(490.0, 300.0), ms(800));
        assert_eq!(c.selected_index(), 0);
        // Live offset resets with the snap.
        let frame = c.frame();
        assert_eq!(frame[0].x, c.metrics().center_x());
    }

    #[test]
    fn test_one_page_per_release() {
        let mut c = controller();
        c.pointer_down(Vec2::new(600.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(200.0, 300.0), ms(60));
        c.pointer_up(Vec2::new(100.0, 300.0), ms(90));
        // Huge fast swipe still advances exactly one card.
        assert_eq!(c.selected_index(), 1);
    }

    #[test]
    fn test_reorder_drag_commits_and_preserves_focused_id() {
        let mut c = controller();
        let feedback = c.subscribe();
        assert_eq!(c.selected_index(), 0); // focused on "A"
        c.toggle_reorder();
        let pitch = c.metrics().slot_pitch();

        c.pointer_down(Vec2::new(400.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(405.0, 300.0), ms(50));
        c.pointer_moved(Vec2::new(405.0 + 2.0 * pitch, 300.0), ms(300));
        c.pointer_up(Vec2::new(405.0 + 2.0 * pitch, 300.0), ms(350));

        let ids = c.registry().ids();
        assert_eq!(ids, vec!["B", "C", "A"]);
        // "A" stayed focused by identity, not index.
        assert_eq!(c.selected_index(), 2);
        assert_eq!(
            c.mode(),
            Mode::Reorder {
                dragged_index: None
            }
        );
        assert_eq!(feedback.try_recv(), Ok(Feedback::EnterReorder));
        assert_eq!(feedback.try_recv(), Ok(Feedback::CommitReorder));
    }

    #[test]
    fn test_commit_persists_layout() {
        let mut c = controller();
        c.toggle_reorder();
        let pitch = c.metrics().slot_pitch();
        c.pointer_down(Vec2::new(400.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(406.0, 300.0), ms(50));
        c.pointer_moved(Vec2::new(400.0 + pitch, 300.0), ms(200));
        c.pointer_up(Vec2::new(400.0 + pitch, 300.0), ms(250));

        let saved = c.store().load().expect("layout saved on commit");
        assert_eq!(saved.section_order, vec!["B", "A", "C"]);
        assert!(saved.has_launched);
    }

    #[test]
    fn test_drop_in_place_commits_nothing() {
        let mut c = controller();
        c.toggle_reorder();
        c.pointer_down(Vec2::new(400.0, 300.0), Some(1), ms(0));
        c.pointer_moved(Vec2::new(406.0, 300.0), ms(50));
        c.pointer_up(Vec2::new(402.0, 300.0), ms(100));
        assert_eq!(c.registry().ids(), vec!["A", "B", "C"]);
        assert_eq!(c.store().load(), None);
    }

    #[test]
    fn test_tap_exits_reorder() {
        let mut c = controller();
        c.toggle_reorder();
        c.pointer_down(Vec2::new(100.0, 100.0), None, ms(0));
        c.pointer_up(Vec2::new(100.0, 100.0), ms(80));
        assert_eq!(c.mode(), Mode::Browse);
    }

    #[test]
    fn test_still_tap_on_card_exits_reorder() {
        let mut c = controller();
        c.toggle_reorder();
        c.pointer_down(Vec2::new(400.0, 300.0), Some(1), ms(0));
        c.pointer_moved(Vec2::new(402.0, 300.0), ms(40));
        c.pointer_up(Vec2::new(402.0, 300.0), ms(80));
        assert_eq!(c.mode(), Mode::Browse);
    }

    #[test]
    fn test_restored_focus_is_clamped() {
        let store = MemoryLayoutStore::with_layout(PersistedLayout {
            section_order: vec!["C".into(), "A".into()],
            focused_index: 7,
            has_launched: true,
        });
        let c = CarouselController::new(sections(&["A", "B", "C"]), store, metrics());
        assert_eq!(c.registry().ids(), vec!["C", "A", "B"]);
        assert_eq!(c.selected_index(), 2);
    }

    #[test]
    fn test_first_launch_resets_focus() {
        let store = MemoryLayoutStore::with_layout(PersistedLayout {
            section_order: vec!["B".into(), "A".into(), "C".into()],
            focused_index: 2,
            has_launched: false,
        });
        let c = CarouselController::new(sections(&["A", "B", "C"]), store, metrics());
        assert_eq!(c.selected_index(), 0);
        // The saved order still applies; only focus resets.
        assert_eq!(c.registry().ids(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_select_clamps_out_of_range_index() {
        let mut c = controller();
        c.apply(CarouselAction::Select { index: 99 });
        assert_eq!(c.selected_index(), 2);
    }

    #[test]
    fn test_paging_clamps_at_row_ends() {
        let mut c = controller();
        c.apply(CarouselAction::PagePrevious);
        assert_eq!(c.selected_index(), 0);
        for _ in 0..10 {
            c.apply(CarouselAction::PageNext);
        }
        assert_eq!(c.selected_index(), 2);
    }

    #[test]
    fn test_reorder_actions_ignored_in_browse() {
        let mut c = controller();
        c.apply(CarouselAction::DragStart { index: 0 });
        c.apply(CarouselAction::DragUpdate {
            delta: Vec2::new(100.0, 0.0),
        });
        c.apply(CarouselAction::DragEnd);
        assert_eq!(c.mode(), Mode::Browse);
        assert_eq!(c.registry().ids(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_registry_is_inert() {
        let mut c =
            CarouselController::new(Vec::new(), MemoryLayoutStore::new(), metrics());
        c.pointer_down(Vec2::new(1.0, 1.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(50.0, 1.0), ms(100));
        c.pointer_up(Vec2::new(50.0, 1.0), ms(200));
        c.apply(CarouselAction::Select { index: 0 });
        assert_eq!(c.selected_index(), 0);
        assert!(c.frame().is_empty());
    }

    #[test]
    fn test_drag_offset_clamped_to_row() {
        let mut c = controller();
        c.toggle_reorder();
        c.apply(CarouselAction::DragStart { index: 2 });
        c.apply(CarouselAction::DragUpdate {
            delta: Vec2::new(10_000.0, 0.0),
        });
        // Dragging the last card further right cannot leave the row.
        let frame = c.frame();
        let m = c.metrics();
        assert_eq!(frame[2].x, m.slot_center_x(2, 3));
    }

    #[test]
    fn test_vertical_drift_ignored_during_reorder_drag() {
        let mut c = controller();
        c.toggle_reorder();
        let pitch = c.metrics().slot_pitch();
        c.pointer_down(Vec2::new(400.0, 300.0), Some(0), ms(0));
        c.pointer_moved(Vec2::new(406.0, 300.0), ms(50));
        // Wandering far off the row vertically changes neither the preview
        // nor the committed slot.
        c.pointer_moved(Vec2::new(400.0 + pitch, 180.0), ms(200));
        let frame = c.frame();
        assert_eq!(frame[0].y, c.metrics().center_y());
        c.pointer_up(Vec2::new(400.0 + pitch, 180.0), ms(250));
        assert_eq!(c.registry().ids(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_frame_matches_mode() {
        let mut c = controller();
        assert!(c.frame()[0].is_focused);
        c.toggle_reorder();
        let frame = c.frame();
        assert_eq!(frame.len(), 3);
        assert!(frame.iter().all(|card| card.scale == 0.6));
        c.toggle_reorder();
        assert_eq!(c.mode(), Mode::Browse);
    }
}
