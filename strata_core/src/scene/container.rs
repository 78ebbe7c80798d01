// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Scene`] container.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::config::{SceneConfig, StackingOrder};
use super::layer::{Layer, LayerCommand};
use crate::deferred::{DeferredQueue, MAX_DRAIN_PASSES};
use crate::error::SceneError;
use crate::lifecycle::{Lifecycle, LifecycleState, Transition};
use crate::touch::TouchEvent;
use crate::trace::{
    BackKeyEvent, ContextChangedEvent, DeferredEvent, LayerChange, LayerChangeEvent, ResizeEvent,
    SetupEvent, TouchDispatchEvent, Tracer, TransitionEvent, count,
};

struct LayerSlot {
    id: i32,
    layer: Box<dyn Layer>,
}

/// An owning, keyed container of [`Layer`]s.
///
/// Layers are kept in a stacking list, bottom first. Ids are unique.
pub struct Scene {
    config: SceneConfig,
    layers: Vec<LayerSlot>,
    lifecycle: Lifecycle,
    back_key: Option<Box<dyn FnMut() -> bool>>,
    deferred: DeferredQueue<LayerCommand>,
    tracer: Tracer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.layers.clear();
        self.deferred.discard();
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("config", &self.config)
            .field("layers", &self.layers.iter().map(|s| s.id).collect::<Vec<_>>())
            .field("state", &self.lifecycle.state())
            .field("deferred", &self.deferred)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates an empty scene that stacks layers by ascending id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Creates an empty scene with the given configuration.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            lifecycle: Lifecycle::new(),
            back_key: None,
            deferred: DeferredQueue::new(),
            tracer: Tracer::none(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> SceneConfig {
        self.config
    }

    /// Routes diagnostics to `tracer`.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Installs the handler consulted by [`on_press_back_key`](Self::on_press_back_key).
    ///
    /// The handler returns `true` when it consumed the key.
    pub fn set_back_key_handler(&mut self, handler: impl FnMut() -> bool + 'static) {
        self.back_key = Some(Box::new(handler));
    }

    /// Returns a handle through which layers can request structural changes
    /// while the scene is traversing them.
    #[must_use]
    pub fn deferred(&self) -> DeferredQueue<LayerCommand> {
        self.deferred.clone()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    // -- Ownership API --

    /// Stores `layer` under `id`.
    ///
    /// If `id` is occupied, the previous layer is dropped first.
    pub fn add_layer(&mut self, id: i32, layer: Box<dyn Layer>) {
        let replaced = match self.position(id) {
            Some(pos) => {
                drop(self.layers.remove(pos));
                true
            }
            None => false,
        };

        let at = match self.config.stacking {
            StackingOrder::ById => self.layers.partition_point(|s| s.id < id),
            StackingOrder::ByInsertion => self.layers.len(),
        };
        self.layers.insert(at, LayerSlot { id, layer });

        let change = if replaced {
            LayerChange::Replaced(id)
        } else {
            LayerChange::Added(id)
        };
        self.trace_change(change);
    }

    /// Returns the layer under `id`.
    #[must_use]
    pub fn layer(&self, id: i32) -> Option<&dyn Layer> {
        let slot = self.layers.iter().find(|s| s.id == id)?;
        Some(slot.layer.as_ref())
    }

    /// Returns the layer under `id` mutably.
    pub fn layer_mut(&mut self, id: i32) -> Option<&mut dyn Layer> {
        let slot = self.layers.iter_mut().find(|s| s.id == id)?;
        Some(slot.layer.as_mut())
    }

    /// Drops the layer under `id`.
    ///
    /// Returns `false` (and does nothing) if there is none.
    pub fn remove_layer(&mut self, id: i32) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        drop(self.layers.remove(pos));
        self.trace_change(LayerChange::Removed(id));
        true
    }

    /// Drops every layer, bottom first.
    pub fn remove_all_layers(&mut self) {
        let dropped = count(self.layers.len());
        self.layers.clear();
        self.trace_change(LayerChange::Cleared { dropped });
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns whether the scene holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterates layer ids bottom-to-top.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = i32> + '_ {
        self.layers.iter().map(|s| s.id)
    }

    // -- Fan-out API --

    /// Sets up every layer and leaves [`LifecycleState::Created`].
    pub fn setup(&mut self) {
        // Setup never fails; a second call leaves the state unchanged.
        let _ = self.transition(Transition::Setup);
        let state = self.lifecycle.state();
        for slot in &mut self.layers {
            slot.layer.setup();
        }
        self.tracer.setup(&SetupEvent {
            layer_count: count(self.layers.len()),
            state,
        });
        self.apply_deferred();
    }

    /// Resizes every layer to the aspect ratio of `width` × `height`.
    ///
    /// Returns the aspect ratio handed to the layers.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ZeroHeight`] if `height` is zero; no layer is
    /// touched in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, SceneError> {
        if height == 0 {
            self.tracer.resize(&ResizeEvent {
                width,
                height,
                aspect: None,
            });
            return Err(SceneError::ZeroHeight { width });
        }

        let aspect = width as f32 / height as f32;
        for slot in &mut self.layers {
            slot.layer.resize(aspect);
        }
        self.tracer.resize(&ResizeEvent {
            width,
            height,
            aspect: Some(aspect),
        });
        self.apply_deferred();
        Ok(aspect)
    }

    /// Renders one frame on every layer, bottom-to-top.
    ///
    /// Paused layers are still rendered, with an elapsed time of zero.
    pub fn step(&mut self, dt: f32) {
        for slot in &mut self.layers {
            let t = if slot.layer.is_paused() { 0.0 } else { dt };
            slot.layer.render(t);
        }
        self.apply_deferred();
    }

    /// Notifies every layer that the graphics context was recreated.
    pub fn on_context_changed(&mut self) {
        for slot in &mut self.layers {
            slot.layer.on_context_changed();
        }
        self.tracer.context_changed(&ContextChangedEvent {
            layer_count: count(self.layers.len()),
        });
        self.apply_deferred();
    }

    /// Offers `event` to the layers top-to-bottom.
    ///
    /// Returns `true` as soon as one layer consumes it; the layers below are
    /// not asked.
    pub fn on_touch(&mut self, event: &TouchEvent) -> bool {
        let mut visited = 0_usize;
        let mut handled_by = None;
        for slot in self.layers.iter_mut().rev() {
            visited += 1;
            if slot.layer.on_touch(event) {
                handled_by = Some(slot.id);
                break;
            }
        }

        self.tracer.touch(&TouchDispatchEvent {
            pointer: event.pointer,
            phase: event.phase,
            position: event.position,
            visited: count(visited),
            handled_by,
        });
        self.apply_deferred();
        handled_by.is_some()
    }

    /// Offers a back-key press to the installed handler.
    ///
    /// Without a handler the key is not handled.
    pub fn on_press_back_key(&mut self) -> bool {
        let handled = self.back_key.as_mut().is_some_and(|handler| handler());
        self.tracer.back_key(&BackKeyEvent { handled });
        self.apply_deferred();
        handled
    }

    // -- Lifecycle API --

    /// The scene became active.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransition`] unless the scene is inactive.
    pub fn on_activate(&mut self) -> Result<LifecycleState, SceneError> {
        self.transition(Transition::Activate)
    }

    /// The scene stopped receiving frames.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransition`] unless the scene is active
    /// or started.
    pub fn on_suspend(&mut self) -> Result<LifecycleState, SceneError> {
        self.transition(Transition::Suspend)
    }

    /// The switch into this scene finished.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransition`] unless the scene is active.
    pub fn on_start(&mut self) -> Result<LifecycleState, SceneError> {
        self.transition(Transition::Start)
    }

    /// The switch away from this scene began.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTransition`] unless the scene is started.
    pub fn on_end(&mut self) -> Result<LifecycleState, SceneError> {
        self.transition(Transition::End)
    }

    // -- Deferred mutation --

    /// Applies structural changes queued through [`deferred`](Self::deferred).
    ///
    /// Every fan-out calls this once it has finished walking the layers.
    /// Commands queued while applying are applied too, for at most
    /// [`MAX_DRAIN_PASSES`] batches; the rest stay queued.
    /// Returns the number of commands applied.
    pub fn apply_deferred(&mut self) -> usize {
        let mut applied = 0;
        for _ in 0..MAX_DRAIN_PASSES {
            // Dropping a layer may queue more commands.
            let batch = self.deferred.take();
            if batch.is_empty() {
                break;
            }
            for command in batch {
                match command {
                    LayerCommand::Add(id, layer) => self.add_layer(id, layer),
                    LayerCommand::Remove(id) => {
                        self.remove_layer(id);
                    }
                    LayerCommand::Clear => self.remove_all_layers(),
                }
                applied += 1;
            }
        }
        if applied > 0 {
            self.tracer.deferred(&DeferredEvent {
                applied: count(applied),
            });
        }
        applied
    }

    // -- Internal helpers --

    fn position(&self, id: i32) -> Option<usize> {
        self.layers.iter().position(|s| s.id == id)
    }

    fn transition(&mut self, transition: Transition) -> Result<LifecycleState, SceneError> {
        let from = self.lifecycle.state();
        let result = self.lifecycle.apply(transition);
        self.tracer.transition(&TransitionEvent {
            transition,
            from,
            to: result.ok(),
        });
        result.map_err(SceneError::from)
    }

    fn trace_change(&mut self, change: LayerChange) {
        self.tracer.layer_change(&LayerChangeEvent {
            change,
            layer_count: count(self.layers.len()),
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::{Cell, RefCell};

    use kurbo::Point;

    use super::*;
    use crate::touch::TouchPhase;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Call {
        Setup(i32),
        Resize(i32, f32),
        Render(i32, f32),
        Context(i32),
        Touch(i32),
    }

    #[derive(Default)]
    struct Harness {
        log: Rc<RefCell<Vec<Call>>>,
        drops: Rc<Cell<usize>>,
    }

    impl Harness {
        fn spy(&self, id: i32) -> Box<Spy> {
            Box::new(Spy {
                id,
                log: self.log.clone(),
                drops: self.drops.clone(),
                accepts_touch: false,
                paused: false,
            })
        }

        fn accepting(&self, id: i32) -> Box<Spy> {
            let mut spy = self.spy(id);
            spy.accepts_touch = true;
            spy
        }

        fn calls(&self) -> Vec<Call> {
            self.log.borrow().clone()
        }
    }

    struct Spy {
        id: i32,
        log: Rc<RefCell<Vec<Call>>>,
        drops: Rc<Cell<usize>>,
        accepts_touch: bool,
        paused: bool,
    }

    impl Layer for Spy {
        fn setup(&mut self) {
            self.log.borrow_mut().push(Call::Setup(self.id));
        }

        fn resize(&mut self, aspect: f32) {
            self.log.borrow_mut().push(Call::Resize(self.id, aspect));
        }

        fn render(&mut self, dt: f32) {
            self.log.borrow_mut().push(Call::Render(self.id, dt));
        }

        fn on_context_changed(&mut self) {
            self.log.borrow_mut().push(Call::Context(self.id));
        }

        fn on_touch(&mut self, _event: &TouchEvent) -> bool {
            self.log.borrow_mut().push(Call::Touch(self.id));
            self.accepts_touch
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    impl Drop for Spy {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn tap() -> TouchEvent {
        TouchEvent::new(TouchPhase::Down, Point::new(10.0, 20.0))
    }

    #[test]
    fn add_and_get_layer() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(7, h.spy(7));
        assert_eq!(scene.len(), 1);
        assert!(scene.layer(7).is_some());
        assert!(scene.layer(8).is_none());
        assert!(scene.layer_mut(7).is_some());
    }

    #[test]
    fn overwrite_drops_exactly_the_previous_layer() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(1, h.spy(1));
        assert_eq!(h.drops.get(), 1, "one prior instance dropped");
        scene.add_layer(1, h.spy(1));
        assert_eq!(h.drops.get(), 2, "second overwrite drops one more");
        assert_eq!(scene.len(), 1, "ids stay unique");
    }

    #[test]
    fn remove_layer_reports_presence() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(3, h.spy(3));
        assert!(scene.remove_layer(3));
        assert_eq!(h.drops.get(), 1);
        assert!(!scene.remove_layer(3));
        assert_eq!(h.drops.get(), 1, "absent removal drops nothing");
        assert!(scene.is_empty());
    }

    #[test]
    fn every_layer_dropped_once_across_all_paths() {
        let h = Harness::default();
        {
            let mut scene = Scene::new();
            scene.add_layer(1, h.spy(1));
            scene.add_layer(2, h.spy(2));
            scene.add_layer(2, h.spy(2)); // replace
            scene.add_layer(3, h.spy(3));
            scene.remove_layer(1);
            scene.add_layer(4, h.spy(4));
            // 2 (replacement), 3, and 4 are dropped with the scene.
        }
        assert_eq!(h.drops.get(), 5, "five layers added, five dropped");
    }

    #[test]
    fn remove_all_is_idempotent() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));
        scene.remove_all_layers();
        assert_eq!(h.drops.get(), 2);
        scene.remove_all_layers();
        assert_eq!(h.drops.get(), 2, "second clear drops nothing");
        assert!(scene.is_empty());
    }

    #[test]
    fn fan_out_is_ascending_by_id() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(3, h.spy(3));
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));

        scene.setup();
        scene.on_context_changed();
        assert_eq!(
            h.calls(),
            vec![
                Call::Setup(1),
                Call::Setup(2),
                Call::Setup(3),
                Call::Context(1),
                Call::Context(2),
                Call::Context(3),
            ]
        );
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn resize_passes_aspect_to_every_layer() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));

        let aspect = scene.resize(1920, 1080).unwrap();
        assert!((aspect - 1.7778).abs() < 1e-4, "aspect was {aspect}");
        let calls = h.calls();
        assert_eq!(calls.len(), 2);
        for call in calls {
            match call {
                Call::Resize(_, a) => assert_eq!(a, aspect),
                other => panic!("expected Resize, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_height_resize_is_rejected() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        assert_eq!(
            scene.resize(640, 0),
            Err(SceneError::ZeroHeight { width: 640 })
        );
        assert!(h.calls().is_empty(), "no layer resized");
    }

    #[test]
    fn paused_layer_renders_with_zero_dt() {
        let h = Harness::default();
        let mut scene = Scene::new();
        let mut paused = h.spy(1);
        paused.paused = true;
        scene.add_layer(1, paused);
        scene.add_layer(2, h.spy(2));

        scene.step(0.5);
        assert_eq!(h.calls(), vec![Call::Render(1, 0.0), Call::Render(2, 0.5)]);
    }

    #[test]
    fn touch_visits_topmost_first() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.accepting(2));
        scene.add_layer(3, h.spy(3));

        assert!(scene.on_touch(&tap()));
        assert_eq!(h.calls(), vec![Call::Touch(3), Call::Touch(2)]);
    }

    #[test]
    fn touch_short_circuits_at_first_consumer() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.accepting(1));
        scene.add_layer(2, h.accepting(2));

        assert!(scene.on_touch(&tap()));
        assert_eq!(h.calls(), vec![Call::Touch(2)], "layer 1 never asked");
    }

    #[test]
    fn unhandled_touch_visits_everyone() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));

        assert!(!scene.on_touch(&tap()));
        assert_eq!(h.calls(), vec![Call::Touch(2), Call::Touch(1)]);
    }

    #[test]
    fn empty_scene_does_not_handle_touch() {
        let mut scene = Scene::new();
        assert!(!scene.on_touch(&tap()));
    }

    #[test]
    fn insertion_stacking_ignores_id_order() {
        let h = Harness::default();
        let mut scene = Scene::with_config(SceneConfig::by_insertion());
        scene.add_layer(3, h.spy(3));
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![3, 1, 2]);

        // A replacement goes on top.
        scene.add_layer(3, h.spy(3));
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1, 2, 3]);

        scene.add_layer(1, h.spy(1));
        assert!(!scene.on_touch(&tap()));
        assert_eq!(
            h.calls(),
            vec![Call::Touch(1), Call::Touch(3), Call::Touch(2)]
        );
    }

    #[test]
    fn replacement_keeps_place_when_stacking_by_id() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, h.spy(2));
        scene.add_layer(1, h.spy(1));
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn back_key_defaults_to_unhandled() {
        let mut scene = Scene::new();
        assert!(!scene.on_press_back_key());

        let presses = Rc::new(Cell::new(0));
        let seen = presses.clone();
        scene.set_back_key_handler(move || {
            seen.set(seen.get() + 1);
            true
        });
        assert!(scene.on_press_back_key());
        assert_eq!(presses.get(), 1);
    }

    #[test]
    fn lifecycle_notifications_follow_state_machine() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        assert_eq!(scene.lifecycle_state(), LifecycleState::Created);
        assert!(scene.on_activate().is_err(), "activate before setup");

        scene.setup();
        assert_eq!(scene.lifecycle_state(), LifecycleState::Inactive);
        assert_eq!(scene.on_activate(), Ok(LifecycleState::Active));
        assert_eq!(scene.on_start(), Ok(LifecycleState::Started));
        assert_eq!(scene.on_end(), Ok(LifecycleState::Active));
        assert_eq!(scene.on_suspend(), Ok(LifecycleState::Inactive));

        // Lifecycle notifications are not forwarded to layers.
        assert_eq!(h.calls(), vec![Call::Setup(1)]);
    }

    struct Dismissing {
        id: i32,
        queue: DeferredQueue<LayerCommand>,
        replacement: Option<Box<dyn Layer>>,
    }

    impl Layer for Dismissing {
        fn render(&mut self, _dt: f32) {}

        fn on_touch(&mut self, _event: &TouchEvent) -> bool {
            self.queue.push(LayerCommand::Remove(self.id));
            if let Some(layer) = self.replacement.take() {
                self.queue.push(LayerCommand::Add(self.id + 10, layer));
            }
            true
        }
    }

    #[test]
    fn mutation_from_touch_is_applied_after_dispatch() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        let dismissing = Dismissing {
            id: 5,
            queue: scene.deferred(),
            replacement: Some(h.spy(15)),
        };
        scene.add_layer(5, Box::new(dismissing));

        assert!(scene.on_touch(&tap()));
        assert!(scene.layer(5).is_none(), "self-removal applied");
        assert!(scene.layer(15).is_some(), "queued add applied");
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1, 15]);
        assert!(scene.deferred().is_empty());
        assert!(h.calls().is_empty(), "layer 1 below the consumer not asked");
    }

    #[test]
    fn queued_commands_wait_for_the_next_fan_out() {
        let h = Harness::default();
        let mut scene = Scene::new();
        let queue = scene.deferred();
        queue.push(LayerCommand::Add(2, h.spy(2)));
        queue.push(LayerCommand::Clear);
        assert!(scene.is_empty());

        assert_eq!(scene.apply_deferred(), 2);
        assert!(scene.is_empty());
        assert_eq!(h.drops.get(), 1);
        assert_eq!(scene.apply_deferred(), 0);
    }

    /// Queues the removal of `target` whenever it is set up or rendered.
    struct Sweeper {
        target: i32,
        queue: DeferredQueue<LayerCommand>,
        queued: Option<LayerCommand>,
    }

    impl Sweeper {
        fn sweep(&mut self) {
            self.queue.push(LayerCommand::Remove(self.target));
            if let Some(command) = self.queued.take() {
                self.queue.push(command);
            }
        }
    }

    impl Layer for Sweeper {
        fn setup(&mut self) {
            self.sweep();
        }

        fn render(&mut self, _dt: f32) {
            self.sweep();
        }
    }

    #[test]
    fn sibling_removed_mid_frame_still_renders_that_frame() {
        let h = Harness::default();
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        let sweeper = Sweeper {
            target: 3,
            queue: scene.deferred(),
            queued: None,
        };
        scene.add_layer(2, Box::new(sweeper));
        scene.add_layer(3, h.spy(3));

        scene.step(0.25);
        assert_eq!(h.calls(), vec![Call::Render(1, 0.25), Call::Render(3, 0.25)]);
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(h.drops.get(), 1, "removed sibling dropped once");

        scene.step(0.25);
        assert_eq!(h.calls().len(), 3, "only layer 1 renders next frame");
        assert_eq!(h.drops.get(), 1, "removing an absent id drops nothing");
    }

    #[test]
    fn layer_added_during_setup_misses_that_setup() {
        let h = Harness::default();
        let mut scene = Scene::new();
        let sweeper = Sweeper {
            target: 1,
            queue: scene.deferred(),
            queued: Some(LayerCommand::Add(4, h.spy(4))),
        };
        scene.add_layer(1, h.spy(1));
        scene.add_layer(2, Box::new(sweeper));

        scene.setup();
        assert_eq!(h.calls(), vec![Call::Setup(1)]);
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(h.drops.get(), 1);
        assert_eq!(scene.lifecycle_state(), LifecycleState::Inactive);
    }

    #[test]
    fn dropping_the_scene_drops_queued_layers() {
        struct SelfDismissing {
            _queue: DeferredQueue<LayerCommand>,
            drops: Rc<Cell<usize>>,
        }
        impl Layer for SelfDismissing {
            fn render(&mut self, _dt: f32) {}
        }
        impl Drop for SelfDismissing {
            fn drop(&mut self) {
                self.drops.set(self.drops.get() + 1);
            }
        }

        let h = Harness::default();
        let drops = Rc::new(Cell::new(0));
        let mut scene = Scene::new();
        scene.add_layer(1, h.spy(1));
        let queue = scene.deferred();
        queue.push(LayerCommand::Add(
            2,
            Box::new(SelfDismissing {
                _queue: scene.deferred(),
                drops: drops.clone(),
            }),
        ));
        queue.push(LayerCommand::Add(3, h.spy(3)));

        drop(scene);
        assert_eq!(drops.get(), 1, "pending layer dropped with the scene");
        assert_eq!(h.drops.get(), 2, "held and pending spies dropped");
        assert!(queue.is_empty());
    }

    /// Queues a fresh copy of itself under the same id whenever it is dropped.
    struct Phoenix {
        queue: DeferredQueue<LayerCommand>,
        drops: Rc<Cell<usize>>,
    }

    impl Layer for Phoenix {
        fn render(&mut self, _dt: f32) {}
    }

    impl Drop for Phoenix {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
            self.queue.push(LayerCommand::Add(
                1,
                Box::new(Phoenix {
                    queue: self.queue.clone(),
                    drops: self.drops.clone(),
                }),
            ));
        }
    }

    #[test]
    fn apply_deferred_stops_after_the_pass_limit() {
        let drops = Rc::new(Cell::new(0));
        let mut scene = Scene::new();
        let queue = scene.deferred();
        let phoenix = || {
            Box::new(Phoenix {
                queue: queue.clone(),
                drops: drops.clone(),
            })
        };
        scene.add_layer(1, phoenix());
        queue.push(LayerCommand::Add(1, phoenix()));

        assert_eq!(scene.apply_deferred(), MAX_DRAIN_PASSES);
        assert_eq!(drops.get(), MAX_DRAIN_PASSES);
        assert_eq!(queue.len(), 1, "the newest replacement waits");
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![1]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_sees_setup_as_a_transition() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Transitions(Vec<TransitionEvent>);
        impl TraceSink for Transitions {
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.0.push(*e);
            }
        }

        let sink = Rc::new(RefCell::new(Transitions::default()));
        let mut scene = Scene::new();
        scene.set_tracer(Tracer::new(Box::new(sink.clone())));
        scene.setup();
        scene.setup();

        let sink = sink.borrow();
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[0].transition, Transition::Setup);
        assert_eq!(sink.0[0].from, LifecycleState::Created);
        assert_eq!(sink.0[0].to, Some(LifecycleState::Inactive));
        assert_eq!(sink.0[1].from, LifecycleState::Inactive);
        assert_eq!(sink.0[1].to, Some(LifecycleState::Inactive), "repeat setup is a no-op");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_sees_touch_dispatch_and_rejections() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Recording {
            touches: Vec<TouchDispatchEvent>,
            transitions: Vec<TransitionEvent>,
            resizes: Vec<ResizeEvent>,
        }
        impl TraceSink for Recording {
            fn on_touch(&mut self, e: &TouchDispatchEvent) {
                self.touches.push(*e);
            }
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.transitions.push(*e);
            }
            fn on_resize(&mut self, e: &ResizeEvent) {
                self.resizes.push(*e);
            }
        }

        let h = Harness::default();
        let sink = Rc::new(RefCell::new(Recording::default()));
        let mut scene = Scene::new();
        scene.set_tracer(Tracer::new(Box::new(sink.clone())));
        scene.add_layer(1, h.accepting(1));
        scene.add_layer(2, h.spy(2));

        scene.on_touch(&tap());
        let _ = scene.on_start();
        let _ = scene.resize(100, 0);

        let sink = sink.borrow();
        assert_eq!(sink.touches.len(), 1);
        assert_eq!(sink.touches[0].visited, 2);
        assert_eq!(sink.touches[0].handled_by, Some(1));
        assert_eq!(sink.transitions[0].to, None, "start before setup rejected");
        assert_eq!(sink.resizes[0].aspect, None);
    }
}
