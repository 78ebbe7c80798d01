// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host that drives a scene through a short session.
//!
//! Builds a three-layer scene (backdrop, HUD with a view tree, modal popup),
//! then plays platform callbacks against it: setup, resize, lifecycle
//! notifications, frames, touches, a back-key press, and a context loss.
//! Events go to both a [`PrettyPrintSink`](strata_debug::pretty::PrettyPrintSink)
//! on stdout and a [`RecorderSink`](strata_debug::recorder::RecorderSink),
//! whose recording is exported as Chrome trace JSON at the end.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{self, BufWriter};
use std::rc::Rc;

use kurbo::{Affine, Point, Rect};

use strata_core::deferred::DeferredQueue;
use strata_core::scene::{Layer, LayerCommand, Scene, SceneConfig};
use strata_core::touch::{TouchEvent, TouchPhase};
use strata_core::trace::{
    BackKeyEvent, ContextChangedEvent, DeferredEvent, LayerChangeEvent, ResizeEvent, SetupEvent,
    TouchDispatchEvent, TraceSink, Tracer, TransitionEvent,
};
use strata_core::view::{Animation, UserObj, View, ViewCommand, ViewGroup};

use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

const FRAME_COUNT: u32 = 90;
const FRAME_DT: f32 = 1.0 / 60.0;
const SLIDE_SECS: f64 = 0.25;

const LAYER_BACKDROP: i32 = 0;
const LAYER_HUD: i32 = 10;
const LAYER_POPUP: i32 = 20;

const VIEW_PAUSE: i32 = 1;
const VIEW_TOOLBAR: i32 = 2;
const VIEW_HIDE_TOOLBAR: i32 = 3;

fn main() -> io::Result<()> {
    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let tee = Tee(vec![
        Box::new(PrettyPrintSink::new(Box::new(io::stdout()))),
        Box::new(recorder.clone()),
    ]);

    // -- scene -------------------------------------------------------------
    let mut scene = Scene::with_config(SceneConfig::by_id());
    scene.set_tracer(Tracer::new(Box::new(tee)));
    let layers = scene.deferred();

    let paused = Rc::new(Cell::new(false));
    let elapsed = Rc::new(Cell::new(0.0_f32));
    let presses = Rc::new(Cell::new(0_u32));
    let popup_open = Rc::new(Cell::new(false));

    scene.add_layer(
        LAYER_BACKDROP,
        Box::new(Backdrop {
            paused: paused.clone(),
            elapsed: elapsed.clone(),
        }),
    );
    scene.add_layer(LAYER_HUD, Box::new(Hud::new(paused.clone(), presses.clone())));

    {
        let layers = layers.clone();
        let popup_open = popup_open.clone();
        scene.set_back_key_handler(move || {
            if popup_open.get() {
                layers.push(LayerCommand::Remove(LAYER_POPUP));
                true
            } else {
                false
            }
        });
    }

    // -- platform callbacks ------------------------------------------------
    scene.setup();
    match scene.resize(1920, 1080) {
        Ok(aspect) => println!("surface aspect {aspect:.4}"),
        Err(err) => println!("resize failed: {err}"),
    }
    if let Err(err) = scene.resize(1920, 0) {
        println!("resize rejected: {err}");
    }
    report(scene.on_activate());
    report(scene.on_start());

    for frame in 0..FRAME_COUNT {
        match frame {
            // Pause button, then the toolbar's hide button.
            20 => tap(&mut scene, Point::new(40.0, 40.0)),
            30 => tap(&mut scene, Point::new(140.0, 40.0)),
            // The toolbar is gone; this lands on nothing.
            35 => tap(&mut scene, Point::new(140.0, 40.0)),
            40 | 80 => {
                layers.push(LayerCommand::Add(
                    LAYER_POPUP,
                    Box::new(Popup::new(popup_open.clone(), layers.clone())),
                ));
                scene.apply_deferred();
            }
            // Swallowed by the popup even though it is over the pause button.
            50 => tap(&mut scene, Point::new(40.0, 40.0)),
            60 => {
                let closed = scene.on_press_back_key();
                println!("back key closed popup: {closed}");
            }
            70 => scene.on_context_changed(),
            // The popup's close box removes it from inside dispatch.
            85 => tap(&mut scene, Point::new(920.0, 320.0)),
            88 => {
                let closed = scene.on_press_back_key();
                println!("back key with no popup handled: {closed}");
            }
            _ => {}
        }
        scene.step(FRAME_DT);
    }

    report(scene.on_end());
    report(scene.on_suspend());
    // Not allowed from Inactive.
    report(scene.on_start());
    scene.remove_all_layers();
    drop(scene);

    println!(
        "backdrop time {:.3}s over {FRAME_COUNT} frames, {} button presses",
        elapsed.get(),
        presses.get()
    );

    // -- export ------------------------------------------------------------
    let path = "scene_trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    strata_debug::json::export(recorder.borrow().as_bytes(), &mut writer)?;
    println!("Wrote {path}");
    Ok(())
}

fn tap(scene: &mut Scene, at: Point) {
    let down = TouchEvent::new(TouchPhase::Down, at);
    let handled = scene.on_touch(&down);
    scene.on_touch(&TouchEvent { phase: TouchPhase::Up, ..down });
    println!("tap at ({:.0}, {:.0}) handled: {handled}", at.x, at.y);
}

fn report<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>) {
    match result {
        Ok(state) => println!("lifecycle now {state:?}"),
        Err(err) => println!("lifecycle error: {err}"),
    }
}

// ---------------------------------------------------------------------------
// Tee sink
// ---------------------------------------------------------------------------

/// Forwards every event to each inner sink in order.
struct Tee(Vec<Box<dyn TraceSink>>);

impl TraceSink for Tee {
    fn on_setup(&mut self, e: &SetupEvent) {
        self.0.iter_mut().for_each(|s| s.on_setup(e));
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.0.iter_mut().for_each(|s| s.on_resize(e));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.0.iter_mut().for_each(|s| s.on_transition(e));
    }

    fn on_layer_change(&mut self, e: &LayerChangeEvent) {
        self.0.iter_mut().for_each(|s| s.on_layer_change(e));
    }

    fn on_touch(&mut self, e: &TouchDispatchEvent) {
        self.0.iter_mut().for_each(|s| s.on_touch(e));
    }

    fn on_context_changed(&mut self, e: &ContextChangedEvent) {
        self.0.iter_mut().for_each(|s| s.on_context_changed(e));
    }

    fn on_back_key(&mut self, e: &BackKeyEvent) {
        self.0.iter_mut().for_each(|s| s.on_back_key(e));
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.0.iter_mut().for_each(|s| s.on_deferred(e));
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

struct Backdrop {
    paused: Rc<Cell<bool>>,
    elapsed: Rc<Cell<f32>>,
}

impl Layer for Backdrop {
    fn render(&mut self, dt: f32) {
        self.elapsed.set(self.elapsed.get() + dt);
    }

    fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

/// Slides the HUD in from the left.
#[derive(Default)]
struct SlideIn {
    t: f64,
}

impl Animation for SlideIn {
    fn transform(&self) -> Affine {
        let progress = (self.t / SLIDE_SECS).min(1.0);
        Affine::translate((-200.0 * (1.0 - progress), 0.0))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "opacity is in 0..=1"
    )]
    fn opacity(&self) -> f32 {
        (self.t / SLIDE_SECS).min(1.0) as f32
    }
}

struct Hud {
    root: ViewGroup,
    slide: SlideIn,
    pause_tag: UserObj,
}

impl Hud {
    fn new(paused: Rc<Cell<bool>>, presses: Rc<Cell<u32>>) -> Self {
        let mut root = ViewGroup::new(0);
        let views = root.deferred();

        let pause_tag: UserObj = Rc::new("pause");
        root.add_view(Box::new(Button {
            id: VIEW_PAUSE,
            tag: Some(pause_tag.clone()),
            frame: Rect::new(20.0, 20.0, 60.0, 60.0),
            drawn: Rect::ZERO,
            visible: false,
            on_press: Box::new({
                let presses = presses.clone();
                move || {
                    paused.set(!paused.get());
                    presses.set(presses.get() + 1);
                }
            }),
        }));

        let mut toolbar = ViewGroup::new(VIEW_TOOLBAR);
        toolbar.add_view(Box::new(Button {
            id: VIEW_HIDE_TOOLBAR,
            tag: None,
            frame: Rect::new(120.0, 20.0, 160.0, 60.0),
            drawn: Rect::ZERO,
            visible: false,
            on_press: Box::new(move || {
                views.push(ViewCommand::RemoveById(VIEW_TOOLBAR));
                presses.set(presses.get() + 1);
            }),
        }));
        root.add_view(Box::new(toolbar));

        Self {
            root,
            slide: SlideIn::default(),
            pause_tag,
        }
    }
}

impl Layer for Hud {
    fn setup(&mut self) {
        let hide = self.root.find_view_by_id(VIEW_HIDE_TOOLBAR).is_some();
        let pause = self
            .root
            .view_by_user_obj(&self.pause_tag)
            .map(|v| v.user_id());
        println!(
            "hud setup: {} views, hide button nested: {hide}, pause button id: {pause:?}",
            self.root.count()
        );
    }

    fn render(&mut self, dt: f32) {
        self.slide.t += f64::from(dt);
        self.root.draw(f64::from(dt), Some(&self.slide));
    }

    fn on_context_changed(&mut self) {
        // Replay the entrance once the surface is back.
        self.slide = SlideIn::default();
    }

    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        self.root.on_touch(event)
    }
}

struct Popup {
    close: Rect,
    open: Rc<Cell<bool>>,
    layers: DeferredQueue<LayerCommand>,
}

impl Popup {
    fn new(open: Rc<Cell<bool>>, layers: DeferredQueue<LayerCommand>) -> Self {
        open.set(true);
        Self {
            close: Rect::new(900.0, 300.0, 940.0, 340.0),
            open,
            layers,
        }
    }
}

impl Layer for Popup {
    fn render(&mut self, _dt: f32) {}

    // Modal: every touch is consumed, only the close box acts on it.
    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        if event.phase == TouchPhase::Up && self.close.contains(event.position) {
            self.layers.push(LayerCommand::Remove(LAYER_POPUP));
        }
        true
    }
}

impl Drop for Popup {
    fn drop(&mut self) {
        self.open.set(false);
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

struct Button {
    id: i32,
    tag: Option<UserObj>,
    frame: Rect,
    drawn: Rect,
    visible: bool,
    on_press: Box<dyn FnMut()>,
}

impl View for Button {
    fn user_id(&self) -> i32 {
        self.id
    }

    fn user_obj(&self) -> Option<&UserObj> {
        self.tag.as_ref()
    }

    fn draw(&mut self, _dt: f64, animation: Option<&dyn Animation>) {
        let (transform, opacity) =
            animation.map_or((Affine::IDENTITY, 1.0), |a| (a.transform(), a.opacity()));
        self.drawn = transform.transform_rect_bbox(self.frame);
        self.visible = opacity > 0.0;
    }

    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        if self.visible && event.phase == TouchPhase::Down && self.drawn.contains(event.position) {
            (self.on_press)();
            true
        } else {
            false
        }
    }
}
