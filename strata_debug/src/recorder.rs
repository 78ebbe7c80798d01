// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Decoding stops at the first unknown tag or truncated record.

use strata_core::lifecycle::{LifecycleState, Transition};
use strata_core::touch::{PointerId, TouchPhase};
use strata_core::trace::{
    BackKeyEvent, ContextChangedEvent, DeferredEvent, LayerChange, LayerChangeEvent,
    ResizeEvent, SetupEvent, TouchDispatchEvent, TraceSink, TransitionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SETUP: u8 = 1;
const TAG_RESIZE: u8 = 2;
const TAG_TRANSITION: u8 = 3;
const TAG_LAYER_CHANGE: u8 = 4;
const TAG_TOUCH: u8 = 5;
const TAG_CONTEXT_CHANGED: u8 = 6;
const TAG_BACK_KEY: u8 = 7;
const TAG_DEFERRED: u8 = 8;

const CHANGE_ADDED: u8 = 0;
const CHANGE_REPLACED: u8 = 1;
const CHANGE_REMOVED: u8 = 2;
const CHANGE_CLEARED: u8 = 3;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_f32(&mut self, v: Option<f32>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u32(val.to_bits());
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_option_i32(&mut self, v: Option<i32>) {
        self.write_u8(u8::from(v.is_some()));
        self.write_i32(v.unwrap_or(0));
    }

    fn write_state(&mut self, s: LifecycleState) {
        self.write_u8(state_code(s));
    }

    fn write_option_state(&mut self, s: Option<LifecycleState>) {
        self.write_u8(s.map_or(0, |s| state_code(s) + 1));
    }
}

fn state_code(s: LifecycleState) -> u8 {
    match s {
        LifecycleState::Created => 0,
        LifecycleState::Inactive => 1,
        LifecycleState::Active => 2,
        LifecycleState::Started => 3,
    }
}

fn state_from_code(code: u8) -> Option<LifecycleState> {
    Some(match code {
        0 => LifecycleState::Created,
        1 => LifecycleState::Inactive,
        2 => LifecycleState::Active,
        3 => LifecycleState::Started,
        _ => return None,
    })
}

fn transition_code(t: Transition) -> u8 {
    match t {
        Transition::Setup => 0,
        Transition::Activate => 1,
        Transition::Suspend => 2,
        Transition::Start => 3,
        Transition::End => 4,
    }
}

fn phase_code(p: TouchPhase) -> u8 {
    match p {
        TouchPhase::Down => 0,
        TouchPhase::Move => 1,
        TouchPhase::Up => 2,
        TouchPhase::Cancel => 3,
    }
}

impl TraceSink for RecorderSink {
    fn on_setup(&mut self, e: &SetupEvent) {
        self.write_u8(TAG_SETUP);
        self.write_u32(e.layer_count);
        self.write_state(e.state);
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.write_u8(TAG_RESIZE);
        self.write_u32(e.width);
        self.write_u32(e.height);
        self.write_option_f32(e.aspect);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u8(transition_code(e.transition));
        self.write_state(e.from);
        self.write_option_state(e.to);
    }

    fn on_layer_change(&mut self, e: &LayerChangeEvent) {
        self.write_u8(TAG_LAYER_CHANGE);
        match e.change {
            LayerChange::Added(id) => {
                self.write_u8(CHANGE_ADDED);
                self.write_i32(id);
            }
            LayerChange::Replaced(id) => {
                self.write_u8(CHANGE_REPLACED);
                self.write_i32(id);
            }
            LayerChange::Removed(id) => {
                self.write_u8(CHANGE_REMOVED);
                self.write_i32(id);
            }
            LayerChange::Cleared { dropped } => {
                self.write_u8(CHANGE_CLEARED);
                self.write_u32(dropped);
            }
        }
        self.write_u32(e.layer_count);
    }

    fn on_touch(&mut self, e: &TouchDispatchEvent) {
        self.write_u8(TAG_TOUCH);
        self.write_u32(e.pointer.0);
        self.write_u8(phase_code(e.phase));
        self.write_f64(e.position.x);
        self.write_f64(e.position.y);
        self.write_u32(e.visited);
        self.write_option_i32(e.handled_by);
    }

    fn on_context_changed(&mut self, e: &ContextChangedEvent) {
        self.write_u8(TAG_CONTEXT_CHANGED);
        self.write_u32(e.layer_count);
    }

    fn on_back_key(&mut self, e: &BackKeyEvent) {
        self.write_u8(TAG_BACK_KEY);
        self.write_u8(u8::from(e.handled));
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.write_u8(TAG_DEFERRED);
        self.write_u32(e.applied);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`SetupEvent`].
    Setup(SetupEvent),
    /// A [`ResizeEvent`].
    Resize(ResizeEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`LayerChangeEvent`].
    LayerChange(LayerChangeEvent),
    /// A [`TouchDispatchEvent`].
    Touch(TouchDispatchEvent),
    /// A [`ContextChangedEvent`].
    ContextChanged(ContextChangedEvent),
    /// A [`BackKeyEvent`].
    BackKey(BackKeyEvent),
    /// A [`DeferredEvent`].
    Deferred(DeferredEvent),
}

impl RecordedEvent {
    /// Short event name, used as the JSON `name` field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Setup(_) => "Setup",
            Self::Resize(_) => "Resize",
            Self::Transition(_) => "Transition",
            Self::LayerChange(_) => "LayerChange",
            Self::Touch(_) => "Touch",
            Self::ContextChanged(_) => "ContextChanged",
            Self::BackKey(_) => "BackKey",
            Self::Deferred(_) => "Deferred",
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_option_f32(&mut self) -> Option<Option<f32>> {
        let present = self.read_u8()?;
        let bits = self.read_u32()?;
        Some((present != 0).then(|| f32::from_bits(bits)))
    }

    fn read_option_i32(&mut self) -> Option<Option<i32>> {
        let present = self.read_u8()?;
        let v = self.read_i32()?;
        Some((present != 0).then_some(v))
    }

    fn read_state(&mut self) -> Option<LifecycleState> {
        state_from_code(self.read_u8()?)
    }

    fn read_option_state(&mut self) -> Option<Option<LifecycleState>> {
        match self.read_u8()? {
            0 => Some(None),
            code => state_from_code(code - 1).map(Some),
        }
    }

    fn read_transition(&mut self) -> Option<Transition> {
        Some(match self.read_u8()? {
            0 => Transition::Setup,
            1 => Transition::Activate,
            2 => Transition::Suspend,
            3 => Transition::Start,
            4 => Transition::End,
            _ => return None,
        })
    }

    fn read_phase(&mut self) -> Option<TouchPhase> {
        Some(match self.read_u8()? {
            0 => TouchPhase::Down,
            1 => TouchPhase::Move,
            2 => TouchPhase::Up,
            3 => TouchPhase::Cancel,
            _ => return None,
        })
    }

    fn decode_setup(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Setup(SetupEvent {
            layer_count: self.read_u32()?,
            state: self.read_state()?,
        }))
    }

    fn decode_resize(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Resize(ResizeEvent {
            width: self.read_u32()?,
            height: self.read_u32()?,
            aspect: self.read_option_f32()?,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            transition: self.read_transition()?,
            from: self.read_state()?,
            to: self.read_option_state()?,
        }))
    }

    fn decode_layer_change(&mut self) -> Option<RecordedEvent> {
        let change = match self.read_u8()? {
            CHANGE_ADDED => LayerChange::Added(self.read_i32()?),
            CHANGE_REPLACED => LayerChange::Replaced(self.read_i32()?),
            CHANGE_REMOVED => LayerChange::Removed(self.read_i32()?),
            CHANGE_CLEARED => LayerChange::Cleared {
                dropped: self.read_u32()?,
            },
            _ => return None,
        };
        Some(RecordedEvent::LayerChange(LayerChangeEvent {
            change,
            layer_count: self.read_u32()?,
        }))
    }

    fn decode_touch(&mut self) -> Option<RecordedEvent> {
        let pointer = PointerId(self.read_u32()?);
        let phase = self.read_phase()?;
        let x = self.read_f64()?;
        let y = self.read_f64()?;
        Some(RecordedEvent::Touch(TouchDispatchEvent {
            pointer,
            phase,
            position: (x, y).into(),
            visited: self.read_u32()?,
            handled_by: self.read_option_i32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SETUP => self.decode_setup(),
            TAG_RESIZE => self.decode_resize(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_LAYER_CHANGE => self.decode_layer_change(),
            TAG_TOUCH => self.decode_touch(),
            TAG_CONTEXT_CHANGED => Some(RecordedEvent::ContextChanged(ContextChangedEvent {
                layer_count: self.read_u32()?,
            })),
            TAG_BACK_KEY => Some(RecordedEvent::BackKey(BackKeyEvent {
                handled: self.read_u8()? != 0,
            })),
            TAG_DEFERRED => Some(RecordedEvent::Deferred(DeferredEvent {
                applied: self.read_u32()?,
            })),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
