// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    BackKeyEvent, ContextChangedEvent, DeferredEvent, LayerChange, LayerChangeEvent,
    ResizeEvent, SetupEvent, TouchDispatchEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_setup(&mut self, e: &SetupEvent) {
        let _ = writeln!(
            self.writer,
            "[setup] layers={} state={:?}",
            e.layer_count, e.state,
        );
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let _ = match e.aspect {
            Some(aspect) => writeln!(
                self.writer,
                "[resize] {}x{} aspect={aspect:.4}",
                e.width, e.height,
            ),
            None => writeln!(self.writer, "[resize] {}x{} rejected", e.width, e.height),
        };
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = match e.to {
            Some(to) => writeln!(
                self.writer,
                "[lifecycle] {:?}: {:?} -> {to:?}",
                e.transition, e.from,
            ),
            None => writeln!(
                self.writer,
                "[lifecycle] {:?}: rejected in {:?}",
                e.transition, e.from,
            ),
        };
    }

    fn on_layer_change(&mut self, e: &LayerChangeEvent) {
        let _ = match e.change {
            LayerChange::Added(id) => writeln!(
                self.writer,
                "[layers] added id={id} count={}",
                e.layer_count
            ),
            LayerChange::Replaced(id) => writeln!(
                self.writer,
                "[layers] replaced id={id} count={}",
                e.layer_count
            ),
            LayerChange::Removed(id) => writeln!(
                self.writer,
                "[layers] removed id={id} count={}",
                e.layer_count
            ),
            LayerChange::Cleared { dropped } => {
                writeln!(self.writer, "[layers] cleared dropped={dropped}")
            }
        };
    }

    fn on_touch(&mut self, e: &TouchDispatchEvent) {
        let handled = match e.handled_by {
            Some(id) => format!("handled_by={id}"),
            None => "unhandled".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[touch] pointer={} {:?} at ({:.1}, {:.1}) visited={} {handled}",
            e.pointer.0, e.phase, e.position.x, e.position.y, e.visited,
        );
    }

    fn on_context_changed(&mut self, e: &ContextChangedEvent) {
        let _ = writeln!(self.writer, "[context] layers={}", e.layer_count);
    }

    fn on_back_key(&mut self, e: &BackKeyEvent) {
        let _ = writeln!(self.writer, "[back] handled={}", e.handled);
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        let _ = writeln!(self.writer, "[deferred] applied={}", e.applied);
    }
}
