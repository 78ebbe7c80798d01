// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Scene events carry no clock, so each record's position in the recording is
//! used as its timestamp: the viewer shows the session as an evenly spaced
//! sequence of instant events.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::trace::LayerChange;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, recorded)| {
            let (cat, args) = describe(&recorded);
            json!({
                "ph": "i",
                "name": recorded.name(),
                "cat": cat,
                "ts": seq,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": args,
            })
        })
        .collect();

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn describe(recorded: &RecordedEvent) -> (&'static str, Value) {
    match recorded {
        RecordedEvent::Setup(e) => (
            "Lifecycle",
            json!({
                "layer_count": e.layer_count,
                "state": format!("{:?}", e.state),
            }),
        ),
        RecordedEvent::Transition(e) => (
            "Lifecycle",
            json!({
                "transition": format!("{:?}", e.transition),
                "from": format!("{:?}", e.from),
                "to": e.to.map(|s| format!("{s:?}")),
            }),
        ),
        RecordedEvent::Resize(e) => (
            "Surface",
            json!({
                "width": e.width,
                "height": e.height,
                "aspect": e.aspect,
            }),
        ),
        RecordedEvent::ContextChanged(e) => (
            "Surface",
            json!({
                "layer_count": e.layer_count,
            }),
        ),
        RecordedEvent::LayerChange(e) => {
            let (change, id, dropped) = match e.change {
                LayerChange::Added(id) => ("added", Some(id), None),
                LayerChange::Replaced(id) => ("replaced", Some(id), None),
                LayerChange::Removed(id) => ("removed", Some(id), None),
                LayerChange::Cleared { dropped } => ("cleared", None, Some(dropped)),
            };
            (
                "Layers",
                json!({
                    "change": change,
                    "id": id,
                    "dropped": dropped,
                    "layer_count": e.layer_count,
                }),
            )
        }
        RecordedEvent::Deferred(e) => (
            "Layers",
            json!({
                "applied": e.applied,
            }),
        ),
        RecordedEvent::Touch(e) => (
            "Input",
            json!({
                "pointer": e.pointer.0,
                "phase": format!("{:?}", e.phase),
                "x": e.position.x,
                "y": e.position.y,
                "visited": e.visited,
                "handled_by": e.handled_by,
            }),
        ),
        RecordedEvent::BackKey(e) => (
            "Input",
            json!({
                "handled": e.handled,
            }),
        ),
    }
}
