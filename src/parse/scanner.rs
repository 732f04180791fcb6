// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use tracing::trace;

use crate::parse::{sink::Sink, table::TABLE, LineState, State};

/// Parses a playlist manifest, delivering every line to `sink`.
///
/// The buffer is scanned once, from its last byte to its first, with no
/// allocation; every payload handed to the sink is a subslice of `bytes`.
/// Because of the scan direction, callbacks arrive in reverse document
/// order.
///
/// The parse ends in exactly one of three ways: [`Sink::on_parse_complete`]
/// after the final (first-in-document) line, [`Sink::on_parse_error`] at
/// the first structural error, or silently when the sink returns `false`
/// from [`Sink::on_uri`]. An empty buffer completes immediately with no
/// line callbacks.
pub fn parse<'buf, S: Sink<'buf>>(bytes: &'buf [u8], sink: &mut S) {
    run(bytes, sink);
}

fn run<'buf>(bytes: &'buf [u8], sink: &mut dyn Sink<'buf>) {
    let mut index = bytes.len() as i64;
    let mut state = State::Scanning;
    let mut line = LineState::new();
    line.end = index - 1;

    trace!(len = bytes.len(), "beginning playlist scan");

    while index > 0 && !state.is_terminal() {
        index -= 1;
        let byte = bytes[index as usize];
        state = TABLE[state as usize][byte as usize](sink, bytes, byte, index, state, &mut line);
    }

    // The first line of the buffer has no LF to its left. Synthesize one at
    // a virtual offset of -1 to flush it, so its start resolves to 0.
    if index == 0 && !state.is_terminal() {
        state = TABLE[state as usize][b'\n' as usize](sink, bytes, b'\n', -1, state, &mut line);
    }

    // Terminal states already delivered their signal: an error was reported
    // through the sink, or the sink itself asked to stop.
    if !state.is_terminal() {
        trace!(len = bytes.len(), "playlist scan complete");
        sink.on_parse_complete();
    }
}
