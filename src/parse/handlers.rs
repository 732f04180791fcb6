// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use paste::paste;
use tracing::debug;

use crate::parse::{
    sink::{ScanError, Sink},
    LineState, State,
};

/// A cell of the dispatch table.
///
/// Given the byte at `index` and the state that selected this handler, a
/// handler may update the line bookkeeping, may call the sink, and returns
/// the next state. The sink receives subslices of `buf`, never copies.
pub(super) type Handler = for<'buf> fn(
    sink: &mut dyn Sink<'buf>,
    buf: &'buf [u8],
    byte: u8,
    index: i64,
    state: State,
    line: &mut LineState,
) -> State;

#[inline(always)]
fn slice<'buf>(buf: &'buf [u8], start: i64, end: i64) -> &'buf [u8] {
    // Emission offsets are derived from in-bounds byte positions, with
    // `start <= end <= buf.len()` by construction.
    &buf[start as usize..end as usize]
}

// Bookkeeping handlers, shared by every row.

pub(super) fn no_op<'buf>(
    _sink: &mut dyn Sink<'buf>,
    _buf: &'buf [u8],
    _byte: u8,
    _index: i64,
    _state: State,
    _line: &mut LineState,
) -> State {
    State::Scanning
}

/// Overwriting a previously seen colon is fine: only the one earliest in
/// the line matters, and the scan visits lower offsets later. A colon is
/// not evidence against a tag prefix, so the state is left unchanged.
pub(super) fn record_colon<'buf>(
    _sink: &mut dyn Sink<'buf>,
    _buf: &'buf [u8],
    _byte: u8,
    index: i64,
    state: State,
    line: &mut LineState,
) -> State {
    line.colon = index;
    state
}

/// Same contract as [`record_colon`], for the comma that splits an EXTINF
/// duration from its title.
pub(super) fn record_comma<'buf>(
    _sink: &mut dyn Sink<'buf>,
    _buf: &'buf [u8],
    _byte: u8,
    index: i64,
    state: State,
    line: &mut LineState,
) -> State {
    line.comma = index;
    state
}

/// LF while no tag or comment prefix is pending: the finished line is a
/// URI, unless nothing accumulated between two adjacent LFs (a blank line,
/// or the lone CR of a CRLF pair), which is skipped without emission.
pub(super) fn complete_uri<'buf>(
    sink: &mut dyn Sink<'buf>,
    buf: &'buf [u8],
    _byte: u8,
    index: i64,
    _state: State,
    line: &mut LineState,
) -> State {
    // The LF itself is not part of the line.
    line.start = index + 1;
    if line.end <= line.start {
        // A suppressed line can still have recorded a mark (a line holding
        // only ':' or ','); clear those too so they cannot leak into the
        // next line's ranges.
        line.reset();
        line.end = index - 1;
        return State::Scanning;
    }
    let keep_going = sink.on_uri(slice(buf, line.start, line.end + 1));
    line.reset();
    line.end = index - 1;
    if keep_going {
        State::Scanning
    } else {
        State::EarlyExit
    }
}

/// LF after a confirmed `#EXT` prefix: the finished line is a tag. With no
/// colon it carries no value; with one, the value must be non-empty. The
/// emitted name starts after the `#`.
pub(super) fn complete_ext_tag<'buf>(
    sink: &mut dyn Sink<'buf>,
    buf: &'buf [u8],
    _byte: u8,
    index: i64,
    _state: State,
    line: &mut LineState,
) -> State {
    line.start = index + 1;
    if !line.has_colon() {
        sink.on_tag_no_value(slice(buf, line.start + 1, line.end + 1));
    } else {
        if line.end - line.colon == 0 {
            debug!(index, "tag with ':' ends without data");
            sink.on_parse_error(ScanError::MissingTagData);
            return State::ErrorEarlyExit;
        }
        sink.on_tag_with_value(
            slice(buf, line.start + 1, line.colon),
            slice(buf, line.colon + 1, line.end + 1),
        );
    }
    line.reset();
    line.end = index - 1;
    State::Scanning
}

/// LF after a bare `#`: the finished line is a comment. The emitted body
/// starts after the `#` and may be empty.
pub(super) fn complete_comment<'buf>(
    sink: &mut dyn Sink<'buf>,
    buf: &'buf [u8],
    _byte: u8,
    index: i64,
    _state: State,
    line: &mut LineState,
) -> State {
    line.start = index + 1;
    sink.on_comment(slice(buf, line.start + 1, line.end + 1));
    line.reset();
    line.end = index - 1;
    State::Scanning
}

/// LF after a confirmed `#EXTINF` prefix. The colon is mandatory and the
/// value after it must be non-empty. The duration is bounded on the right
/// by the earliest comma, provided that comma sits inside the value; a
/// comma left of the colon cannot delimit the duration and is ignored.
pub(super) fn complete_extinf_tag<'buf>(
    sink: &mut dyn Sink<'buf>,
    buf: &'buf [u8],
    _byte: u8,
    index: i64,
    _state: State,
    line: &mut LineState,
) -> State {
    line.start = index + 1;
    if !line.has_colon() {
        debug!(index, "EXTINF line has no ':' separator");
        sink.on_parse_error(ScanError::MissingTagDataForExtInf);
        return State::ErrorEarlyExit;
    }
    if line.end - line.colon == 0 {
        debug!(index, "EXTINF line ends at its ':'");
        sink.on_parse_error(ScanError::MissingTagData);
        return State::ErrorEarlyExit;
    }
    let duration_end = if line.has_comma() && line.comma > line.colon {
        line.comma
    } else {
        line.end + 1
    };
    sink.on_extinf(
        slice(buf, line.start + 1, line.colon),
        slice(buf, line.colon + 1, duration_end),
        slice(buf, line.colon + 1, line.end + 1),
    );
    line.reset();
    line.end = index - 1;
    State::Scanning
}

// Prefix-advance handlers. Each consumes the byte named in its function
// name and moves one step further along a right-to-left token match.
macro_rules! advance_handlers {
    ($($byte:ident => $want:ident for $tag:ident;)*) => { paste! { $(
        pub(super) fn [<found_ $byte:lower _and_look_for_ $want:lower _for_ $tag:lower>]<'buf>(
            _sink: &mut dyn Sink<'buf>,
            _buf: &'buf [u8],
            _byte: u8,
            _index: i64,
            _state: State,
            _line: &mut LineState,
        ) -> State {
            State::[<LookingFor $want For $tag>]
        }
    )* } };
}

advance_handlers! {
    T => X for Ext;
    X => E for Ext;
    E => Hash for Ext;
    Hash => NewLine for Ext;
    F => N for ExtInf;
    N => I for ExtInf;
    I => T for ExtInf;
    T => X for ExtInf;
    X => E for ExtInf;
    E => Hash for ExtInf;
    Hash => NewLine for ExtInf;
    Hash => NewLine for Comment;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records callbacks as readable strings so tests can assert on exact
    /// sequences.
    struct Recorder {
        log: Vec<String>,
        keep_going: bool,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder {
                log: Vec::new(),
                keep_going: true,
            }
        }

        fn push(&mut self, entry: impl Into<String>) {
            self.log.push(entry.into());
        }
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    impl<'buf> Sink<'buf> for Recorder {
        fn on_comment(&mut self, comment: &'buf [u8]) {
            self.push(format!("comment({})", text(comment)));
        }

        fn on_uri(&mut self, uri: &'buf [u8]) -> bool {
            self.push(format!("uri({})", text(uri)));
            self.keep_going
        }

        fn on_tag_no_value(&mut self, name: &'buf [u8]) {
            self.push(format!("tag({})", text(name)));
        }

        fn on_tag_with_value(&mut self, name: &'buf [u8], value: &'buf [u8]) {
            self.push(format!("tag({}={})", text(name), text(value)));
        }

        fn on_extinf(&mut self, name: &'buf [u8], duration: &'buf [u8], value: &'buf [u8]) {
            self.push(format!(
                "extinf({}, dur={}, value={})",
                text(name),
                text(duration),
                text(value),
            ));
        }

        fn on_parse_complete(&mut self) {
            self.push("complete");
        }

        fn on_parse_error(&mut self, error: ScanError) {
            self.push(format!("error({error:?})"));
        }
    }

    fn line_over(buf: &[u8]) -> LineState {
        let mut line = LineState::new();
        line.end = buf.len() as i64 - 1;
        line
    }

    #[test]
    fn colon_and_comma_keep_the_current_state() {
        let mut sink = Recorder::new();
        let buf = b"#EXT:,";
        let mut line = line_over(buf);
        let state = record_colon(&mut sink, buf, b':', 4, State::LookingForNewLineForExt, &mut line);
        assert_eq!(state, State::LookingForNewLineForExt);
        assert_eq!(line.colon, 4);
        let state = record_comma(&mut sink, buf, b',', 5, State::Scanning, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(line.comma, 5);
        assert!(sink.log.is_empty());
    }

    #[test]
    fn earliest_colon_wins() {
        let mut sink = Recorder::new();
        let buf = b"#A:B:C";
        let mut line = line_over(buf);
        record_colon(&mut sink, buf, b':', 4, State::Scanning, &mut line);
        record_colon(&mut sink, buf, b':', 2, State::Scanning, &mut line);
        assert_eq!(line.colon, 2);
    }

    #[test]
    fn uri_line_is_emitted_and_state_reseeded() {
        let mut sink = Recorder::new();
        let buf = b"x\nseg.ts";
        let mut line = line_over(buf);
        let state = complete_uri(&mut sink, buf, b'\n', 1, State::Scanning, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["uri(seg.ts)"]);
        assert!(!line.has_colon());
        assert_eq!(line.end, 0);
    }

    #[test]
    fn blank_line_is_suppressed() {
        let mut sink = Recorder::new();
        let buf = b"a\n\nb";
        let mut line = line_over(buf);
        line.end = 1; // scanning just consumed the LF at offset 2
        let state = complete_uri(&mut sink, buf, b'\n', 1, State::Scanning, &mut line);
        assert_eq!(state, State::Scanning);
        assert!(sink.log.is_empty());
        assert_eq!(line.end, 0);
    }

    #[test]
    fn uri_cancellation_requests_early_exit() {
        let mut sink = Recorder::new();
        sink.keep_going = false;
        let buf = b"\nseg.ts";
        let mut line = line_over(buf);
        let state = complete_uri(&mut sink, buf, b'\n', 0, State::Scanning, &mut line);
        assert_eq!(state, State::EarlyExit);
        assert_eq!(sink.log, ["uri(seg.ts)"]);
    }

    #[test]
    fn tag_without_colon_has_no_value() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXTM3U";
        let mut line = line_over(buf);
        let state = complete_ext_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExt, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["tag(EXTM3U)"]);
    }

    #[test]
    fn tag_with_colon_splits_name_and_value() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXT-X-VERSION:3";
        let mut line = line_over(buf);
        line.colon = 15;
        let state = complete_ext_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExt, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["tag(EXT-X-VERSION=3)"]);
        assert!(!line.has_colon());
    }

    #[test]
    fn tag_with_trailing_colon_is_an_error() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXT-X-KEY:";
        let mut line = line_over(buf);
        line.colon = 11;
        let state = complete_ext_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExt, &mut line);
        assert_eq!(state, State::ErrorEarlyExit);
        assert_eq!(sink.log, ["error(MissingTagData)"]);
    }

    #[test]
    fn comment_body_excludes_the_hash() {
        let mut sink = Recorder::new();
        let buf = b"\n# hello";
        let mut line = line_over(buf);
        let state =
            complete_comment(&mut sink, buf, b'\n', 0, State::LookingForNewLineForComment, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["comment( hello)"]);
    }

    #[test]
    fn bare_hash_is_an_empty_comment() {
        let mut sink = Recorder::new();
        let buf = b"#";
        let mut line = line_over(buf);
        let state =
            complete_comment(&mut sink, buf, b'\n', -1, State::LookingForNewLineForComment, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["comment()"]);
        assert_eq!(line.end, -2);
    }

    #[test]
    fn extinf_with_comma_bounds_the_duration() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXTINF:5.0,title";
        let mut line = line_over(buf);
        line.colon = 8;
        line.comma = 12;
        let state =
            complete_extinf_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExtInf, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["extinf(EXTINF, dur=5.0, value=5.0,title)"]);
    }

    #[test]
    fn extinf_without_comma_uses_the_whole_value() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXTINF:5.0";
        let mut line = line_over(buf);
        line.colon = 8;
        let state =
            complete_extinf_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExtInf, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["extinf(EXTINF, dur=5.0, value=5.0)"]);
    }

    #[test]
    fn extinf_comma_left_of_colon_is_ignored() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXTINF,x:9";
        let mut line = line_over(buf);
        line.comma = 8;
        line.colon = 10;
        let state =
            complete_extinf_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExtInf, &mut line);
        assert_eq!(state, State::Scanning);
        assert_eq!(sink.log, ["extinf(EXTINF,x, dur=9, value=9)"]);
    }

    #[test]
    fn extinf_without_colon_is_an_error() {
        let mut sink = Recorder::new();
        let buf = b"\n#EXTINF";
        let mut line = line_over(buf);
        let state =
            complete_extinf_tag(&mut sink, buf, b'\n', 0, State::LookingForNewLineForExtInf, &mut line);
        assert_eq!(state, State::ErrorEarlyExit);
        assert_eq!(sink.log, ["error(MissingTagDataForExtInf)"]);
    }

    #[test]
    fn advance_handlers_step_the_match() {
        let mut sink = Recorder::new();
        let buf = b"#EXTINF";
        let mut line = line_over(buf);
        let state =
            found_f_and_look_for_n_for_extinf(&mut sink, buf, b'F', 6, State::Scanning, &mut line);
        assert_eq!(state, State::LookingForNForExtInf);
        let state =
            found_hash_and_look_for_newline_for_extinf(&mut sink, buf, b'#', 0, state, &mut line);
        assert_eq!(state, State::LookingForNewLineForExtInf);
        let state =
            found_t_and_look_for_x_for_ext(&mut sink, buf, b'T', 3, State::Scanning, &mut line);
        assert_eq!(state, State::LookingForXForExt);
        assert!(sink.log.is_empty());
    }
}
