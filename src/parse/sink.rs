// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use thiserror::Error;

/// A structural error that stops the scan.
///
/// The first error ends the parse; there is no recovery. HLS manifests are
/// short, so surfacing the first error and letting the caller decide beats
/// attempting repair in a scanner whose state depends on bytes it has not
/// visited yet.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum ScanError {
    /// A tag had a `:` with no bytes after it, as in `#EXT-X-KEY:`.
    #[error("tag has ':' but no data after it")]
    MissingTagData,
    /// An `#EXTINF` line had no `:` at all. The duration is mandatory, so
    /// the separator is too.
    #[error("EXTINF tag has no ':' separator")]
    MissingTagDataForExtInf,
}

/// Receiver for scan events.
///
/// All payloads borrow from the input buffer for its full lifetime `'buf`,
/// so an implementation may retain them without copying. Callbacks arrive
/// in reverse document order: the last line of the buffer is delivered
/// first. Callers that want document order reverse the sequence themselves.
///
/// Exactly one of [`Sink::on_parse_complete`] or [`Sink::on_parse_error`]
/// ends a parse, unless the sink cancels by returning `false` from
/// [`Sink::on_uri`], in which case neither is called.
pub trait Sink<'buf> {
    /// A line that began with `#` but did not match `#EXT`. The payload
    /// excludes the leading `#` and may be empty.
    fn on_comment(&mut self, comment: &'buf [u8]);

    /// A non-blank line that did not begin with `#`. Return `false` to
    /// stop the parse immediately; no further callbacks follow.
    fn on_uri(&mut self, uri: &'buf [u8]) -> bool;

    /// A `#NAME` tag with no `:`. The name excludes the leading `#`.
    fn on_tag_no_value(&mut self, name: &'buf [u8]);

    /// A `#NAME:VALUE` tag. The name excludes the leading `#`; the value
    /// is everything after the first `:` and is never empty.
    fn on_tag_with_value(&mut self, name: &'buf [u8], value: &'buf [u8]);

    /// An `#EXTINF:DURATION[,TITLE]` tag. `duration` is the subrange of
    /// `value` before the first `,` after the `:`, or all of `value` when
    /// there is no such comma.
    fn on_extinf(&mut self, name: &'buf [u8], duration: &'buf [u8], value: &'buf [u8]);

    /// Normal end of input. Not called after an error or a cancellation.
    fn on_parse_complete(&mut self);

    /// A structural error ended the parse.
    fn on_parse_error(&mut self, error: ScanError);
}
