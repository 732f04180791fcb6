// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Materialized scan events, for callers that want lines as data rather
//! than callbacks.

use std::fmt::{self, Debug, Formatter};

use bstr::{BStr, BString, ByteSlice};

use crate::{
    parse::{self, ScanError, Sink},
    time::ScaledTime,
};

/// Fractional digits preserved when reading an EXTINF duration. Segment
/// durations are conventionally written with millisecond precision.
const SEGMENT_DURATION_DECIMAL_PLACES: u8 = 3;

/// One line of a playlist, as delivered by the scanner.
///
/// Generic over the byte storage `B`: `&[u8]` borrowing the input buffer
/// during collection, or [`BString`] once [`ParseEvent::into_owned`] has
/// detached the event from the buffer. Names and comment bodies exclude
/// the leading `#`; URIs are whole lines.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ParseEvent<B> {
    /// A `#` line that is not a tag.
    Comment { body: B },
    /// A non-blank line that does not start with `#`.
    Uri { uri: B },
    /// `#NAME` with no colon.
    TagNoValue { name: B },
    /// `#NAME:VALUE`.
    TagWithValue { name: B, value: B },
    /// `#EXTINF:DURATION[,TITLE]`; `duration` is the subrange of `value`
    /// left of the first comma after the colon.
    ExtInf { name: B, duration: B, value: B },
}

impl<B> ParseEvent<B> {
    /// Converts the byte storage, preserving the variant.
    pub fn map<U>(self, mut f: impl FnMut(B) -> U) -> ParseEvent<U> {
        match self {
            ParseEvent::Comment { body } => ParseEvent::Comment { body: f(body) },
            ParseEvent::Uri { uri } => ParseEvent::Uri { uri: f(uri) },
            ParseEvent::TagNoValue { name } => ParseEvent::TagNoValue { name: f(name) },
            ParseEvent::TagWithValue { name, value } => ParseEvent::TagWithValue {
                name: f(name),
                value: f(value),
            },
            ParseEvent::ExtInf {
                name,
                duration,
                value,
            } => ParseEvent::ExtInf {
                name: f(name),
                duration: f(duration),
                value: f(value),
            },
        }
    }
}

impl<B: AsRef<[u8]>> ParseEvent<B> {
    /// For an EXTINF event, the duration as a rational time at millisecond
    /// precision. `None` for other variants and for durations that do not
    /// parse.
    pub fn segment_duration(&self) -> Option<ScaledTime> {
        match self {
            ParseEvent::ExtInf { duration, .. } => {
                ScaledTime::parse(duration.as_ref(), SEGMENT_DURATION_DECIMAL_PLACES).0
            }
            _ => None,
        }
    }
}

impl<'buf> ParseEvent<&'buf [u8]> {
    /// Copies the payload out of the input buffer.
    pub fn into_owned(self) -> ParseEvent<BString> {
        self.map(BString::from)
    }
}

impl<B: AsRef<[u8]>> Debug for ParseEvent<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn field<'a, B: AsRef<[u8]>>(bytes: &'a B) -> &'a BStr {
            bytes.as_ref().as_bstr()
        }
        match self {
            ParseEvent::Comment { body } => {
                f.debug_struct("Comment").field("body", &field(body)).finish()
            }
            ParseEvent::Uri { uri } => f.debug_struct("Uri").field("uri", &field(uri)).finish(),
            ParseEvent::TagNoValue { name } => f
                .debug_struct("TagNoValue")
                .field("name", &field(name))
                .finish(),
            ParseEvent::TagWithValue { name, value } => f
                .debug_struct("TagWithValue")
                .field("name", &field(name))
                .field("value", &field(value))
                .finish(),
            ParseEvent::ExtInf {
                name,
                duration,
                value,
            } => f
                .debug_struct("ExtInf")
                .field("name", &field(name))
                .field("duration", &field(duration))
                .field("value", &field(value))
                .finish(),
        }
    }
}

/// A sink that records every event, borrowing from the input buffer.
///
/// Events accumulate in callback order, which is reverse document order.
/// The collector never cancels, so after a parse the outcome is always
/// either completion or the first structural error.
#[derive(Debug, Default)]
pub struct EventCollector<'buf> {
    events: Vec<ParseEvent<&'buf [u8]>>,
    outcome: Option<Result<(), ScanError>>,
}

impl<'buf> EventCollector<'buf> {
    pub fn new() -> Self {
        EventCollector::default()
    }

    /// The events recorded so far, in callback (reverse document) order.
    pub fn events(&self) -> &[ParseEvent<&'buf [u8]>] {
        &self.events
    }

    /// `Some(Ok(()))` after completion, `Some(Err(_))` after a structural
    /// error, `None` while a parse is still running.
    pub fn outcome(&self) -> Option<Result<(), ScanError>> {
        self.outcome
    }

    /// The recorded events, or the error that ended the parse.
    pub fn into_events(self) -> Result<Vec<ParseEvent<&'buf [u8]>>, ScanError> {
        self.outcome.unwrap_or(Ok(()))?;
        Ok(self.events)
    }
}

impl<'buf> Sink<'buf> for EventCollector<'buf> {
    fn on_comment(&mut self, comment: &'buf [u8]) {
        self.events.push(ParseEvent::Comment { body: comment });
    }

    fn on_uri(&mut self, uri: &'buf [u8]) -> bool {
        self.events.push(ParseEvent::Uri { uri });
        true
    }

    fn on_tag_no_value(&mut self, name: &'buf [u8]) {
        self.events.push(ParseEvent::TagNoValue { name });
    }

    fn on_tag_with_value(&mut self, name: &'buf [u8], value: &'buf [u8]) {
        self.events.push(ParseEvent::TagWithValue { name, value });
    }

    fn on_extinf(&mut self, name: &'buf [u8], duration: &'buf [u8], value: &'buf [u8]) {
        self.events.push(ParseEvent::ExtInf {
            name,
            duration,
            value,
        });
    }

    fn on_parse_complete(&mut self) {
        self.outcome = Some(Ok(()));
    }

    fn on_parse_error(&mut self, error: ScanError) {
        self.outcome = Some(Err(error));
    }
}

/// Parses a manifest and returns its lines in document order.
///
/// This is the convenience entry point for callers that do not need a
/// custom [`Sink`]: events still borrow from `bytes`, only their order is
/// restored from the scanner's reverse delivery.
pub fn parse_events(bytes: &[u8]) -> Result<Vec<ParseEvent<&[u8]>>, ScanError> {
    let mut collector = EventCollector::new();
    parse::parse(bytes, &mut collector);
    let mut events = collector.into_events()?;
    events.reverse();
    Ok(events)
}
