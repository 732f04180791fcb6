// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

//! Shared test sink that records callbacks as readable strings.

use fast_m3u8::{ScanError, Sink};

/// Records every callback in arrival order, optionally cancelling after a
/// set number of URIs.
pub struct Recorder {
    pub log: Vec<String>,
    stop_after_uris: Option<usize>,
    uris_seen: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder {
            log: Vec::new(),
            stop_after_uris: None,
            uris_seen: 0,
        }
    }

    pub fn stopping_after(uris: usize) -> Self {
        let mut recorder = Recorder::new();
        recorder.stop_after_uris = Some(uris);
        recorder
    }

    pub fn terminal_count(&self) -> usize {
        self.log
            .iter()
            .filter(|entry| *entry == "complete" || entry.starts_with("error("))
            .count()
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl<'buf> Sink<'buf> for Recorder {
    fn on_comment(&mut self, comment: &'buf [u8]) {
        self.log.push(format!("comment({})", text(comment)));
    }

    fn on_uri(&mut self, uri: &'buf [u8]) -> bool {
        self.log.push(format!("uri({})", text(uri)));
        self.uris_seen += 1;
        self.stop_after_uris.map_or(true, |n| self.uris_seen < n)
    }

    fn on_tag_no_value(&mut self, name: &'buf [u8]) {
        self.log.push(format!("tag({})", text(name)));
    }

    fn on_tag_with_value(&mut self, name: &'buf [u8], value: &'buf [u8]) {
        self.log.push(format!("tag({}={})", text(name), text(value)));
    }

    fn on_extinf(&mut self, name: &'buf [u8], duration: &'buf [u8], value: &'buf [u8]) {
        self.log.push(format!(
            "extinf({}|{}|{})",
            text(name),
            text(duration),
            text(value),
        ));
    }

    fn on_parse_complete(&mut self) {
        self.log.push("complete".into());
    }

    fn on_parse_error(&mut self, error: ScanError) {
        self.log.push(format!("error({error:?})"));
    }
}
