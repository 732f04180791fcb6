// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use static_assertions::const_assert_eq;

use crate::parse::{
    handlers::{self, Handler},
    State, SCAN_STATE_COUNT,
};

/// The dispatch table: one row per scanning state, one cell per byte value.
///
/// Every cell holds a real handler; there are no unreachable entries. A row
/// for a partial token match is the `Scanning` row with only the expected
/// next byte overridden, so a mismatching byte performs exactly the
/// bookkeeping `Scanning` would have performed for it. The rows for the
/// states that await an LF override only the LF cell with their completion
/// handler. The table is immutable after construction and shared by all
/// parses in the process.
pub(super) static TABLE: [[Handler; 256]; SCAN_STATE_COUNT] = build();

const_assert_eq!(SCAN_STATE_COUNT, 13);

const fn scanning_row() -> [Handler; 256] {
    let mut row = [handlers::no_op as Handler; 256];
    row[b':' as usize] = handlers::record_colon;
    row[b',' as usize] = handlers::record_comma;
    row[b'\n' as usize] = handlers::complete_uri;
    row[b'F' as usize] = handlers::found_f_and_look_for_n_for_extinf;
    row[b'T' as usize] = handlers::found_t_and_look_for_x_for_ext;
    row[b'#' as usize] = handlers::found_hash_and_look_for_newline_for_comment;
    row
}

/// A row that is one step into a token match: the expected byte advances
/// the match, everything else falls back to the `Scanning` behavior.
const fn prefix_row(expected: u8, advance: Handler) -> [Handler; 256] {
    let mut row = scanning_row();
    row[expected as usize] = advance;
    row
}

/// A row for a fully matched prefix awaiting its line-terminating LF.
const fn completion_row(complete: Handler) -> [Handler; 256] {
    let mut row = scanning_row();
    row[b'\n' as usize] = complete;
    row
}

const fn build() -> [[Handler; 256]; SCAN_STATE_COUNT] {
    let mut table = [scanning_row(); SCAN_STATE_COUNT];
    table[State::LookingForXForExt as usize] =
        prefix_row(b'X', handlers::found_x_and_look_for_e_for_ext);
    table[State::LookingForEForExt as usize] =
        prefix_row(b'E', handlers::found_e_and_look_for_hash_for_ext);
    table[State::LookingForHashForExt as usize] =
        prefix_row(b'#', handlers::found_hash_and_look_for_newline_for_ext);
    table[State::LookingForNewLineForExt as usize] =
        completion_row(handlers::complete_ext_tag);
    table[State::LookingForNewLineForComment as usize] =
        completion_row(handlers::complete_comment);
    table[State::LookingForNForExtInf as usize] =
        prefix_row(b'N', handlers::found_n_and_look_for_i_for_extinf);
    table[State::LookingForIForExtInf as usize] =
        prefix_row(b'I', handlers::found_i_and_look_for_t_for_extinf);
    table[State::LookingForTForExtInf as usize] =
        prefix_row(b'T', handlers::found_t_and_look_for_x_for_extinf);
    table[State::LookingForXForExtInf as usize] =
        prefix_row(b'X', handlers::found_x_and_look_for_e_for_extinf);
    table[State::LookingForEForExtInf as usize] =
        prefix_row(b'E', handlers::found_e_and_look_for_hash_for_extinf);
    table[State::LookingForHashForExtInf as usize] =
        prefix_row(b'#', handlers::found_hash_and_look_for_newline_for_extinf);
    table[State::LookingForNewLineForExtInf as usize] =
        completion_row(handlers::complete_extinf_tag);
    table
}
