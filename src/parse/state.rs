// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use static_assertions::{assert_eq_size, const_assert_eq};

/// The state of the reverse scan.
///
/// The scan starts in [`State::Scanning`] and visits bytes from the end of
/// the buffer toward the start, so multi-byte tokens are recognized from
/// their last byte to their first. `#EXTINF` is confirmed by seeing `F`,
/// `N`, `I`, `T`, `X`, `E`, `#` in that visiting order, and `#EXT` by `T`,
/// `X`, `E`, `#`. A byte that breaks a partial match drops the scan back to
/// `Scanning`, and the dispatch table guarantees that byte still receives
/// the bookkeeping `Scanning` would have given it.
///
/// The two terminal states have no dispatch rows; the driver exits before
/// consulting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub(crate) enum State {
    /// Reading a line's body from right to left.
    Scanning = 0,
    /// Saw `T`, which may be the tail of `#EXT`.
    LookingForXForExt,
    /// Saw `XT`.
    LookingForEForExt,
    /// Saw `EXT`.
    LookingForHashForExt,
    /// Saw `#EXT`; an LF to the left completes a tag line.
    LookingForNewLineForExt,
    /// Saw a bare `#`; an LF to the left completes a comment line.
    LookingForNewLineForComment,
    /// Saw `F`, which may be the tail of `#EXTINF`.
    LookingForNForExtInf,
    /// Saw `NF`.
    LookingForIForExtInf,
    /// Saw `INF`.
    LookingForTForExtInf,
    /// Saw `TINF`.
    LookingForXForExtInf,
    /// Saw `XTINF`.
    LookingForEForExtInf,
    /// Saw `EXTINF`.
    LookingForHashForExtInf,
    /// Saw `#EXTINF`; an LF to the left completes an EXTINF line.
    LookingForNewLineForExtInf,
    /// The sink asked to stop. Terminal, not an error.
    EarlyExit,
    /// A structural error was reported. Terminal.
    ErrorEarlyExit,
}

/// Number of states that scan bytes, and the row count of the dispatch
/// table. The terminal states are excluded.
pub(crate) const SCAN_STATE_COUNT: usize = 13;

const_assert_eq!(State::EarlyExit as usize, SCAN_STATE_COUNT);
assert_eq_size!(State, u8);

impl State {
    /// Whether the driver must stop without consulting the dispatch table.
    #[inline(always)]
    pub(crate) fn is_terminal(self) -> bool {
        self as u8 >= SCAN_STATE_COUNT as u8
    }
}
