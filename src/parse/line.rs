// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use std::fmt::{self, Debug, Formatter};

/// Bookkeeping for the line currently being reconstructed.
///
/// All offsets are signed so the driver can synthesize an LF at virtual
/// offset `-1` to flush the final (leftmost) line, and so `end` may be
/// assigned `index - 1` unconditionally after every emission, even when
/// `index` is `0`.
///
/// `end` is the inclusive offset of the line's last content byte and is
/// valid while the line is in progress. `start` is assigned only at line
/// completion, from the offset just right of the delimiting LF. `colon`
/// and `comma` hold the earliest occurrence of those bytes in the line:
/// the scan runs from high offsets to low, so plain overwrites converge
/// on the lowest position.
pub(crate) struct LineState {
    pub(crate) colon: i64,
    pub(crate) comma: i64,
    pub(crate) start: i64,
    pub(crate) end: i64,
}

impl LineState {
    /// Sentinel for an offset that has not been seen in the current line.
    pub(crate) const INVALID: i64 = i64::MAX;

    #[inline(always)]
    pub(crate) fn new() -> Self {
        LineState {
            colon: Self::INVALID,
            comma: Self::INVALID,
            start: Self::INVALID,
            end: Self::INVALID,
        }
    }

    /// Clears all four offsets. Called after each line emission, before
    /// `end` is re-seeded for the next (earlier) line.
    #[inline(always)]
    pub(crate) fn reset(&mut self) {
        *self = LineState::new();
    }

    #[inline(always)]
    pub(crate) fn has_colon(&self) -> bool {
        self.colon != Self::INVALID
    }

    #[inline(always)]
    pub(crate) fn has_comma(&self) -> bool {
        self.comma != Self::INVALID
    }
}

impl Debug for LineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        struct Offset(i64);
        impl Debug for Offset {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                if self.0 == LineState::INVALID {
                    f.write_str("invalid")
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }
        f.debug_struct("LineState")
            .field("colon", &Offset(self.colon))
            .field("comma", &Offset(self.comma))
            .field("start", &Offset(self.start))
            .field("end", &Offset(self.end))
            .finish()
    }
}
