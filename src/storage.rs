// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;

use bstr::ByteSlice;
use static_assertions::assert_impl_all;

use crate::parse::{self, Sink};

/// Owned, immutable storage for manifest bytes.
///
/// The scanner borrows its input for the duration of a parse and borrowed
/// event payloads point into it, so something must keep the bytes alive
/// and unchanged for as long as those borrows exist. `PlaylistBuf` is that
/// owner: once constructed it cannot be mutated. Distinct buffers can be
/// parsed from different threads at the same time.
pub struct PlaylistBuf {
    bytes: Box<[u8]>,
}

assert_impl_all!(PlaylistBuf: Send, Sync);

impl PlaylistBuf {
    /// An empty buffer. Parsing it completes immediately.
    pub fn new() -> Self {
        PlaylistBuf { bytes: Box::new([]) }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parses this buffer into `sink`. Payloads borrow from `self`.
    pub fn parse<'buf, S: Sink<'buf>>(&'buf self, sink: &mut S) {
        parse::parse(self.as_bytes(), sink);
    }
}

impl Default for PlaylistBuf {
    fn default() -> Self {
        PlaylistBuf::new()
    }
}

impl From<Vec<u8>> for PlaylistBuf {
    fn from(bytes: Vec<u8>) -> Self {
        PlaylistBuf {
            bytes: bytes.into_boxed_slice(),
        }
    }
}

impl From<&[u8]> for PlaylistBuf {
    fn from(bytes: &[u8]) -> Self {
        PlaylistBuf {
            bytes: Box::from(bytes),
        }
    }
}

impl Deref for PlaylistBuf {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for PlaylistBuf {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for PlaylistBuf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlaylistBuf")
            .field(&self.bytes.as_bstr())
            .finish()
    }
}
