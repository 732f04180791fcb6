// Copyright (C) Thalia Archibald. All rights reserved.
//
// This file is part of fast-m3u8, distributed under the GPL 2.0 with a
// linking exception. For the full terms, see the included COPYING file.

/// A rational time value whose denominator is a power of ten.
///
/// EXTINF durations are decimal strings like `5.006`. Converting them
/// through floating point would make segment arithmetic drift, so they are
/// kept as an integer count of `1/timescale` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaledTime {
    /// Count of `1/timescale` units. Negative values are representable;
    /// the grammar admits a leading `-`.
    pub value: i64,
    /// Units per second: `10^decimal_places`, between `1` and `10^9`.
    pub timescale: i32,
}

/// Powers of ten representable in the fractional precision range.
const POWERS_OF_TEN: [i64; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

#[inline(always)]
fn pow10(exp: u8) -> Option<i64> {
    POWERS_OF_TEN.get(exp as usize).copied()
}

impl ScaledTime {
    /// Reads a decimal time from the front of `bytes`, preserving
    /// `decimal_places` fractional digits (at most nine).
    ///
    /// The recognized form is optional whitespace, an optional `-`, one or
    /// more digits, and optionally a `.` followed by at least one digit.
    /// Up to nine fractional digits are consumed; further precision is
    /// truncated toward zero. A trailing `.` with no digits, an empty
    /// input, `decimal_places > 9`, and 64-bit overflow all yield `None`.
    ///
    /// The second element of the pair is the first unconsumed byte onward,
    /// set on failure too, so callers can parse concatenated values.
    pub fn parse(bytes: &[u8], decimal_places: u8) -> (Option<ScaledTime>, &[u8]) {
        let Some(timescale) = pow10(decimal_places) else {
            return (None, bytes);
        };

        let mut rest = bytes;
        while let [b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r', tail @ ..] = rest {
            rest = tail;
        }
        let negative = if let [b'-', tail @ ..] = rest {
            rest = tail;
            true
        } else {
            false
        };

        let mut integral: Option<i64> = Some(0);
        let mut saw_digit = false;
        while let [byte @ b'0'..=b'9', tail @ ..] = rest {
            saw_digit = true;
            integral = integral
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add((byte - b'0') as i64));
            rest = tail;
        }
        if !saw_digit {
            return (None, bytes);
        }

        let mut frac = 0i64;
        let mut frac_digits = 0u8;
        if let [b'.', tail @ ..] = rest {
            rest = tail;
            while frac_digits < 9 {
                let [byte @ b'0'..=b'9', tail @ ..] = rest else {
                    break;
                };
                frac = frac * 10 + (byte - b'0') as i64;
                frac_digits += 1;
                rest = tail;
            }
            if frac_digits == 0 {
                // "5." is rejected; the dot stays consumed.
                return (None, rest);
            }
        }

        let value = combine(integral, frac, frac_digits, timescale, negative);
        match value {
            Some(value) => {
                let time = ScaledTime {
                    value,
                    timescale: timescale as i32,
                };
                (Some(time), rest)
            }
            None => (None, rest),
        }
    }

    /// The value in seconds, for display and rough comparisons. Exact
    /// arithmetic should stay in `value`/`timescale` units.
    #[inline]
    pub fn seconds(&self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }
}

fn combine(
    integral: Option<i64>,
    frac: i64,
    frac_digits: u8,
    timescale: i64,
    negative: bool,
) -> Option<i64> {
    let mut value = integral?.checked_mul(timescale)?;
    if frac_digits > 0 {
        // frac < 10^9 and timescale <= 10^9, so the product stays below
        // 10^18 and fits i64; the division by a smaller power of ten is
        // exact or truncates toward zero.
        let scaled = frac * timescale / pow10(frac_digits)?;
        value = value.checked_add(scaled)?;
    }
    if negative {
        value = value.checked_neg()?;
    }
    Some(value)
}
