// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Code point helpers over raw byte slices. The line editor stores its text as bytes
//! (exactly as received) and moves the cursor one code point at a time. Bytes that are
//! not part of a well formed UTF-8 sequence count as one code point each, so the cursor
//! can always make progress.

use unicode_width::UnicodeWidthStr;

const MAX_UTF8_LEN: usize = 4;

fn is_continuation_byte(byte: u8) -> bool { byte & 0b1100_0000 == 0b1000_0000 }

/// Byte length of the first code point in `bytes`, `0` when empty.
#[must_use]
pub fn first_code_point_len(bytes: &[u8]) -> usize {
    let Some(&lead) = bytes.first() else {
        return 0;
    };
    let expected = match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return 1,
    };
    match bytes.get(..expected) {
        Some(candidate) if std::str::from_utf8(candidate).is_ok() => expected,
        _ => 1,
    }
}

/// Byte length of the last code point in `bytes`, `0` when empty.
#[must_use]
pub fn last_code_point_len(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let floor = bytes.len().saturating_sub(MAX_UTF8_LEN);
    let mut start = bytes.len() - 1;
    while start > floor && is_continuation_byte(bytes[start]) {
        start -= 1;
    }
    let candidate = &bytes[start..];
    match std::str::from_utf8(candidate) {
        Ok(it) if it.chars().count() == 1 => candidate.len(),
        _ => 1,
    }
}

/// Number of code points in `bytes`.
#[must_use]
pub fn code_point_count(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut rest = bytes;
    while !rest.is_empty() {
        rest = &rest[first_code_point_len(rest)..];
        count += 1;
    }
    count
}

/// Byte offset of the code point at `index`, clamped to `bytes.len()`.
#[must_use]
pub fn code_point_offset(bytes: &[u8], index: usize) -> usize {
    let mut offset = 0;
    for _ in 0..index {
        if offset >= bytes.len() {
            break;
        }
        offset += first_code_point_len(&bytes[offset..]);
    }
    offset
}

/// Terminal columns occupied by `bytes` once rendered.
#[must_use]
pub fn display_width(bytes: &[u8]) -> usize { String::from_utf8_lossy(bytes).width() }
