// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte level vocabulary of the VT102 console protocol.
//!
//! See <https://man7.org/linux/man-pages/man4/console_codes.4.html>.

// Skip rustfmt for rest of file to preserve manual alignment.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// C0 control characters.

/// NUL control character.
pub const NUL: u8 = 0x00;
/// Bell. Written to signal that an edit had no effect.
pub const BEL: u8 = 0x07;
/// Backspace.
pub const BS: u8 = 0x08;
/// Horizontal tab.
pub const HT: u8 = 0x09;
/// Line feed.
pub const LF: u8 = 0x0A;
/// Carriage return.
pub const CR: u8 = 0x0D;
/// Escape, the introducer of every escape sequence.
pub const ESC: u8 = 0x1B;
/// Last byte of the C0 range.
pub const C0_LAST: u8 = 0x1F;
/// Delete. Sent by most terminals for the backspace key.
pub const DEL: u8 = 0x7F;
/// Single byte (8-bit) Control Sequence Introducer, equivalent to `ESC [`.
pub const CSI_8BIT: u8 = 0x9B;

/// Second byte of the 7-bit CSI introducer `ESC [`.
pub const CSI_BRACKET: u8 = b'[';
/// Separator between CSI numeric arguments.
pub const CSI_ARG_SEPARATOR: u8 = b';';

/// Escape introducers that carry one extra payload byte: `ESC % x`, `ESC # x`,
/// `ESC ( x`, `ESC ) x`.
pub const ESC_PAYLOAD_INTRODUCERS: [u8; 4] = [b'%', b'#', b'(', b')'];

/// Written after a line is submitted.
pub const NEW_LINE_SEQ: &[u8] = b"\r\n";

// CSI final characters.

/// CUU: move cursor up. Up arrow key.
pub const CUU_CURSOR_UP: u8 = b'A';
/// CUD: move cursor down. Down arrow key.
pub const CUD_CURSOR_DOWN: u8 = b'B';
/// CUF: move cursor right. Right arrow key.
pub const CUF_CURSOR_FORWARD: u8 = b'C';
/// CUB: move cursor left. Left arrow key.
pub const CUB_CURSOR_BACK: u8 = b'D';
/// CNL: move cursor down and to column 1.
pub const CNL_CURSOR_NEXT_LINE: u8 = b'E';
/// CPL: move cursor up and to column 1.
pub const CPL_CURSOR_PREV_LINE: u8 = b'F';
/// CHA: move cursor to the indicated column in the current row.
pub const CHA_CURSOR_COLUMN: u8 = b'G';
/// CUP: move cursor to row, column.
pub const CUP_CURSOR_POSITION: u8 = b'H';
/// EL: erase line. 0 = cursor to end, 1 = start to cursor, 2 = whole line.
pub const EL_ERASE_LINE: u8 = b'K';
/// HVP: move cursor to row, column.
pub const HVP_CURSOR_POSITION: u8 = b'f';
/// DSR: device status report.
pub const DSR_DEVICE_STATUS: u8 = b'n';
/// Final character of the cursor position report: `ESC [ row ; col R`.
pub const DSR_CURSOR_POSITION_RESPONSE: u8 = b'R';

// Parameters.

/// EL parameter: erase from cursor to end of line.
pub const EL_ERASE_TO_END: u16 = 0;
/// EL parameter: erase the whole line.
pub const EL_ERASE_ALL: u16 = 2;
/// DSR parameter: terminal status, answered with `ESC [ 0 n`.
pub const DSR_STATUS: u16 = 5;
/// DSR parameter: cursor position report, answered with `ESC [ row ; col R`.
pub const DSR_CURSOR_POSITION: u16 = 6;
