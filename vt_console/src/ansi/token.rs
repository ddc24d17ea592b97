// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! One decoded unit of terminal input, and the wire form of the sequences this crate
//! emits.
//!
//! | Variant           | Wire form                                  |
//! |-------------------|--------------------------------------------|
//! | [`Token::ByteRun`]| plain bytes, never a control / ESC / CSI byte |
//! | [`Token::Control`]| one byte in `0x00..=0x1F` or `0x7F`        |
//! | [`Token::Escape`] | `ESC x` or `ESC x payload`                 |
//! | [`Token::Csi`]    | `ESC [ a1 ; a2 ... final`                  |

use crate::{CSI_ARG_SEPARATOR, CSI_BRACKET, ESC, ESC_PAYLOAD_INTRODUCERS};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use strum_macros::{Display as StrumDisplay, EnumIter};

/// Most CSI sequences seen on input carry at most two arguments (`row ; col`).
pub type CsiArgs = SmallVec<[u16; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Maximal run of bytes that are neither control bytes nor sequence introducers.
    ByteRun(Vec<u8>),
    /// A lone control byte that does not start a sequence.
    Control(u8),
    Escape(EscSequence),
    Csi(CsiSequence),
}

/// Field-less mirror of [`Token`]. The [`Display`] impl is the short tag used in logs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum TokenKind {
    #[strum(serialize = "BTS")]
    ByteRun,
    #[strum(serialize = "CTL")]
    Control,
    #[strum(serialize = "ESC")]
    Escape,
    #[strum(serialize = "CSI")]
    Csi,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::ByteRun(_) => TokenKind::ByteRun,
            Token::Control(_) => TokenKind::Control,
            Token::Escape(_) => TokenKind::Escape,
            Token::Csi(_) => TokenKind::Csi,
        }
    }

    /// Serialize back to the bytes this token was decoded from. For sequences this is
    /// the canonical wire form (7-bit `ESC [` introducer, every arg written out).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Token::ByteRun(bytes) => bytes.clone(),
            Token::Control(byte) => vec![*byte],
            Token::Escape(esc) => esc.to_bytes(),
            Token::Csi(csi) => csi.to_string().into_bytes(),
        }
    }

    #[must_use]
    pub fn as_csi(&self) -> Option<&CsiSequence> {
        match self {
            Token::Csi(csi) => Some(csi),
            _ => None,
        }
    }

    /// `true` for a CSI token whose final character is `final_char`.
    #[must_use]
    pub fn is_csi_with_final(&self, final_char: u8) -> bool {
        matches!(self, Token::Csi(csi) if csi.final_char == final_char)
    }
}

impl From<CsiSequence> for Token {
    fn from(csi: CsiSequence) -> Self { Token::Csi(csi) }
}

impl From<EscSequence> for Token {
    fn from(esc: EscSequence) -> Self { Token::Escape(esc) }
}

/// Two or three byte escape sequence other than CSI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EscSequence {
    pub introducer: u8,
    pub payload: Option<u8>,
}

impl EscSequence {
    #[must_use]
    pub fn new(introducer: u8) -> Self {
        Self {
            introducer,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(introducer: u8, payload: u8) -> Self {
        Self {
            introducer,
            payload: Some(payload),
        }
    }

    /// Character set and line attribute selectors (`% # ( )`) are followed by one more
    /// byte.
    #[must_use]
    pub fn takes_payload(introducer: u8) -> bool {
        ESC_PAYLOAD_INTRODUCERS.contains(&introducer)
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut acc = vec![ESC, self.introducer];
        acc.extend(self.payload);
        acc
    }
}

/// Control Sequence Introducer command: numeric arguments and a final character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSequence {
    pub final_char: u8,
    pub args: CsiArgs,
}

impl CsiSequence {
    #[must_use]
    pub fn new(final_char: u8, args: &[u16]) -> Self {
        Self {
            final_char,
            args: SmallVec::from_slice(args),
        }
    }

    /// Argument at `index`, or `default` when the sequence has fewer arguments.
    #[must_use]
    pub fn arg_at(&self, index: usize, default: u16) -> u16 {
        self.args.get(index).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn arg(&self, index: usize) -> u16 { self.arg_at(index, 0) }
}

/// Renders the wire form: `ESC [ a1 ; a2 ... final`.
impl Display for CsiSequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(ESC), char::from(CSI_BRACKET))?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", char::from(CSI_ARG_SEPARATOR))?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, "{}", char::from(self.final_char))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CHA_CURSOR_COLUMN, DSR_DEVICE_STATUS, HVP_CURSOR_POSITION};
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_csi_wire_form() {
        let csi = CsiSequence::new(HVP_CURSOR_POSITION, &[12, 40]);
        assert_eq!(csi.to_string(), "\x1b[12;40f");

        let csi = CsiSequence::new(DSR_DEVICE_STATUS, &[6]);
        assert_eq!(Token::from(csi).to_bytes(), b"\x1b[6n".to_vec());

        let csi = CsiSequence::new(b'm', &[]);
        assert_eq!(csi.to_string(), "\x1b[m");
    }

    #[test]
    fn test_csi_arg_defaults() {
        let csi = CsiSequence::new(CHA_CURSOR_COLUMN, &[7]);
        assert_eq!(csi.arg(0), 7);
        assert_eq!(csi.arg(1), 0);
        assert_eq!(csi.arg_at(1, 1), 1);
    }

    #[test]
    fn test_esc_wire_form() {
        assert_eq!(EscSequence::new(b'c').to_bytes(), b"\x1bc".to_vec());
        assert_eq!(
            EscSequence::with_payload(b'(', b'B').to_bytes(),
            b"\x1b(B".to_vec()
        );
        assert!(EscSequence::takes_payload(b'#'));
        assert!(!EscSequence::takes_payload(b'7'));
    }

    #[test]
    fn test_token_kind_tags() {
        let tags: Vec<String> = TokenKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(tags, vec!["BTS", "CTL", "ESC", "CSI"]);
        assert_eq!(Token::Control(0x03).kind(), TokenKind::Control);
        assert_eq!(Token::ByteRun(b"ab".to_vec()).to_bytes(), b"ab".to_vec());
    }
}
