//! Sequence Scanner
//!
//! Incremental recognition of literal characters and complete CSI control
//! sequences in a chunk-fragmented byte stream. Bytes belonging to an
//! unresolved prefix (a partial `ESC [` sequence or a split UTF-8
//! character) stay pending across calls, which makes chunk boundaries
//! invisible to the caller.
//!
//! Only `ESC [` opens a sequence. Any other ESC-prefixed byte drops the
//! ESC and is re-decoded as literal text; OSC/DCS are deliberately not
//! parsed. The pending buffer has a fixed capacity: if it fills without a
//! terminator, one character is force-decoded from the start and the
//! buffer compacted, so malicious or corrupt streams can never stall the
//! write path.

const ESC: u8 = 0x1b;
const CAN: u8 = 0x18;
const SUB: u8 = 0x1a;

/// Fixed capacity of the pending sequence buffer
pub const PENDING_CAPACITY: usize = 128;

/// One recognized unit of the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A decoded character (printable or C0 control)
    Char(char),
    /// A complete CSI sequence
    Csi(CsiSeq),
}

/// A complete CSI sequence: numeric parameters plus the command code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiSeq {
    /// Decimal parameters split on `;`; empty fields are 0
    pub params: Vec<u16>,
    /// Terminator byte in `[a-zA-Z]`
    pub command: u8,
}

impl CsiSeq {
    /// Parameter `i`, or `default` if missing
    pub fn param(&self, i: usize, default: u16) -> u16 {
        self.params.get(i).copied().unwrap_or(default)
    }

    /// Parameter `i`, with both missing and zero mapped to `default`.
    /// Cursor commands treat 0 as 1 per the usual terminal convention.
    pub fn param_or(&self, i: usize, default: u16) -> u16 {
        match self.params.get(i) {
            Some(0) | None => default,
            Some(&v) => v,
        }
    }
}

/// Outcome of examining the pending buffer's prefix
enum Step {
    /// Nothing buffered
    Empty,
    /// Prefix is incomplete, wait for more input
    NeedMore,
    /// Emit a token built from the first `n` bytes
    Emit(Token, usize),
    /// Silently discard the first `n` bytes
    Skip(usize),
}

/// Incremental scanner with a bounded pending buffer
#[derive(Debug, Default)]
pub struct Scanner {
    pending: Vec<u8>,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(PENDING_CAPACITY),
        }
    }

    /// Drop any buffered partial sequence
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Number of bytes currently pending (bounded by [`PENDING_CAPACITY`])
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Process a chunk, returning every token completed by it
    pub fn scan(&mut self, bytes: &[u8]) -> Vec<Token> {
        let mut out = Vec::new();
        for &b in bytes {
            if self.pending.len() >= PENDING_CAPACITY {
                self.force_decode(&mut out);
            }
            self.pending.push(b);
            self.drain(&mut out);
        }
        out
    }

    /// Pull every complete token off the front of the pending buffer
    fn drain(&mut self, out: &mut Vec<Token>) {
        loop {
            match self.step() {
                Step::Empty | Step::NeedMore => break,
                Step::Emit(token, n) => {
                    out.push(token);
                    self.pending.drain(..n);
                }
                Step::Skip(n) => {
                    self.pending.drain(..n);
                }
            }
        }
    }

    /// Classify the current prefix of the pending buffer
    fn step(&self) -> Step {
        let p = &self.pending;
        let Some(&first) = p.first() else {
            return Step::Empty;
        };

        if first == ESC {
            if p.len() < 2 {
                return Step::NeedMore;
            }
            if p[1] != b'[' {
                // Not CSI: drop the ESC, re-decode the follower as text
                return Step::Skip(1);
            }
            for (i, &b) in p.iter().enumerate().skip(2) {
                if b == CAN || b == SUB {
                    // Cancel discards the whole partial sequence
                    return Step::Skip(i + 1);
                }
                if b.is_ascii_alphabetic() {
                    let token = Token::Csi(CsiSeq {
                        params: parse_params(&p[2..i]),
                        command: b,
                    });
                    return Step::Emit(token, i + 1);
                }
            }
            return Step::NeedMore;
        }

        // Literal text: decode one UTF-8 character from the front.
        // A decode failure consumes exactly one byte to guarantee progress.
        let Some(need) = utf8_len(first) else {
            return Step::Skip(1);
        };
        if p.len() < need {
            return Step::NeedMore;
        }
        match std::str::from_utf8(&p[..need]) {
            Ok(s) => match s.chars().next() {
                Some(c) => Step::Emit(Token::Char(c), need),
                None => Step::Skip(need),
            },
            Err(_) => Step::Skip(1),
        }
    }

    /// Liveness valve: the buffer is full without a terminator. Decode one
    /// character from the start and compact; the remainder re-drains as
    /// literal text, freeing the buffer.
    fn force_decode(&mut self, out: &mut Vec<Token>) {
        tracing::trace!(pending = self.pending.len(), "pending buffer full, forcing decode");
        let b = self.pending[0];
        if b == ESC {
            out.push(Token::Char('\u{001b}'));
        } else if b.is_ascii() {
            out.push(Token::Char(b as char));
        }
        self.pending.drain(..1);
        self.drain(out);
    }
}

/// Expected byte length of a UTF-8 character from its lead byte, or
/// `None` if the byte cannot start a character
fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// Parse the parameter string between `[` and the terminator
fn parse_params(bytes: &[u8]) -> Vec<u16> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes
        .split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .filter(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add((d - b'0') as u16)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(tokens: &[Token]) -> String {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scan_plain_text() {
        let mut s = Scanner::new();
        let tokens = s.scan(b"Hello");
        assert_eq!(tokens.len(), 5);
        assert_eq!(chars(&tokens), "Hello");
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn test_scan_csi_with_params() {
        let mut s = Scanner::new();
        let tokens = s.scan(b"\x1b[10;20H");
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            tokens[0],
            Token::Csi(CsiSeq {
                params: vec![10, 20],
                command: b'H',
            })
        );
    }

    #[test]
    fn test_scan_csi_empty_params() {
        let mut s = Scanner::new();
        let tokens = s.scan(b"\x1b[H");
        assert_eq!(
            tokens[0],
            Token::Csi(CsiSeq {
                params: vec![],
                command: b'H',
            })
        );
    }

    #[test]
    fn test_scan_csi_empty_fields_are_zero() {
        let mut s = Scanner::new();
        let tokens = s.scan(b"\x1b[;5m");
        assert_eq!(
            tokens[0],
            Token::Csi(CsiSeq {
                params: vec![0, 5],
                command: b'm',
            })
        );
    }

    #[test]
    fn test_scan_chunk_boundary() {
        let mut s = Scanner::new();
        assert!(s.scan(b"\x1b").is_empty());
        assert!(s.scan(b"[").is_empty());
        assert!(s.scan(b"3").is_empty());
        let tokens = s.scan(b"1m");
        assert_eq!(
            tokens[0],
            Token::Csi(CsiSeq {
                params: vec![31],
                command: b'm',
            })
        );
    }

    #[test]
    fn test_scan_non_csi_escape_is_literal() {
        let mut s = Scanner::new();
        // ESC ] is OSC, which this scanner does not parse: ESC dropped,
        // the rest decoded as text
        let tokens = s.scan(b"\x1b]0;title");
        assert_eq!(chars(&tokens), "]0;title");
    }

    #[test]
    fn test_scan_utf8_chunk_boundary() {
        let mut s = Scanner::new();
        let bytes = "é".as_bytes(); // 0xC3 0xA9
        assert!(s.scan(&bytes[..1]).is_empty());
        let tokens = s.scan(&bytes[1..]);
        assert_eq!(tokens, vec![Token::Char('é')]);
    }

    #[test]
    fn test_scan_invalid_utf8_skips_one_byte() {
        let mut s = Scanner::new();
        // 0xFF can never start a character; 0xC3 followed by 'A' is an
        // invalid pair, costing exactly the lead byte
        let tokens = s.scan(&[0xff, b'A', 0xc3, b'B']);
        assert_eq!(chars(&tokens), "AB");
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn test_scan_cancel_discards_sequence() {
        let mut s = Scanner::new();
        let tokens = s.scan(b"\x1b[31\x18X");
        assert_eq!(tokens, vec![Token::Char('X')]);
    }

    #[test]
    fn test_scan_liveness_under_unterminated_sequence() {
        let mut s = Scanner::new();
        let mut input = b"\x1b[".to_vec();
        input.extend(std::iter::repeat(b'1').take(8200));
        let tokens = s.scan(&input);
        // Forward progress: the flood is decoded as literal text once the
        // buffer fills, and the buffer never exceeds its capacity
        assert!(!tokens.is_empty());
        assert!(s.pending_len() <= PENDING_CAPACITY);
        // The scanner still works afterwards
        let after = s.scan(b"\x1b[1mA");
        assert!(after.iter().any(|t| matches!(t, Token::Csi(_))));
    }

    #[test]
    fn test_param_or_zero_maps_to_default() {
        let seq = CsiSeq {
            params: vec![0],
            command: b'A',
        };
        assert_eq!(seq.param_or(0, 1), 1);
        assert_eq!(seq.param(0, 1), 0);
        assert_eq!(seq.param(3, 7), 7);
    }
}
