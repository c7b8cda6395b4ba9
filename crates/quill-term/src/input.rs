// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. quill enables no extra terminal
// protocols (no mouse, no kitty keyboard, no bracketed paste), so the
// parser only has to understand what every xterm-compatible terminal
// sends by default:
//
// - Legacy CSI sequences (arrows, editing keys, function keys), including
//   the `1;<mod>` modifier parameter for Shift/Alt/Ctrl combinations
// - SS3 sequences (F1-F4 and arrows in application cursor mode)
// - Alt+key (ESC followed by a printable character)
// - C0 control bytes (Ctrl+letter)
// - UTF-8 multi-byte characters
//
// # Design
//
// The parser keeps a small byte buffer because an escape sequence can be
// split across `read()` calls. Feed bytes with [`Parser::advance`]. When
// no more bytes arrive within the escape timeout, call [`Parser::flush`]
// so a lone ESC becomes a real Escape keypress.
//
// Resizes do not come from stdin; the event loop injects
// [`Event::Resize`] itself when SIGWINCH fires.

use bitflags::bitflags;

use crate::terminal::Size;

// ─── Event Types ────────────────────────────────────────────────────────────

/// An input event delivered to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// The terminal changed size.
    Resize(Size),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// Ctrl + `ch`.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// Whether this is Ctrl + `ch` (case-insensitive, other modifiers ignored).
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && matches!(self.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char). Function keys use [`F`](KeyCode::F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-event parser.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed bytes and return every event that is now complete.
    ///
    /// Incomplete trailing sequences stay buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);

        let mut events = Vec::new();
        let mut pos = 0;
        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after the escape timeout.
    ///
    /// A lone ESC becomes Escape; `ESC [` becomes Alt+`[`; anything else
    /// left over is decoded byte by byte.
    pub fn flush(&mut self) -> Vec<Event> {
        let pending = std::mem::take(&mut self.buf);
        let mut events = Vec::new();
        let mut rest = pending.as_slice();

        while let Some((&first, tail)) = rest.split_first() {
            if first == 0x1B {
                match tail.first() {
                    Some(&b) if (0x20..=0x7E).contains(&b) => {
                        events.push(key_with(KeyCode::Char(b as char), Modifiers::ALT));
                        rest = &tail[1..];
                    }
                    _ => {
                        events.push(press(KeyCode::Escape));
                        rest = tail;
                    }
                }
                continue;
            }
            match try_parse(rest) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    rest = &rest[consumed..];
                }
                Parsed::Incomplete | Parsed::Skip(_) => rest = tail,
            }
        }
        events
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// Each parse function reads from the start of `buf` and reports what it
// found plus how many bytes to consume.

enum Parsed {
    /// A complete event, consuming `usize` bytes.
    Event(Event, usize),
    /// The sequence needs more bytes.
    Incomplete,
    /// Unrecognized bytes; skip `usize` of them.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Event(key_with(KeyCode::Char(' '), Modifiers::CTRL), 1),
        0x08 | 0x7F => Parsed::Event(press(KeyCode::Backspace), 1),
        0x09 => Parsed::Event(press(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Event(press(KeyCode::Enter), 1),
        b @ 0x01..=0x1A => Parsed::Event(ctrl_letter(b, Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Parsed::Event(press(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Event(key_with(KeyCode::Escape, Modifiers::ALT), 2),
        0x7F => Parsed::Event(key_with(KeyCode::Backspace, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Event(key_with(KeyCode::Char(b as char), Modifiers::ALT), 2),
        b @ 0x01..=0x1A => Parsed::Event(ctrl_letter(b, Modifiers::ALT | Modifiers::CTRL), 2),
        _ => Parsed::Event(press(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F, and the
    // final byte is 0x40..=0x7E.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    // ── Tilde-terminated: editing keys and F-keys ────────────────────
    if final_byte == b'~' {
        let code = match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            n @ 11..=15 => KeyCode::F((n - 10) as u8),
            n @ 17..=21 => KeyCode::F((n - 11) as u8),
            n @ 23..=24 => KeyCode::F((n - 12) as u8),
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Event(key_with(code, modifiers), consumed);
    }

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'Z' => return Parsed::Event(key_with(KeyCode::Tab, Modifiers::SHIFT), consumed),
        _ => return Parsed::Skip(consumed),
    };
    Parsed::Event(key_with(code, modifiers), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };
    Parsed::Event(press(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Event(press(KeyCode::Char(ch)), expected)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn press(code: KeyCode) -> Event {
    key_with(code, Modifiers::empty())
}

const fn key_with(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// C0 byte `0x01..=0x1A` as its Ctrl+letter key.
const fn ctrl_letter(byte: u8, modifiers: Modifiers) -> Event {
    key_with(KeyCode::Char((byte - 1 + b'a') as char), modifiers)
}

/// Semicolon-separated numeric CSI parameters. Empty fields read as 0.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode the xterm modifier parameter (`1 + bitmask`).
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Event {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected 1 event, got {events:?}");
        events[0]
    }

    fn key(code: KeyCode) -> Event {
        press(code)
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        key_with(code, modifiers)
    }

    // ── Plain and control bytes ─────────────────────────────────────────

    #[test]
    fn ascii_chars() {
        assert_eq!(
            parse(b"ab"),
            vec![key(KeyCode::Char('a')), key(KeyCode::Char('b'))]
        );
        assert_eq!(parse_one(b" "), key(KeyCode::Char(' ')));
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse_one(b"\x11"), Event::Key(KeyEvent::ctrl('q')));
        assert_eq!(parse_one(b"\x13"), Event::Key(KeyEvent::ctrl('s')));
        assert_eq!(parse_one(b"\x06"), Event::Key(KeyEvent::ctrl('f')));
        assert_eq!(parse_one(b"\x17"), Event::Key(KeyEvent::ctrl('w')));
    }

    #[test]
    fn enter_tab_backspace() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
        assert_eq!(parse_one(b"\x7f"), key(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x08"), key(KeyCode::Backspace));
    }

    #[test]
    fn is_ctrl_ignores_case() {
        let ev = KeyEvent::new(KeyCode::Char('S'), Modifiers::CTRL | Modifiers::SHIFT);
        assert!(ev.is_ctrl('s'));
        assert!(!KeyEvent::plain(KeyCode::Char('s')).is_ctrl('s'));
    }

    // ── CSI ─────────────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn modified_arrows() {
        assert_eq!(
            parse_one(b"\x1b[1;2C"),
            key_mod(KeyCode::Right, Modifiers::SHIFT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;3D"),
            key_mod(KeyCode::Left, Modifiers::ALT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;5C"),
            key_mod(KeyCode::Right, Modifiers::CTRL)
        );
        assert_eq!(
            parse_one(b"\x1b[1;6D"),
            key_mod(KeyCode::Left, Modifiers::CTRL | Modifiers::SHIFT)
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(parse_one(b"\x1b[H"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[F"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[1~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[4~"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
        assert_eq!(
            parse_one(b"\x1b[1;2H"),
            key_mod(KeyCode::Home, Modifiers::SHIFT)
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(parse_one(b"\x1bOR"), key(KeyCode::F(3)));
        assert_eq!(parse_one(b"\x1b[13~"), key(KeyCode::F(3)));
        assert_eq!(
            parse_one(b"\x1b[1;2R"),
            key_mod(KeyCode::F(3), Modifiers::SHIFT)
        );
        assert_eq!(parse_one(b"\x1b[15~"), key(KeyCode::F(5)));
        assert_eq!(parse_one(b"\x1b[24~"), key(KeyCode::F(12)));
    }

    #[test]
    fn back_tab() {
        assert_eq!(parse_one(b"\x1b[Z"), key_mod(KeyCode::Tab, Modifiers::SHIFT));
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(parse(b"\x1b[99~x"), vec![key(KeyCode::Char('x'))]);
    }

    // ── Escape handling ─────────────────────────────────────────────────

    #[test]
    fn alt_char() {
        assert_eq!(parse_one(b"\x1bb"), key_mod(KeyCode::Char('b'), Modifiers::ALT));
    }

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![key(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn split_sequence_completes_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[1;").is_empty());
        assert_eq!(
            parser.advance(b"2A"),
            vec![key_mod(KeyCode::Up, Modifiers::SHIFT)]
        );
    }

    #[test]
    fn flush_of_partial_csi() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert_eq!(
            parser.flush(),
            vec![key_mod(KeyCode::Char('['), Modifiers::ALT)]
        );
    }

    // ── UTF-8 ───────────────────────────────────────────────────────────

    #[test]
    fn utf8_chars() {
        assert_eq!(parse_one("é".as_bytes()), key(KeyCode::Char('é')));
        assert_eq!(parse_one("中".as_bytes()), key(KeyCode::Char('中')));
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "€".as_bytes();
        let mut parser = Parser::new();
        assert!(parser.advance(&bytes[..1]).is_empty());
        assert_eq!(parser.advance(&bytes[1..]), vec![key(KeyCode::Char('€'))]);
    }

    #[test]
    fn invalid_continuation_is_skipped() {
        assert_eq!(parse(b"\x80a"), vec![key(KeyCode::Char('a'))]);
    }
}
