//! Character stream with position tracking.
//!
//! Decodes UTF-8 from any [`BufRead`] one `char` at a time, with a single `char` of
//! lookahead. Every consumed `char` advances a running [`Position`], independently of
//! token boundaries.
use std::io::{self, BufRead};

use crate::error::SyntaxError;

/// Location in the input: 0-based byte offset, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// Expected length of a UTF-8 sequence from its leading byte, 0 if invalid.
fn sequence_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

/// A UTF-8 character stream over a buffered reader.
pub struct CharStream<'a> {
    input: Box<dyn BufRead + 'a>,
    peeked: Option<char>,
    position: Position,
}

impl<'a> CharStream<'a> {
    pub fn new<R: BufRead + 'a>(input: R) -> Self {
        Self {
            input: Box::new(input),
            peeked: None,
            position: Position::START,
        }
    }

    /// Position of the next character to be consumed.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Build a syntax error located at the current position.
    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            line: self.position.line,
            column: self.position.column,
            offset: self.position.offset,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let byte = match self.input.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if byte.is_some() {
                self.input.consume(1);
            }
            return Ok(byte);
        }
    }

    fn decode(&mut self) -> Result<Option<char>, SyntaxError> {
        let stream_failure = |this: &Self, err: io::Error| this.error(format!("stream failure ({err})"));

        let lead = match self.read_byte() {
            Ok(Some(byte)) => byte,
            Ok(None) => return Ok(None),
            Err(err) => return Err(stream_failure(self, err)),
        };
        let width = sequence_width(lead);
        if width == 0 {
            return Err(self.error(format!("invalid UTF-8 lead byte 0x{lead:02x}")));
        }

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.read_byte() {
                Ok(Some(byte)) => *slot = byte,
                Ok(None) => return Err(self.error("truncated UTF-8 sequence")),
                Err(err) => return Err(stream_failure(self, err)),
            }
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.error("invalid UTF-8 sequence"))
    }

    /// Look at the next character without consuming it. `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<char>, SyntaxError> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    /// Consume the next character. `None` at end of input.
    pub fn next_char(&mut self) -> Result<Option<char>, SyntaxError> {
        let c = match self.peeked.take() {
            Some(c) => Some(c),
            None => self.decode()?,
        };
        if let Some(c) = c {
            self.position.advance(c);
        }
        Ok(c)
    }

    /// Consume whitespace, returning the number of characters skipped.
    pub fn skip_whitespace(&mut self) -> Result<usize, SyntaxError> {
        let mut count = 0;
        while let Some(c) = self.peek()? {
            if !c.is_whitespace() {
                break;
            }
            self.next_char()?;
            count += 1;
        }
        Ok(count)
    }

    /// Succeed only if nothing but whitespace remains.
    pub fn expect_end(&mut self) -> Result<(), SyntaxError> {
        self.skip_whitespace()?;
        match self.peek()? {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected trailing input '{c}'"))),
        }
    }
}

impl<'a> From<&'a str> for CharStream<'a> {
    fn from(text: &'a str) -> Self {
        CharStream::new(text.as_bytes())
    }
}
