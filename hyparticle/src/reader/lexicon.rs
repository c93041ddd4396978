//! Lexical policies: which characters may start or continue an identifier.
//!
//! The grammar skeleton of [`StandardReader`](super::StandardReader) never hard-codes an
//! identifier alphabet; it asks its [`LexicalPolicy`] instead.

/// Punctuation of the canonical grammar. No standard identifier may contain these.
pub const RESERVED: [char; 11] = ['$', '\'', '(', ')', ':', ';', ',', '[', ']', '{', '}'];

/// Decides the identifier alphabet of a reader.
pub trait LexicalPolicy: Send + Sync {
    /// Whether `c` may start an identifier.
    fn identifier_start(&self, c: char) -> bool;

    /// Whether `c` may continue an identifier.
    fn identifier_part(&self, c: char) -> bool;

    /// Whether the whole of `text` reads back as a single identifier.
    fn admits_identifier(&self, text: &str) -> bool {
        let mut chars = text.chars();
        match chars.next() {
            Some(c) if self.identifier_start(c) => chars.all(|c| self.identifier_part(c)),
            _ => false,
        }
    }
}

/// Any visible character outside [`RESERVED`], so symbolic heads such as `->` or `=`
/// are identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardLexicon;

impl StandardLexicon {
    #[inline]
    fn admits(c: char) -> bool {
        !c.is_whitespace() && !c.is_control() && !RESERVED.contains(&c)
    }
}

impl LexicalPolicy for StandardLexicon {
    fn identifier_start(&self, c: char) -> bool {
        Self::admits(c)
    }

    fn identifier_part(&self, c: char) -> bool {
        Self::admits(c)
    }
}

/// Conventional programming-language identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiLexicon;

impl LexicalPolicy for AsciiLexicon {
    fn identifier_start(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn identifier_part(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }
}
