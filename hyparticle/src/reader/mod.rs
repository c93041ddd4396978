//! Recursive-descent reader for the canonical particle grammar.
//!
//! Role
//! - Turn canonical text (see [`crate::writer`]) back into particles, materialized through
//!   a caller-supplied [`ParticleSource`] so that validation is never duplicated here.
//! - Report the first mismatch as a [`SyntaxError`] carrying line, column and byte offset.
//!
//! Grammar
//! ```text
//! Variable               := "$" Identifier
//! Name                   := "'" Prefix ":" Identifier "'"      Prefix ∈ {var, func, pred, op, quant}
//! FunctionExpression     := Identifier "(" [Term ("," Term)*] ")"
//! AtomicPredicate        := Identifier "[" [Term ("," Term)*] "]"
//! PredicateComprehension := "{" Identifier ";" [Predicate ("," Predicate)*] "}"
//! PredicateExpression    := "{" Identifier ":" [Predicate ("," Predicate)*] "}"
//! Quantified             := Identifier "$" Identifier ":" Predicate [":"]
//! Term                   := Variable | FunctionExpression | PredicateComprehension | Quantified
//! Predicate              := AtomicPredicate | PredicateExpression | Quantified
//! ```
//! Whitespace is allowed between tokens. Dispatch between the productions of a term or a
//! predicate is driven by the first token, plus the token following a leading identifier.
//!
//! Design
//! - The identifier alphabet is delegated to a [`LexicalPolicy`].
//! - One slot of pushback per token class (string, identifier, term, predicate) lets a
//!   production undo its lookahead without re-scanning the stream.
//! - Sub-terms and sub-predicates are read through the reader's chain, which defaults to
//!   the reader itself, so a dialect can take over nested particles.
//! - A reader holds mutable parsing state and every parse method takes `&mut self`; use one
//!   reader per thread, or a [`SharedReader`] to serialize access to a single one.
//!
//! Example
//! ```
//! use hyparticle::prelude::*;
//!
//! let source = BasicSource::new();
//! let mut reader = StandardReader::new();
//! let mut input = CharStream::from("A$x:{->:Foo[$x],=[$x,$y]}");
//! let p = reader.read_predicate(&*source, &mut input).unwrap();
//! assert_eq!(p.kind(), ParticleKind::QuantifiedPredicate);
//! assert_eq!(p.to_string(), "A$x:{->:Foo[$x],=[$x,$y]}");
//! ```
pub mod lexicon;
pub mod stream;

use log::{debug, trace};
use parking_lot::{Mutex, MutexGuard};

use crate::error::{ReadError, ReadResult, SyntaxError};
use crate::kind::{NameKind, ParticleKind};
use crate::particle::Particle;
use crate::source::ParticleSource;

pub use lexicon::{AsciiLexicon, LexicalPolicy, StandardLexicon};
pub use stream::{CharStream, Position};

/// Capability shared by readers and reader dialects.
///
/// Each entry point reads exactly one particle and leaves the rest of the input in the
/// stream.
pub trait ParticleRead {
    /// Read a particle produced by the production of `kind`.
    fn read_particle(
        &mut self,
        source: &dyn ParticleSource,
        kind: ParticleKind,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle>;

    /// Read any term.
    fn read_term(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle>;

    /// Read any predicate.
    fn read_predicate(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle>;
}

#[derive(Default)]
struct Pushback {
    string: Option<String>,
    identifier: Option<String>,
    term: Option<Particle>,
    predicate: Option<Particle>,
}

impl Pushback {
    fn is_empty(&self) -> bool {
        self.string.is_none()
            && self.identifier.is_none()
            && self.term.is_none()
            && self.predicate.is_none()
    }

    fn clear(&mut self) {
        *self = Pushback::default();
    }
}

type ItemReader = fn(
    &mut StandardReader,
    &dyn ParticleSource,
    &mut CharStream<'_>,
) -> ReadResult<Particle>;

/// Default bound on nested terms and predicates within one read.
pub const DEFAULT_MAX_NESTING: usize = 128;

/// The stock reader of the canonical grammar.
pub struct StandardReader {
    lexicon: Box<dyn LexicalPolicy>,
    chain: Option<Box<dyn ParticleRead + Send>>,
    pushback: Pushback,
    depth: usize,
    nesting: usize,
    max_nesting: usize,
}

impl Default for StandardReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardReader {
    /// Reader using the [`StandardLexicon`] and chaining to itself.
    pub fn new() -> Self {
        Self::with_lexicon(StandardLexicon)
    }

    pub fn with_lexicon<L: LexicalPolicy + 'static>(lexicon: L) -> Self {
        Self {
            lexicon: Box::new(lexicon),
            chain: None,
            pushback: Pushback::default(),
            depth: 0,
            nesting: 0,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Delegate nested terms and predicates to `chain` instead of this reader.
    pub fn with_chain(mut self, chain: Box<dyn ParticleRead + Send>) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Fail instead of descending past `max` nested terms and predicates.
    pub fn with_max_nesting(mut self, max: usize) -> Self {
        self.max_nesting = max;
        self
    }

    pub fn lexicon(&self) -> &dyn LexicalPolicy {
        &*self.lexicon
    }

    /// Push back a literal string; the next literal expected must be exactly this one.
    pub fn set_back_string(&mut self, s: impl Into<String>) {
        let s = s.into();
        trace!("set back string '{s}'");
        self.pushback.string = Some(s);
    }

    /// Push back an identifier; the next identifier read returns it.
    pub fn set_back_identifier(&mut self, id: impl Into<String>) {
        let id = id.into();
        trace!("set back identifier '{id}'");
        self.pushback.identifier = Some(id);
    }

    /// Push back a term; the next term read returns it.
    pub fn set_back_term(&mut self, term: Particle) {
        trace!("set back term {term}");
        self.pushback.term = Some(term);
    }

    /// Push back a predicate; the next predicate read returns it.
    pub fn set_back_predicate(&mut self, predicate: Particle) {
        trace!("set back predicate {predicate}");
        self.pushback.predicate = Some(predicate);
    }

    /// Whether any pushback slot is occupied.
    pub fn has_pushback(&self) -> bool {
        !self.pushback.is_empty()
    }

    pub fn clear_pushback(&mut self) {
        self.pushback.clear();
    }

    /// Run an entry point. Errors leaving the outermost entry point drop all pushback, so
    /// that no partial state outlives a failed parse.
    fn entered<T>(&mut self, f: impl FnOnce(&mut Self) -> ReadResult<T>) -> ReadResult<T> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        if self.depth == 0 {
            if let Err(err) = &result {
                debug!("read failed: {err}");
                self.pushback.clear();
            }
        }
        result
    }

    // ---------------- Tokens ----------------

    fn fail<T>(input: &CharStream<'_>, message: impl Into<String>) -> ReadResult<T> {
        Err(ReadError::Syntax(input.error(message)))
    }

    fn found(c: Option<char>) -> String {
        match c {
            Some(c) => format!("'{c}'"),
            None => "end of input".to_string(),
        }
    }

    fn ws(&mut self, input: &mut CharStream<'_>) -> ReadResult<()> {
        input.skip_whitespace()?;
        Ok(())
    }

    /// Next character, taking pending pushback into account.
    fn peek_char(&mut self, input: &mut CharStream<'_>) -> ReadResult<Option<char>> {
        if let Some(s) = &self.pushback.string {
            return Ok(s.chars().next());
        }
        if let Some(id) = &self.pushback.identifier {
            return Ok(id.chars().next());
        }
        Ok(input.peek()?)
    }

    fn expect(&mut self, input: &mut CharStream<'_>, expected: &str) -> ReadResult<()> {
        if let Some(s) = self.pushback.string.take() {
            if s != expected {
                return Self::fail(input, format!("expected '{expected}', found '{s}'"));
            }
            return Ok(());
        }
        for c in expected.chars() {
            match input.peek()? {
                Some(found) if found == c => {
                    input.next_char()?;
                }
                found => {
                    return Self::fail(
                        input,
                        format!("expected '{expected}', found {}", Self::found(found)),
                    );
                }
            }
        }
        Ok(())
    }

    fn identifier(&mut self, input: &mut CharStream<'_>) -> ReadResult<String> {
        if let Some(id) = self.pushback.identifier.take() {
            return Ok(id);
        }
        let mut id = String::new();
        match input.peek()? {
            Some(c) if self.lexicon.identifier_start(c) => {
                input.next_char()?;
                id.push(c);
            }
            found => {
                return Self::fail(
                    input,
                    format!("expected identifier, found {}", Self::found(found)),
                );
            }
        }
        while let Some(c) = input.peek()? {
            if !self.lexicon.identifier_part(c) {
                break;
            }
            input.next_char()?;
            id.push(c);
        }
        Ok(id)
    }

    fn next_term(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        if let Some(term) = self.pushback.term.take() {
            return Ok(term);
        }
        match self.chain.as_mut() {
            Some(chain) => chain.read_term(source, input),
            None => self.term(source, input),
        }
    }

    fn next_predicate(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        if let Some(predicate) = self.pushback.predicate.take() {
            return Ok(predicate);
        }
        match self.chain.as_mut() {
            Some(chain) => chain.read_predicate(source, input),
            None => self.predicate(source, input),
        }
    }

    /// Items separated by `,` up to and including `close`. The opening delimiter has
    /// already been consumed.
    fn list(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
        close: char,
        item: ItemReader,
    ) -> ReadResult<Vec<Particle>> {
        let mut items = Vec::new();
        self.ws(input)?;
        if input.peek()? == Some(close) {
            input.next_char()?;
            return Ok(items);
        }
        loop {
            items.push(item(self, source, input)?);
            self.ws(input)?;
            match input.peek()? {
                Some(c) if c == close => {
                    input.next_char()?;
                    return Ok(items);
                }
                Some(',') => {
                    input.next_char()?;
                    self.ws(input)?;
                }
                found => {
                    return Self::fail(
                        input,
                        format!("expected ',' or '{close}', found {}", Self::found(found)),
                    );
                }
            }
        }
    }

    fn construct(
        &self,
        source: &dyn ParticleSource,
        kind: ParticleKind,
        parts: Vec<Particle>,
        input: &CharStream<'_>,
    ) -> ReadResult<Particle> {
        source.build(kind, parts).map_err(|error| {
            let at = input.position();
            ReadError::Construction {
                error,
                line: at.line,
                column: at.column,
                offset: at.offset,
            }
        })
    }

    // ---------------- Productions ----------------

    fn name_literal(
        &mut self,
        source: &dyn ParticleSource,
        expected: Option<NameKind>,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.expect(input, "'")?;
        let prefix = self.identifier(input)?;
        let kind = match (expected, NameKind::from_prefix(&prefix)) {
            (Some(expected), Some(found)) if expected == found => expected,
            (Some(expected), _) => {
                return Self::fail(
                    input,
                    format!("expected '{}', found '{prefix}'", expected.prefix()),
                );
            }
            (None, Some(found)) => found,
            (None, None) => return Self::fail(input, format!("unknown name prefix '{prefix}'")),
        };
        self.expect(input, ":")?;
        let id = self.identifier(input)?;
        self.expect(input, "'")?;
        Ok(source.name(kind, &id).into())
    }

    fn production(
        &mut self,
        source: &dyn ParticleSource,
        kind: ParticleKind,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.ws(input)?;
        match kind {
            ParticleKind::Name => self.name_literal(source, None, input),
            ParticleKind::VariableName
            | ParticleKind::FunctionName
            | ParticleKind::PredicateName
            | ParticleKind::Operator
            | ParticleKind::Quantifier => self.name_literal(source, kind.as_name_kind(), input),
            ParticleKind::Variable => {
                self.expect(input, "$")?;
                let id = self.identifier(input)?;
                Ok(source.variable_named(&id).into())
            }
            ParticleKind::FunctionExpression | ParticleKind::AtomicPredicate => {
                let (open, close) = match kind {
                    ParticleKind::FunctionExpression => ("(", ')'),
                    _ => ("[", ']'),
                };
                let head = self.identifier(input)?;
                self.ws(input)?;
                self.expect(input, open)?;
                let head_kind = match kind {
                    ParticleKind::FunctionExpression => NameKind::FunctionName,
                    _ => NameKind::PredicateName,
                };
                let mut parts = vec![source.name(head_kind, &head).into()];
                parts.extend(self.list(source, input, close, Self::next_term)?);
                self.construct(source, kind, parts, input)
            }
            ParticleKind::PredicateComprehension | ParticleKind::PredicateExpression => {
                let mark = match kind {
                    ParticleKind::PredicateComprehension => ";",
                    _ => ":",
                };
                self.expect(input, "{")?;
                self.ws(input)?;
                let operator = self.identifier(input)?;
                self.ws(input)?;
                self.expect(input, mark)?;
                let mut parts = vec![source.operator(&operator).into()];
                parts.extend(self.list(source, input, '}', Self::next_predicate)?);
                self.construct(source, kind, parts, input)
            }
            ParticleKind::QuantifiedTerm | ParticleKind::QuantifiedPredicate => {
                let quantifier = self.identifier(input)?;
                self.ws(input)?;
                self.expect(input, "$")?;
                let variable = self.identifier(input)?;
                self.ws(input)?;
                self.expect(input, ":")?;
                self.ws(input)?;
                let body = self.next_predicate(source, input)?;
                // Legacy text closes the body with a second colon
                self.ws(input)?;
                if input.peek()? == Some(':') {
                    input.next_char()?;
                }
                let parts = vec![
                    source.quantifier(&quantifier).into(),
                    source.variable_named(&variable).into(),
                    body,
                ];
                self.construct(source, kind, parts, input)
            }
        }
    }

    /// After a leading identifier, decide between the production opened by `open` and a
    /// quantified particle. The identifier is set back for the selected production.
    fn after_identifier(
        &mut self,
        input: &mut CharStream<'_>,
        open: char,
        tuple: ParticleKind,
        quantified: ParticleKind,
    ) -> ReadResult<ParticleKind> {
        let id = self.identifier(input)?;
        self.ws(input)?;
        let kind = match input.peek()? {
            Some(c) if c == open => tuple,
            Some('$') => quantified,
            found => {
                return Self::fail(
                    input,
                    format!(
                        "expected '{open}' or '$' after '{id}', found {}",
                        Self::found(found)
                    ),
                );
            }
        };
        self.set_back_identifier(id);
        Ok(kind)
    }

    /// Bound the recursion of the productions so that deep input fails instead of
    /// exhausting the stack.
    fn nested(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
        dispatch: ItemReader,
    ) -> ReadResult<Particle> {
        if self.nesting >= self.max_nesting {
            return Self::fail(
                input,
                format!("nesting deeper than {} levels", self.max_nesting),
            );
        }
        self.nesting += 1;
        let result = dispatch(self, source, input);
        self.nesting -= 1;
        result
    }

    fn term(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.nested(source, input, Self::dispatch_term)
    }

    fn predicate(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.nested(source, input, Self::dispatch_predicate)
    }

    fn dispatch_term(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.ws(input)?;
        let kind = match self.peek_char(input)? {
            Some('$') => ParticleKind::Variable,
            Some('{') => ParticleKind::PredicateComprehension,
            Some(c) if self.lexicon.identifier_start(c) => self.after_identifier(
                input,
                '(',
                ParticleKind::FunctionExpression,
                ParticleKind::QuantifiedTerm,
            )?,
            found => {
                return Self::fail(input, format!("expected term, found {}", Self::found(found)));
            }
        };
        trace!("term dispatch selected {kind}");
        self.production(source, kind, input)
    }

    fn dispatch_predicate(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.ws(input)?;
        let kind = match self.peek_char(input)? {
            Some('{') => ParticleKind::PredicateExpression,
            Some(c) if self.lexicon.identifier_start(c) => self.after_identifier(
                input,
                '[',
                ParticleKind::AtomicPredicate,
                ParticleKind::QuantifiedPredicate,
            )?,
            found => {
                return Self::fail(
                    input,
                    format!("expected predicate, found {}", Self::found(found)),
                );
            }
        };
        trace!("predicate dispatch selected {kind}");
        self.production(source, kind, input)
    }
}

impl ParticleRead for StandardReader {
    fn read_particle(
        &mut self,
        source: &dyn ParticleSource,
        kind: ParticleKind,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.entered(|this| this.production(source, kind, input))
    }

    fn read_term(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.entered(|this| this.next_term_local(source, input))
    }

    fn read_predicate(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.entered(|this| this.next_predicate_local(source, input))
    }
}

impl StandardReader {
    fn next_term_local(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        match self.pushback.term.take() {
            Some(term) => Ok(term),
            None => self.term(source, input),
        }
    }

    fn next_predicate_local(
        &mut self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        match self.pushback.predicate.take() {
            Some(predicate) => Ok(predicate),
            None => self.predicate(source, input),
        }
    }
}

/// A reader shared between threads.
///
/// Parses are serialized by a mutex: at most one parse runs at a time, and the `try_*`
/// variants refuse to wait when the reader is busy.
pub struct SharedReader {
    inner: Mutex<StandardReader>,
}

impl SharedReader {
    pub fn new(reader: StandardReader) -> Self {
        Self {
            inner: Mutex::new(reader),
        }
    }

    /// Hold the reader for a multi-step session (e.g. several particles from one stream).
    pub fn lock(&self) -> MutexGuard<'_, StandardReader> {
        self.inner.lock()
    }

    pub fn read_particle(
        &self,
        source: &dyn ParticleSource,
        kind: ParticleKind,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.inner.lock().read_particle(source, kind, input)
    }

    pub fn read_term(
        &self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.inner.lock().read_term(source, input)
    }

    pub fn read_predicate(
        &self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> ReadResult<Particle> {
        self.inner.lock().read_predicate(source, input)
    }

    /// Like [`SharedReader::read_term`], but returns `None` instead of waiting when another
    /// parse is in flight.
    pub fn try_read_term(
        &self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> Option<ReadResult<Particle>> {
        self.inner
            .try_lock()
            .map(|mut reader| reader.read_term(source, input))
    }

    /// Like [`SharedReader::read_predicate`], but returns `None` instead of waiting when
    /// another parse is in flight.
    pub fn try_read_predicate(
        &self,
        source: &dyn ParticleSource,
        input: &mut CharStream<'_>,
    ) -> Option<ReadResult<Particle>> {
        self.inner
            .try_lock()
            .map(|mut reader| reader.read_predicate(source, input))
    }
}

impl Default for SharedReader {
    fn default() -> Self {
        Self::new(StandardReader::new())
    }
}

fn parse_complete(
    text: &str,
    read: impl FnOnce(&mut StandardReader, &mut CharStream<'_>) -> ReadResult<Particle>,
) -> ReadResult<Particle> {
    let mut input = CharStream::from(text);
    let mut reader = StandardReader::new();
    let particle = read(&mut reader, &mut input)?;
    input.expect_end().map_err(|err: SyntaxError| {
        debug!("read failed: {err}");
        ReadError::from(err)
    })?;
    Ok(particle)
}

/// Parse a complete term from `text`; only whitespace may follow it.
pub fn parse_term(source: &dyn ParticleSource, text: &str) -> ReadResult<Particle> {
    parse_complete(text, |reader, input| reader.read_term(source, input))
}

/// Parse a complete predicate from `text`; only whitespace may follow it.
pub fn parse_predicate(source: &dyn ParticleSource, text: &str) -> ReadResult<Particle> {
    parse_complete(text, |reader, input| reader.read_predicate(source, input))
}

/// Parse a complete particle of the given kind from `text`.
pub fn parse_particle(
    source: &dyn ParticleSource,
    kind: ParticleKind,
    text: &str,
) -> ReadResult<Particle> {
    parse_complete(text, |reader, input| reader.read_particle(source, kind, input))
}
