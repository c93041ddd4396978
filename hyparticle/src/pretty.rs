//! RcDoc-based pretty-printer with termcolor annotations for particles.
//!
//! Role
//! - Lay out the canonical grammar width-aware: long argument lists and quantified bodies
//!   break over several indented lines.
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!
//! The layout only ever inserts whitespace between tokens, so the output is read back by
//! [`StandardReader`](crate::reader::StandardReader) into an equal particle.
//!
//! Performance
//! - Building the doc is O(n) in particle size; rendering respects line widths with
//!   linear-time layout in the size of the resulting document.
use std::fmt;
use std::io::{self, Write};

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::kind::TupleKind;
use crate::particle::Particle;

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, colons, semicolons
    /// Brackets are colored by nesting depth so matching pairs share a color.
    Bracket(u8),
    Quantifier,
    Operator,
    Head, // function and predicate names in head position
    Variable,
    Name, // quoted name literals
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Bracket(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Quantifier => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Head => {
                s.set_fg(Some(Color::Magenta));
            }
            Style::Variable => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Name => {
                s.set_fg(Some(Color::Blue));
            }
        }
        s
    }
}

fn styled(style: Style, s: impl fmt::Display) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(style)
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Punct, s)
}

#[inline]
fn bracket(s: &'static str, depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Bracket(depth))
}

/// `open` args `close`, breaking after `open` and after each comma when too wide.
fn delimited(
    open: RcDoc<'static, Style>,
    args: &[Particle],
    close: &'static str,
    depth: u8,
) -> RcDoc<'static, Style> {
    if args.is_empty() {
        return open.append(bracket(close, depth)).group();
    }
    let inner = RcDoc::intersperse(
        args.iter().map(|arg| to_doc_with_depth(arg, depth + 1)),
        punct(",").append(RcDoc::line_()),
    );
    open.append(RcDoc::line_().append(inner).nest(2))
        .append(RcDoc::line_())
        .append(bracket(close, depth))
        .group()
}

/// Depth-aware variant that colors brackets by nesting level.
fn to_doc_with_depth(p: &Particle, depth: u8) -> RcDoc<'static, Style> {
    match p {
        Particle::Name(name) => styled(
            Style::Name,
            format!("'{}:{}'", name.kind().prefix(), name.text()),
        ),
        Particle::Variable(variable) => styled(Style::Variable, format!("${}", variable.text())),
        Particle::Tuple(tuple) => {
            let head = tuple.head().text();
            match tuple.kind() {
                TupleKind::FunctionExpression => delimited(
                    styled(Style::Head, head).append(bracket("(", depth)),
                    tuple.arguments(),
                    ")",
                    depth,
                ),
                TupleKind::AtomicPredicate => delimited(
                    styled(Style::Head, head).append(bracket("[", depth)),
                    tuple.arguments(),
                    "]",
                    depth,
                ),
                TupleKind::PredicateComprehension => delimited(
                    bracket("{", depth)
                        .append(styled(Style::Operator, head))
                        .append(punct(";")),
                    tuple.arguments(),
                    "}",
                    depth,
                ),
                TupleKind::PredicateExpression => delimited(
                    bracket("{", depth)
                        .append(styled(Style::Operator, head))
                        .append(punct(":")),
                    tuple.arguments(),
                    "}",
                    depth,
                ),
            }
        }
        Particle::Quantified(quantified) => styled(Style::Quantifier, quantified.quantifier().text())
            .append(styled(
                Style::Variable,
                format!("${}", quantified.variable().text()),
            ))
            .append(punct(":"))
            .append(
                RcDoc::line_()
                    .append(to_doc_with_depth(quantified.body(), depth))
                    .nest(2),
            )
            .group(),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor` with width-aware layout.
fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Retrieve the width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for particles.
pub trait PrettyParticle {
    /// Build an RcDoc representation of this particle with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render this particle with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print this particle to stdout with colors (TTY-aware), at auto-detected width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Format this particle into a plain string (no colors) at the given width.
    fn pretty_string_width(&self, width: usize) -> String;

    /// Format this particle into a plain string (no colors) at width 80.
    fn pretty_string(&self) -> String {
        self.pretty_string_width(80)
    }
}

impl PrettyParticle for Particle {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    #[inline]
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)
    }

    fn pretty_string_width(&self, width: usize) -> String {
        let mut buf = String::new();
        let rendered = self.pretty_doc().render_fmt(width, &mut buf);
        debug_assert!(rendered.is_ok(), "rendering into a String failed");
        buf
    }
}
