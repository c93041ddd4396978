//! Canonical serializer for particles.
//!
//! Role
//! - Emit the unique canonical text of a particle tree: no optional whitespace, arguments
//!   in stored order, no normalization of any kind.
//! - The output is accepted by [`crate::reader::StandardReader`], and reading it back
//!   yields a particle equal to the original.
//!
//! Chain
//! - A [`StandardWriter`] prints each node itself but hands every child to its chain,
//!   which defaults to the writer itself. A dialect implements [`ParticleWrite`], prints
//!   the nodes it cares about and delegates the others to
//!   [`StandardWriter::write_node`] with itself as the next writer.
//!
//! | particle | text |
//! |---|---|
//! | variable | `$x` |
//! | name | `'var:x'`, `'func:f'`, `'pred:P'`, `'op:&'`, `'quant:A'` |
//! | function-expression | `f($x,$y)` |
//! | atomic-predicate | `P[$x]` |
//! | predicate-comprehension | `{op;P[$x],Q[$x]}` |
//! | predicate-expression | `{op:P[$x],Q[$x]}` |
//! | quantified | `A$x:P[$x]` |
//!
//! Names whose text is not a single [`StandardLexicon`] identifier (empty, or holding
//! whitespace or reserved punctuation) would read back as a different tree, so the
//! standard writer rejects them with [`WriteError::Rejected`].
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use log::debug;

use crate::error::{WriteError, WriteResult};
use crate::kind::{ParticleKind, TupleKind};
use crate::particle::{Particle, Tuple};
use crate::reader::lexicon::{LexicalPolicy, StandardLexicon};

/// Capability shared by writers and writer dialects.
pub trait ParticleWrite {
    fn write(&self, particle: &Particle, out: &mut dyn Write) -> WriteResult<()>;
}

/// The stock writer of the canonical grammar.
#[derive(Default, Clone)]
pub struct StandardWriter {
    chain: Option<Arc<dyn ParticleWrite + Send + Sync>>,
}

impl StandardWriter {
    pub fn new() -> Self {
        Self { chain: None }
    }

    /// Print children through `chain` instead of this writer.
    pub fn with_chain(chain: Arc<dyn ParticleWrite + Send + Sync>) -> Self {
        Self { chain: Some(chain) }
    }

    fn next(&self) -> &dyn ParticleWrite {
        match &self.chain {
            Some(chain) => &**chain,
            None => self,
        }
    }

    /// `text` if it reads back as one identifier.
    fn identifier(kind: ParticleKind, text: &str) -> WriteResult<&str> {
        if StandardLexicon.admits_identifier(text) {
            return Ok(text);
        }
        debug!("writer rejected {kind} with unreadable identifier {text:?}");
        Err(WriteError::Rejected {
            kind,
            reason: format!("identifier {text:?} does not read back"),
        })
    }

    fn write_arguments(
        tuple: &Tuple,
        out: &mut dyn Write,
        next: &dyn ParticleWrite,
    ) -> WriteResult<()> {
        for (idx, arg) in tuple.arguments().iter().enumerate() {
            if idx > 0 {
                out.write_all(b",")?;
            }
            next.write(arg, out)?;
        }
        Ok(())
    }

    /// Print the outer node of `particle` and delegate every child to `next`.
    pub fn write_node(
        &self,
        particle: &Particle,
        out: &mut dyn Write,
        next: &dyn ParticleWrite,
    ) -> WriteResult<()> {
        let kind = particle.kind();
        match particle {
            Particle::Name(name) => {
                let text = Self::identifier(kind, name.text())?;
                write!(out, "'{}:{text}'", name.kind().prefix())?;
            }
            Particle::Variable(variable) => {
                write!(out, "${}", Self::identifier(kind, variable.text())?)?;
            }
            Particle::Tuple(tuple) => {
                let head = Self::identifier(kind, tuple.head().text())?;
                let close = match tuple.kind() {
                    TupleKind::FunctionExpression => {
                        write!(out, "{head}(")?;
                        ")"
                    }
                    TupleKind::AtomicPredicate => {
                        write!(out, "{head}[")?;
                        "]"
                    }
                    TupleKind::PredicateComprehension => {
                        write!(out, "{{{head};")?;
                        "}"
                    }
                    TupleKind::PredicateExpression => {
                        write!(out, "{{{head}:")?;
                        "}"
                    }
                };
                Self::write_arguments(tuple, out, next)?;
                out.write_all(close.as_bytes())?;
            }
            Particle::Quantified(quantified) => {
                let quantifier = Self::identifier(kind, quantified.quantifier().text())?;
                out.write_all(quantifier.as_bytes())?;
                next.write(&Particle::Variable(quantified.variable().clone()), out)?;
                out.write_all(b":")?;
                next.write(quantified.body(), out)?;
            }
        }
        Ok(())
    }
}

impl ParticleWrite for StandardWriter {
    fn write(&self, particle: &Particle, out: &mut dyn Write) -> WriteResult<()> {
        self.write_node(particle, out, self.next())
    }
}

/// Render `particle` through `writer` into a string.
pub fn write_to_string(writer: &dyn ParticleWrite, particle: &Particle) -> WriteResult<String> {
    let mut buf = Vec::new();
    writer.write(particle, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|err| WriteError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Canonical text of the particle, or its debug form if the standard writer rejects it.
impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match write_to_string(&StandardWriter::new(), self) {
            Ok(text) => f.write_str(&text),
            Err(_) => fmt::Debug::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ParticleKind;
    use crate::source::{BasicSource, ParticleSource};

    #[test]
    fn writes_every_tuple_shape() {
        let s = BasicSource::new();
        let x: Particle = s.variable_named("x").into();
        let y: Particle = s.variable_named("y").into();
        let f = s
            .function_expression(s.function_name("f"), vec![x.clone(), y.clone()])
            .unwrap();
        let p = s.atomic_predicate(s.predicate_name("P"), vec![f.clone()]).unwrap();
        let q = s.atomic_predicate(s.predicate_name("Q"), vec![]).unwrap();
        let c = s
            .predicate_comprehension(s.operator("set"), vec![p.clone(), q.clone()])
            .unwrap();
        let e = s.predicate_expression(s.operator("&"), vec![p.clone()]).unwrap();

        assert_eq!(f.to_string(), "f($x,$y)");
        assert_eq!(p.to_string(), "P[f($x,$y)]");
        assert_eq!(q.to_string(), "Q[]");
        assert_eq!(c.to_string(), "{set;P[f($x,$y)],Q[]}");
        assert_eq!(e.to_string(), "{&:P[f($x,$y)]}");
    }

    #[test]
    fn writes_name_literals() {
        let s = BasicSource::new();
        assert_eq!(Particle::from(s.operator("->")).to_string(), "'op:->'");
        assert_eq!(Particle::from(s.quantifier("E")).to_string(), "'quant:E'");
        assert_eq!(Particle::from(s.predicate_name("P")).to_string(), "'pred:P'");
    }

    #[test]
    fn unreadable_identifiers_are_rejected() {
        let s = BasicSource::new();
        let writer = StandardWriter::new();

        // Would print as `{&:P[$x],Q[$y]}` and read back with two arguments
        let smuggled: Particle = s.variable_named("x],Q[$y").into();
        let p = s.atomic_predicate(s.predicate_name("P"), vec![smuggled]).unwrap();
        let e = s.predicate_expression(s.operator("&"), vec![p]).unwrap();
        assert!(matches!(
            write_to_string(&writer, &e),
            Err(WriteError::Rejected {
                kind: ParticleKind::Variable,
                ..
            })
        ));

        let empty: Particle = s.variable_named("").into();
        assert!(write_to_string(&writer, &empty).is_err());
        let spaced: Particle = s.operator("a b").into();
        assert!(write_to_string(&writer, &spaced).is_err());
        let quoted = s
            .atomic_predicate(s.predicate_name("it's"), vec![])
            .unwrap();
        assert!(matches!(
            write_to_string(&writer, &quoted),
            Err(WriteError::Rejected {
                kind: ParticleKind::AtomicPredicate,
                ..
            })
        ));

        // Display falls back to the debug form instead of failing
        assert_eq!(empty.to_string(), format!("{empty:?}"));
    }

    /// Prints every variable as `$_`, everything else canonically.
    struct Redacting;

    impl ParticleWrite for Redacting {
        fn write(&self, particle: &Particle, out: &mut dyn Write) -> WriteResult<()> {
            match particle {
                Particle::Variable(_) => Ok(out.write_all(b"$_")?),
                other => StandardWriter::new().write_node(other, out, self),
            }
        }
    }

    /// Refuses quantified particles.
    struct QuantifierFree;

    impl ParticleWrite for QuantifierFree {
        fn write(&self, particle: &Particle, out: &mut dyn Write) -> WriteResult<()> {
            if particle.is_quantified() {
                return Err(WriteError::Rejected {
                    kind: particle.kind(),
                    reason: "quantifiers are not supported".into(),
                });
            }
            StandardWriter::new().write_node(particle, out, self)
        }
    }

    #[test]
    fn chain_intercepts_nested_particles() {
        let s = BasicSource::new();
        let x = s.variable_named("x");
        let body = s
            .atomic_predicate(s.predicate_name("P"), vec![x.clone().into()])
            .unwrap();
        let all = s
            .quantified_predicate(s.quantifier("A"), x, body.clone())
            .unwrap();

        assert_eq!(write_to_string(&Redacting, &all).unwrap(), "A$_:P[$_]");

        // The standard writer itself keeps printing the outer node
        let chained = StandardWriter::with_chain(Arc::new(Redacting));
        assert_eq!(write_to_string(&chained, &body).unwrap(), "P[$_]");
    }

    #[test]
    fn dialect_rejection_is_an_error_not_a_skip() {
        let s = BasicSource::new();
        let x = s.variable_named("x");
        let body = s
            .atomic_predicate(s.predicate_name("P"), vec![x.clone().into()])
            .unwrap();
        let inner = s
            .quantified_predicate(s.quantifier("E"), x.clone(), body)
            .unwrap();
        let outer = s.predicate_expression(s.operator("!"), vec![inner]).unwrap();

        let err = write_to_string(&QuantifierFree, &outer).unwrap_err();
        assert!(matches!(
            err,
            WriteError::Rejected {
                kind: ParticleKind::QuantifiedPredicate,
                ..
            }
        ));
    }
}
