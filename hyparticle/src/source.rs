//! Particle sources: the validating factories of the particle algebra.
//!
//! Role
//! - [`ParticleSource`] is the only way to construct particles. Its provided methods
//!   enforce every invariant of the type algebra (head kinds, argument classes, quantified
//!   bodies) before a particle exists.
//! - [`BasicSource`] is the stock, stateless implementation. Sources are interchangeable;
//!   each one only contributes the [`Origin`] stamped into the particles it creates.
//!
//! Failures are reported as [`InvalidArgument`]: they signal a malformed call, never
//! malformed input text.
//!
//! Example
//! ```
//! use hyparticle::prelude::*;
//!
//! let source = BasicSource::new();
//! let x = source.variable_named("x");
//! let foo = source.predicate_name("Foo");
//! let atom = source.atomic_predicate(foo, vec![x.into()]).unwrap();
//! assert!(atom.is_predicate());
//! assert_eq!(atom.to_string(), "Foo[$x]");
//! ```
use std::sync::{Arc, Weak};

use log::debug;

use crate::error::{Class, ConstructResult, InvalidArgument};
use crate::kind::{NameKind, ParticleKind, QuantifiedKind, TupleKind};
use crate::particle::{Arguments, Name, Origin, Particle, Quantified, Tuple, Variable};

fn reject<T>(err: InvalidArgument) -> ConstructResult<T> {
    debug!("particle source rejected construction: {err}");
    Err(err)
}

fn expect_name_kind(name: &Name, expected: NameKind) -> ConstructResult<()> {
    if name.kind() != expected {
        return reject(InvalidArgument::NameKind {
            expected,
            found: name.kind(),
        });
    }
    Ok(())
}

fn expect_part_name(kind: ParticleKind, index: usize, part: Particle) -> ConstructResult<Name> {
    match part {
        Particle::Name(name) => Ok(name),
        other => reject(InvalidArgument::PartShape {
            kind,
            index,
            expected: Class::Name,
            found: other.kind(),
        }),
    }
}

/// Validating factory for particles.
///
/// Implementors only provide [`ParticleSource::origin`]; every constructor is a provided
/// method so that validation is never duplicated. A source is `Send + Sync` and may be
/// shared by any number of readers.
pub trait ParticleSource: Send + Sync {
    /// Back-reference stamped into every particle created by this source.
    fn origin(&self) -> Origin;

    /// Create a name of the given role.
    fn name(&self, kind: NameKind, text: &str) -> Name {
        Name::new(kind, text, self.origin())
    }

    fn variable_name(&self, text: &str) -> Name {
        self.name(NameKind::VariableName, text)
    }

    fn function_name(&self, text: &str) -> Name {
        self.name(NameKind::FunctionName, text)
    }

    fn predicate_name(&self, text: &str) -> Name {
        self.name(NameKind::PredicateName, text)
    }

    fn operator(&self, text: &str) -> Name {
        self.name(NameKind::Operator, text)
    }

    fn quantifier(&self, text: &str) -> Name {
        self.name(NameKind::Quantifier, text)
    }

    /// Wrap a variable name into a variable.
    ///
    /// Fails if `name` is not a [`NameKind::VariableName`].
    fn variable(&self, name: Name) -> ConstructResult<Variable> {
        expect_name_kind(&name, NameKind::VariableName)?;
        Ok(Variable::new(name, self.origin()))
    }

    /// Create a variable together with its name.
    fn variable_named(&self, text: &str) -> Variable {
        Variable::new(self.variable_name(text), self.origin())
    }

    /// Create a tuple of the given kind.
    ///
    /// Fails if the head kind or the class of any argument violates the discipline of
    /// `kind` (see [`TupleKind`]).
    fn tuple(&self, kind: TupleKind, head: Name, args: Vec<Particle>) -> ConstructResult<Particle> {
        expect_name_kind(&head, kind.head_kind())?;
        let expected = if kind.takes_terms() {
            Class::Term
        } else {
            Class::Predicate
        };
        for (idx, arg) in args.iter().enumerate() {
            let ok = if kind.takes_terms() {
                arg.is_term()
            } else {
                arg.is_predicate()
            };
            if !ok {
                return reject(InvalidArgument::ArgumentClass {
                    kind: kind.into(),
                    index: idx + 1,
                    expected,
                });
            }
        }
        Ok(Tuple::new(kind, head, Arguments::from_vec(args), self.origin()).into())
    }

    fn function_expression(&self, head: Name, args: Vec<Particle>) -> ConstructResult<Particle> {
        self.tuple(TupleKind::FunctionExpression, head, args)
    }

    fn atomic_predicate(&self, head: Name, args: Vec<Particle>) -> ConstructResult<Particle> {
        self.tuple(TupleKind::AtomicPredicate, head, args)
    }

    fn predicate_comprehension(
        &self,
        operator: Name,
        args: Vec<Particle>,
    ) -> ConstructResult<Particle> {
        self.tuple(TupleKind::PredicateComprehension, operator, args)
    }

    fn predicate_expression(&self, operator: Name, args: Vec<Particle>) -> ConstructResult<Particle> {
        self.tuple(TupleKind::PredicateExpression, operator, args)
    }

    /// Create a quantified particle binding `variable` over `body`.
    ///
    /// Fails if `quantifier` is not a [`NameKind::Quantifier`] or `body` is not a predicate.
    fn quantified(
        &self,
        kind: QuantifiedKind,
        quantifier: Name,
        variable: Variable,
        body: Particle,
    ) -> ConstructResult<Particle> {
        expect_name_kind(&quantifier, NameKind::Quantifier)?;
        if !body.is_predicate() {
            return reject(InvalidArgument::ArgumentClass {
                kind: kind.into(),
                index: 3,
                expected: Class::Predicate,
            });
        }
        Ok(Quantified::new(kind, quantifier, variable, body, self.origin()).into())
    }

    fn quantified_term(
        &self,
        quantifier: Name,
        variable: Variable,
        body: Particle,
    ) -> ConstructResult<Particle> {
        self.quantified(QuantifiedKind::QuantifiedTerm, quantifier, variable, body)
    }

    fn quantified_predicate(
        &self,
        quantifier: Name,
        variable: Variable,
        body: Particle,
    ) -> ConstructResult<Particle> {
        self.quantified(QuantifiedKind::QuantifiedPredicate, quantifier, variable, body)
    }

    /// Build any composite particle from its structural parts.
    ///
    /// `parts` follows the slot layout of [`Particle::part`]: a name for variables; head
    /// then arguments for tuples; quantifier, variable and body for quantified particles.
    /// Part indices in errors are 0-based slots. Names cannot be built from parts.
    fn build(&self, kind: ParticleKind, parts: Vec<Particle>) -> ConstructResult<Particle> {
        if kind == ParticleKind::Variable {
            let [part]: [Particle; 1] = match parts.try_into() {
                Ok(parts) => parts,
                Err(parts) => {
                    return reject(InvalidArgument::PartCount {
                        kind,
                        expected: "exactly 1",
                        found: parts.len(),
                    });
                }
            };
            let name = expect_part_name(kind, 0, part)?;
            return self.variable(name).map(Particle::from);
        }

        if let Some(tuple_kind) = kind.as_tuple_kind() {
            let mut parts = parts.into_iter();
            let Some(head) = parts.next() else {
                return reject(InvalidArgument::PartCount {
                    kind,
                    expected: "at least 1",
                    found: 0,
                });
            };
            let head = expect_part_name(kind, 0, head)?;
            return self.tuple(tuple_kind, head, parts.collect());
        }

        if let Some(quantified_kind) = kind.as_quantified_kind() {
            let [quantifier, variable, body]: [Particle; 3] = match parts.try_into() {
                Ok(parts) => parts,
                Err(parts) => {
                    return reject(InvalidArgument::PartCount {
                        kind,
                        expected: "exactly 3",
                        found: parts.len(),
                    });
                }
            };
            let quantifier = expect_part_name(kind, 0, quantifier)?;
            let variable = match variable {
                Particle::Variable(variable) => variable,
                other => {
                    return reject(InvalidArgument::PartShape {
                        kind,
                        index: 1,
                        expected: Class::Variable,
                        found: other.kind(),
                    });
                }
            };
            return self.quantified(quantified_kind, quantifier, variable, body);
        }

        reject(InvalidArgument::NotConstructible(kind))
    }
}

/// Stateless particle source.
///
/// Always handed out behind an [`Arc`] so that particles can keep a weak back-reference.
#[derive(Debug)]
pub struct BasicSource {
    this: Weak<BasicSource>,
}

impl BasicSource {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self { this: this.clone() })
    }
}

impl ParticleSource for BasicSource {
    fn origin(&self) -> Origin {
        let this: Weak<dyn ParticleSource> = self.this.clone();
        Origin::new(this)
    }
}
