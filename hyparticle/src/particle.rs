//! The particle family: names, variables, tuples and quantified particles.
//!
//! Role
//! - [`Particle`] is a closed sum over the four families. Every classification, hashing,
//!   equality and serialization site matches on it exhaustively.
//! - Particles are immutable and cheap to clone: tuples and quantified particles live
//!   behind an [`Arc`], names share their identifier through an `Arc<str>`. The same
//!   sub-particle may therefore appear under any number of parents.
//!
//! Construction
//! - Particles are only created by a [`ParticleSource`](crate::source::ParticleSource),
//!   which validates the type algebra before calling the crate-private constructors here.
//!
//! Equality semantics
//! - Equality and hashing are structural: they depend on kinds, identifiers and children,
//!   never on identity or on the originating source.
//! - All hashes are computed once at construction; a hash mismatch rejects equality
//!   immediately, a hash match is always confirmed structurally.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

use crate::hash::{combine, combine_all, hash_bytes};
use crate::kind::{NameKind, ParticleKind, QuantifiedKind, TupleKind};
use crate::source::{BasicSource, ParticleSource};

/// Inline capacity of tuple argument lists.
pub type Arguments = SmallVec<[Particle; 4]>;

/// Non-owning association between a particle and the source that created it.
///
/// Never keeps the source alive; [`Origin::source`] returns `None` once it is dropped.
#[derive(Clone)]
pub struct Origin(Weak<dyn ParticleSource>);

impl Origin {
    /// Create an origin pointing at `source`.
    pub fn new(source: Weak<dyn ParticleSource>) -> Self {
        Self(source)
    }

    /// An origin that is not attached to any source.
    pub fn detached() -> Self {
        Self(Weak::<BasicSource>::new())
    }

    /// Upgrade to the originating source, if it is still alive.
    pub fn source(&self) -> Option<Arc<dyn ParticleSource>> {
        self.0.upgrade()
    }

    /// Whether both origins designate the same source.
    pub fn same_source(&self, other: &Origin) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.strong_count() > 0 {
            f.write_str("Origin(attached)")
        } else {
            f.write_str("Origin(detached)")
        }
    }
}

/// An atomic identifier tagged with its role.
#[derive(Clone)]
pub struct Name {
    kind: NameKind,
    text: Arc<str>,
    hash: u64,
    origin: Origin,
}

impl Name {
    pub(crate) fn new(kind: NameKind, text: &str, origin: Origin) -> Self {
        let hash = combine(hash_bytes(text.as_bytes()), ParticleKind::from(kind) as u64);
        Self {
            kind,
            text: Arc::from(text),
            hash,
            origin,
        }
    }

    /// Role of this name.
    #[inline]
    pub fn kind(&self) -> NameKind {
        self.kind
    }

    /// The identifier.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.hash == other.hash && self.text == other.text
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name('{}:{}')", self.kind.prefix(), self.text)
    }
}

/// A variable, wrapping exactly one name of kind [`NameKind::VariableName`].
#[derive(Clone)]
pub struct Variable {
    name: Name,
    hash: u64,
    origin: Origin,
}

impl Variable {
    pub(crate) fn new(name: Name, origin: Origin) -> Self {
        debug_assert_eq!(name.kind(), NameKind::VariableName);
        let hash = combine(name.hash_code(), ParticleKind::Variable as u64);
        Self { name, hash, origin }
    }

    /// The wrapped variable name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Identifier of the wrapped name.
    #[inline]
    pub fn text(&self) -> &str {
        self.name.text()
    }

    #[inline]
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable(${})", self.text())
    }
}

/// A head name applied to an ordered list of arguments.
///
/// See [`TupleKind`] for the head and argument discipline of each kind.
pub struct Tuple {
    kind: TupleKind,
    head: Name,
    args: Arguments,
    hash: u64,
    origin: Origin,
}

impl Tuple {
    pub(crate) fn new(kind: TupleKind, head: Name, args: Arguments, origin: Origin) -> Self {
        let hash = combine(
            combine(ParticleKind::from(kind) as u64, head.hash_code()),
            combine_all(args.iter().map(Particle::hash_code)),
        );
        Self {
            kind,
            head,
            args,
            hash,
            origin,
        }
    }

    #[inline]
    pub fn kind(&self) -> TupleKind {
        self.kind
    }

    /// The head name (slot 0).
    #[inline]
    pub fn head(&self) -> &Name {
        &self.head
    }

    /// Number of arguments.
    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Argument at `idx` (0-based, head excluded).
    #[inline]
    pub fn argument(&self, idx: usize) -> Option<&Particle> {
        self.args.get(idx)
    }

    #[inline]
    pub fn arguments(&self) -> &[Particle] {
        &self.args
    }

    #[inline]
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.hash != other.hash {
            return false;
        }
        self.head == other.head
            && self.args.len() == other.args.len()
            && self.args.iter().zip(other.args.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for Tuple {}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tuple")
            .field("kind", &self.kind)
            .field("head", &self.head.text())
            .field("args", &self.args)
            .finish()
    }
}

/// A quantifier binding a variable over a predicate body.
pub struct Quantified {
    kind: QuantifiedKind,
    quantifier: Name,
    variable: Variable,
    body: Particle,
    hash: u64,
    origin: Origin,
}

impl Quantified {
    pub(crate) fn new(
        kind: QuantifiedKind,
        quantifier: Name,
        variable: Variable,
        body: Particle,
        origin: Origin,
    ) -> Self {
        let hash = combine_all([
            ParticleKind::from(kind) as u64,
            quantifier.hash_code(),
            variable.hash_code(),
            body.hash_code(),
        ]);
        Self {
            kind,
            quantifier,
            variable,
            body,
            hash,
            origin,
        }
    }

    #[inline]
    pub fn kind(&self) -> QuantifiedKind {
        self.kind
    }

    #[inline]
    pub fn quantifier(&self) -> &Name {
        &self.quantifier
    }

    /// The bound variable.
    #[inline]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The quantified predicate.
    #[inline]
    pub fn body(&self) -> &Particle {
        &self.body
    }

    #[inline]
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl PartialEq for Quantified {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.hash == other.hash
            && self.quantifier == other.quantifier
            && self.variable == other.variable
            && self.body == other.body
    }
}

impl Eq for Quantified {}

impl fmt::Debug for Quantified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantified")
            .field("kind", &self.kind)
            .field("quantifier", &self.quantifier.text())
            .field("variable", &self.variable)
            .field("body", &self.body)
            .finish()
    }
}

/// Any node of the particle algebra.
#[derive(Clone, EnumIs, EnumTryAs)]
pub enum Particle {
    Name(Name),
    Variable(Variable),
    Tuple(Arc<Tuple>),
    Quantified(Arc<Quantified>),
}

impl Particle {
    /// The 13-valued kind tag.
    pub fn kind(&self) -> ParticleKind {
        match self {
            Particle::Name(n) => n.kind().into(),
            Particle::Variable(_) => ParticleKind::Variable,
            Particle::Tuple(t) => t.kind().into(),
            Particle::Quantified(q) => q.kind().into(),
        }
    }

    /// Number of structural slots: 0 for names, 1 for variables, arity + 1 for tuples and 3
    /// for quantified particles.
    pub fn length(&self) -> usize {
        match self {
            Particle::Name(_) => 0,
            Particle::Variable(_) => 1,
            Particle::Tuple(t) => t.arity() + 1,
            Particle::Quantified(_) => 3,
        }
    }

    /// Structural slot `idx`, or `None` when out of range.
    ///
    /// Slot 0 of a tuple is its head; slots of a quantified particle are quantifier,
    /// variable and body.
    pub fn part(&self, idx: usize) -> Option<Particle> {
        match self {
            Particle::Name(_) => None,
            Particle::Variable(v) => (idx == 0).then(|| Particle::Name(v.name().clone())),
            Particle::Tuple(t) => match idx {
                0 => Some(Particle::Name(t.head().clone())),
                _ => t.argument(idx - 1).cloned(),
            },
            Particle::Quantified(q) => match idx {
                0 => Some(Particle::Name(q.quantifier().clone())),
                1 => Some(Particle::Variable(q.variable().clone())),
                2 => Some(q.body().clone()),
                _ => None,
            },
        }
    }

    /// All structural slots in order.
    pub fn parts(&self) -> Vec<Particle> {
        (0..self.length()).filter_map(|idx| self.part(idx)).collect()
    }

    /// Whether this particle denotes a term.
    pub fn is_term(&self) -> bool {
        self.kind().denotes_term()
    }

    /// Whether this particle denotes a predicate.
    pub fn is_predicate(&self) -> bool {
        self.kind().denotes_predicate()
    }

    /// Structural hash, computed at construction.
    pub fn hash_code(&self) -> u64 {
        match self {
            Particle::Name(n) => n.hash_code(),
            Particle::Variable(v) => v.hash_code(),
            Particle::Tuple(t) => t.hash_code(),
            Particle::Quantified(q) => q.hash_code(),
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Particle::Name(n) => n.origin(),
            Particle::Variable(v) => v.origin(),
            Particle::Tuple(t) => t.origin(),
            Particle::Quantified(q) => q.origin(),
        }
    }

    /// The source that created this particle, if it is still alive.
    pub fn source(&self) -> Option<Arc<dyn ParticleSource>> {
        self.origin().source()
    }
}

impl From<Name> for Particle {
    fn from(name: Name) -> Self {
        Particle::Name(name)
    }
}

impl From<Variable> for Particle {
    fn from(variable: Variable) -> Self {
        Particle::Variable(variable)
    }
}

impl From<Tuple> for Particle {
    fn from(tuple: Tuple) -> Self {
        Particle::Tuple(Arc::new(tuple))
    }
}

impl From<Quantified> for Particle {
    fn from(quantified: Quantified) -> Self {
        Particle::Quantified(Arc::new(quantified))
    }
}

impl PartialEq for Particle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Particle::Name(a), Particle::Name(b)) => a == b,
            (Particle::Variable(a), Particle::Variable(b)) => a == b,
            (Particle::Tuple(a), Particle::Tuple(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (Particle::Quantified(a), Particle::Quantified(b)) => Arc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

impl Eq for Particle {}

impl Hash for Particle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Debug for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Particle::Name(n) => n.fmt(f),
            Particle::Variable(v) => v.fmt(f),
            Particle::Tuple(t) => t.fmt(f),
            Particle::Quantified(q) => q.fmt(f),
        }
    }
}
