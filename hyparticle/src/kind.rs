//! Kind tags classifying every particle.
//!
//! Role
//! - [`ParticleKind`] is the flat 13-valued tag carried by every particle.
//! - [`NameKind`], [`TupleKind`] and [`QuantifiedKind`] are the subsets valid for each
//!   particle family; they convert losslessly into [`ParticleKind`] and back via `TryFrom`.
use strum::{Display, EnumIs, EnumIter, FromRepr, IntoStaticStr};

/// Tag identifying the kind of any particle.
///
/// The discriminant is stable and participates in hashing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, FromRepr, Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum ParticleKind {
    // Generic name, only meaningful as a `read_particle` request
    Name,
    Variable,

    // Names
    VariableName,
    FunctionName,
    PredicateName,
    Operator,

    // Tuples
    FunctionExpression,
    AtomicPredicate,
    PredicateComprehension,
    PredicateExpression,

    Quantifier,

    // Quantified
    QuantifiedTerm,
    QuantifiedPredicate,
}

impl ParticleKind {
    /// Returns the name kind if this tag designates a name.
    pub fn as_name_kind(self) -> Option<NameKind> {
        NameKind::try_from(self).ok()
    }

    /// Returns the tuple kind if this tag designates a tuple.
    pub fn as_tuple_kind(self) -> Option<TupleKind> {
        TupleKind::try_from(self).ok()
    }

    /// Returns the quantified kind if this tag designates a quantified particle.
    pub fn as_quantified_kind(self) -> Option<QuantifiedKind> {
        QuantifiedKind::try_from(self).ok()
    }

    /// Whether particles of this kind denote terms.
    pub fn denotes_term(self) -> bool {
        matches!(
            self,
            ParticleKind::Variable
                | ParticleKind::FunctionExpression
                | ParticleKind::PredicateComprehension
                | ParticleKind::QuantifiedTerm
        )
    }

    /// Whether particles of this kind denote predicates.
    pub fn denotes_predicate(self) -> bool {
        matches!(
            self,
            ParticleKind::AtomicPredicate
                | ParticleKind::PredicateExpression
                | ParticleKind::QuantifiedPredicate
        )
    }

    /// Whether particles of this kind are names (including the generic [`ParticleKind::Name`]).
    pub fn denotes_name(self) -> bool {
        self == ParticleKind::Name || self.as_name_kind().is_some()
    }
}

/// Role of an atomic identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NameKind {
    VariableName,
    FunctionName,
    PredicateName,
    Operator,
    Quantifier,
}

impl NameKind {
    /// Prefix used by the quoted name literal `'<prefix>:<identifier>'`.
    pub fn prefix(self) -> &'static str {
        match self {
            NameKind::VariableName => "var",
            NameKind::FunctionName => "func",
            NameKind::PredicateName => "pred",
            NameKind::Operator => "op",
            NameKind::Quantifier => "quant",
        }
    }

    /// Inverse of [`NameKind::prefix`].
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "var" => Some(NameKind::VariableName),
            "func" => Some(NameKind::FunctionName),
            "pred" => Some(NameKind::PredicateName),
            "op" => Some(NameKind::Operator),
            "quant" => Some(NameKind::Quantifier),
            _ => None,
        }
    }
}

/// Argument discipline of a tuple.
///
/// | kind | head | arguments | tuple is a |
/// |---|---|---|---|
/// | function-expression | function-name | terms | term |
/// | atomic-predicate | predicate-name | terms | predicate |
/// | predicate-comprehension | operator | predicates | term |
/// | predicate-expression | operator | predicates | predicate |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TupleKind {
    FunctionExpression,
    AtomicPredicate,
    PredicateComprehension,
    PredicateExpression,
}

impl TupleKind {
    /// Name kind required for the head.
    pub fn head_kind(self) -> NameKind {
        match self {
            TupleKind::FunctionExpression => NameKind::FunctionName,
            TupleKind::AtomicPredicate => NameKind::PredicateName,
            TupleKind::PredicateComprehension | TupleKind::PredicateExpression => {
                NameKind::Operator
            }
        }
    }

    /// Whether arguments must be terms (`true`) or predicates (`false`).
    pub fn takes_terms(self) -> bool {
        matches!(
            self,
            TupleKind::FunctionExpression | TupleKind::AtomicPredicate
        )
    }

    /// Whether the tuple itself denotes a term.
    pub fn is_term(self) -> bool {
        matches!(
            self,
            TupleKind::FunctionExpression | TupleKind::PredicateComprehension
        )
    }
}

/// Whether a quantified particle denotes a term or a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum QuantifiedKind {
    QuantifiedTerm,
    QuantifiedPredicate,
}

macro_rules! impl_subkind {
    ($sub:ident { $($variant:ident),* $(,)? }) => {
        impl From<$sub> for ParticleKind {
            fn from(kind: $sub) -> Self {
                match kind {
                    $($sub::$variant => ParticleKind::$variant,)*
                }
            }
        }

        impl TryFrom<ParticleKind> for $sub {
            type Error = ParticleKind;

            fn try_from(kind: ParticleKind) -> Result<Self, Self::Error> {
                match kind {
                    $(ParticleKind::$variant => Ok($sub::$variant),)*
                    other => Err(other),
                }
            }
        }
    };
}

impl_subkind!(NameKind {
    VariableName,
    FunctionName,
    PredicateName,
    Operator,
    Quantifier,
});
impl_subkind!(TupleKind {
    FunctionExpression,
    AtomicPredicate,
    PredicateComprehension,
    PredicateExpression,
});
impl_subkind!(QuantifiedKind {
    QuantifiedTerm,
    QuantifiedPredicate,
});

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn discriminants_are_stable() {
        assert_eq!(ParticleKind::iter().count(), 13);
        assert_eq!(ParticleKind::Name as u8, 0);
        assert_eq!(ParticleKind::Quantifier as u8, 10);
        assert_eq!(ParticleKind::QuantifiedPredicate as u8, 12);
        assert_eq!(ParticleKind::from_repr(7), Some(ParticleKind::AtomicPredicate));
    }

    #[test]
    fn labels_are_kebab_case() {
        assert_eq!(
            ParticleKind::PredicateComprehension.to_string(),
            "predicate-comprehension"
        );
        assert_eq!(NameKind::VariableName.to_string(), "variable-name");
    }

    #[test]
    fn subkinds_round_trip_through_particle_kind() {
        for kind in NameKind::iter() {
            assert_eq!(ParticleKind::from(kind).as_name_kind(), Some(kind));
            assert_eq!(NameKind::from_prefix(kind.prefix()), Some(kind));
        }
        for kind in TupleKind::iter() {
            assert_eq!(ParticleKind::from(kind).as_tuple_kind(), Some(kind));
        }
        for kind in QuantifiedKind::iter() {
            assert_eq!(ParticleKind::from(kind).as_quantified_kind(), Some(kind));
        }
        assert_eq!(TupleKind::try_from(ParticleKind::Variable), Err(ParticleKind::Variable));
    }

    #[test]
    fn classification_is_exclusive() {
        for kind in ParticleKind::iter() {
            let flags = [
                kind.denotes_term(),
                kind.denotes_predicate(),
                kind.denotes_name(),
            ];
            assert!(flags.iter().filter(|f| **f).count() == 1, "{kind}");
        }
    }
}
