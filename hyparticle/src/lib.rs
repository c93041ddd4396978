//! Hyparticle: an immutable particle algebra for first-order logic, with a canonical text codec.
//!
//! A particle is one node of a first-order formula: a name, a variable, a function or
//! predicate application, an operator application, or a quantified formula. Particles are
//! immutable, structurally compared, and shared freely across threads.
//!
//! Layers
//!  - [`kind`]: the 13-valued kind tag and its term/predicate classification.
//!  - [`particle`]: the closed sum type of particles with precomputed structural hashes.
//!  - [`source`]: validating factories; the only way to construct particles.
//!  - [`reader`] / [`writer`]: the canonical grammar, as a recursive-descent reader with
//!    pluggable lexicon and dialect chain, and a chainable serializer.
//!  - [`pretty`]: width-aware, colored layout of the same grammar.
//!
//! Invariants
//!  - Every argument of a function expression or atomic predicate is a term; every argument
//!    of an operator application is a predicate; the body of a quantified particle is a
//!    predicate. Sources reject anything else with [`error::InvalidArgument`].
//!  - Equal particles have equal hashes; unequal hashes short-circuit equality.
//!  - Writing a particle and reading the text back yields an equal particle.
//!
//! Example
//! ```
//! use hyparticle::prelude::*;
//!
//! let source = BasicSource::new();
//! let p = parse_predicate(&*source, "E$y:{&:P[$y],Q[f($y)]}").unwrap();
//! assert_eq!(p.kind(), ParticleKind::QuantifiedPredicate);
//! assert_eq!(p.length(), 3);
//!
//! let again = parse_predicate(&*source, &p.to_string()).unwrap();
//! assert_eq!(p, again);
//! assert_eq!(p.hash_code(), again.hash_code());
//! ```

/// Error types of construction, reading and writing.
pub mod error;
/// Hash mixing shared by all particle families.
pub mod hash;
/// Kind tags and their classification.
pub mod kind;
/// The particle sum type and its families.
pub mod particle;
/// Pretty-printing with width-aware layout and terminal colors.
pub mod pretty;
/// Recursive-descent reader of the canonical grammar.
pub mod reader;
/// Validating particle factories.
pub mod source;
/// Canonical serializer.
pub mod writer;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - Particles and their kinds
    //! - `ParticleSource` trait with the factory helpers, and `BasicSource`
    //! - Reader, writer and pretty-printer entry points
    //! - Error types
    pub use crate::kind::{NameKind, ParticleKind, QuantifiedKind, TupleKind};
    pub use crate::particle::{Name, Origin, Particle, Quantified, Tuple, Variable};
    pub use crate::source::{BasicSource, ParticleSource};

    // Codec
    pub use crate::pretty::PrettyParticle;
    pub use crate::reader::{
        AsciiLexicon, CharStream, LexicalPolicy, ParticleRead, Position, SharedReader,
        StandardLexicon, StandardReader, parse_particle, parse_predicate, parse_term,
    };
    pub use crate::writer::{ParticleWrite, StandardWriter, write_to_string};

    // Errors
    pub use crate::error::{
        ConstructResult, InvalidArgument, ReadError, ReadResult, SyntaxError, WriteError,
        WriteResult,
    };
}
