use crate::basic_types::Literal;
use crate::engine::propagation::PropagatorId;
use crate::engine::sat::ClauseReference;

/// Why a literal was assigned.
///
/// The compact variants are turned into a clause only when the explanation is actually needed,
/// e.g. during conflict analysis or when proving the literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reason {
    /// A decision, or a fact without any antecedents.
    #[default]
    Decision,
    /// A fact asserted while the proof item `origin` was active. It is introduced into the
    /// proof as an axiom of that item when it is first needed.
    Default { origin: u32 },
    /// The clause propagated the literal.
    Clause(ClauseReference),
    /// The propagator will explain the literal on request; `inference` is handed back to it.
    Lazy { propagator: PropagatorId, inference: u32 },
    /// The literal is implied by the given false literal, i.e. the reason is `(lit v p)`.
    Literal(Literal),
    /// The reason is `(lit v p v q)` for the given false literals.
    Literals(Literal, Literal),
}

impl Reason {
    pub fn is_decision(self) -> bool {
        matches!(self, Reason::Decision)
    }
}
