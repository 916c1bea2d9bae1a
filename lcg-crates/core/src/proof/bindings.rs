use crate::basic_types::Literal;
use crate::engine::variables::IntVarId;

/// What a named model entry refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BindingTarget {
    /// A Boolean decision variable, written as `0` or `1`.
    Literal(Literal),
    IntVar(IntVarId),
}

/// A named entry of the solution file.
#[derive(Clone, Debug)]
pub(crate) struct Binding {
    pub(crate) name: String,
    pub(crate) target: BindingTarget,
    /// The value in the most recently saved model.
    pub(crate) value: Option<i64>,
}

impl Binding {
    pub(crate) fn new(name: impl Into<String>, target: BindingTarget) -> Binding {
        Binding {
            name: name.into(),
            target,
            value: None,
        }
    }
}
