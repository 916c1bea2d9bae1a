use std::fmt::Display;
use std::ops::Not;

/// The relation of an [`Atom`] between a variable and a constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    NotEqual,
    LessThanEqual,
    LessThan,
    GreaterThanEqual,
    GreaterThan,
}

impl Relation {
    /// The textual form as used in the literal semantics file.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Equal => "=",
            Relation::NotEqual => "!=",
            Relation::LessThanEqual => "<=",
            Relation::LessThan => "<",
            Relation::GreaterThanEqual => ">=",
            Relation::GreaterThan => ">",
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Not for Relation {
    type Output = Relation;

    fn not(self) -> Self::Output {
        match self {
            Relation::Equal => Relation::NotEqual,
            Relation::NotEqual => Relation::Equal,
            Relation::LessThanEqual => Relation::GreaterThan,
            Relation::LessThan => Relation::GreaterThanEqual,
            Relation::GreaterThanEqual => Relation::LessThan,
            Relation::GreaterThan => Relation::LessThanEqual,
        }
    }
}

/// An atomic constraint over a single named variable, e.g. `[x >= 5]`.
///
/// Boolean variables are described as integer atoms over `{0, 1}`, e.g. `[b >= 1]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Atom<Identifier = String> {
    /// The name of the variable.
    pub name: Identifier,
    /// The operation on the domain.
    pub relation: Relation,
    /// The right-hand side of the relation.
    pub value: i64,
}

impl<Identifier> Atom<Identifier> {
    pub fn new(name: Identifier, relation: Relation, value: i64) -> Self {
        Atom {
            name,
            relation,
            value,
        }
    }

    /// Whether the atom holds when its variable takes `assigned`.
    pub fn is_satisfied_by(&self, assigned: i64) -> bool {
        match self.relation {
            Relation::Equal => assigned == self.value,
            Relation::NotEqual => assigned != self.value,
            Relation::LessThanEqual => assigned <= self.value,
            Relation::LessThan => assigned < self.value,
            Relation::GreaterThanEqual => assigned >= self.value,
            Relation::GreaterThan => assigned > self.value,
        }
    }
}

impl<Identifier: Display> Display for Atom<Identifier> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {} {}]", self.name, self.relation, self.value)
    }
}

impl<Identifier> Not for Atom<Identifier> {
    type Output = Atom<Identifier>;

    fn not(self) -> Self::Output {
        Atom {
            name: self.name,
            relation: !self.relation,
            value: self.value,
        }
    }
}
