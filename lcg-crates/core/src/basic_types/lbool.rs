use std::ops::BitXor;

/// A three-valued truth value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lbool {
    True,
    False,
    #[default]
    Undefined,
}

impl Lbool {
    pub fn is_true(self) -> bool {
        self == Lbool::True
    }

    pub fn is_false(self) -> bool {
        self == Lbool::False
    }

    pub fn is_undefined(self) -> bool {
        self == Lbool::Undefined
    }

    pub fn to_option(self) -> Option<bool> {
        match self {
            Lbool::True => Some(true),
            Lbool::False => Some(false),
            Lbool::Undefined => None,
        }
    }
}

impl From<bool> for Lbool {
    fn from(value: bool) -> Self {
        if value {
            Lbool::True
        } else {
            Lbool::False
        }
    }
}

/// Flips a defined value when the right-hand side is `true`.
impl BitXor<bool> for Lbool {
    type Output = Lbool;

    fn bitxor(self, flip: bool) -> Self::Output {
        match (self, flip) {
            (Lbool::True, true) => Lbool::False,
            (Lbool::False, true) => Lbool::True,
            (value, _) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_not_flipped() {
        assert_eq!(Lbool::Undefined, Lbool::Undefined ^ true);
        assert_eq!(Lbool::False, Lbool::True ^ true);
        assert_eq!(Lbool::True, Lbool::True ^ false);
    }
}
