/// What a Boolean variable is attached to, and therefore who is told when it becomes assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// A plain SAT variable; assignments are not forwarded.
    #[default]
    None,
    /// A channel literal of an integer variable.
    IntVar,
    /// A literal owned by a propagator, which is woken up when it is assigned.
    Propagator,
}

/// How the value stored in [`ChannelInfo`] is to be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The positive literal means `[x = value]`.
    #[default]
    Value,
    /// The positive literal means `[x > value]`.
    Bound,
}

/// Per-variable metadata linking a Boolean variable back to its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelInfo {
    /// The index of the owning integer variable or propagator.
    pub owner: u32,
    pub kind: ChannelKind,
    pub value_kind: ValueKind,
    pub value: i32,
}

impl ChannelInfo {
    pub fn unchanneled() -> ChannelInfo {
        ChannelInfo::default()
    }

    pub fn int_var(owner: u32, value_kind: ValueKind, value: i32) -> ChannelInfo {
        ChannelInfo {
            owner,
            kind: ChannelKind::IntVar,
            value_kind,
            value,
        }
    }

    pub fn propagator(owner: u32, value: i32) -> ChannelInfo {
        ChannelInfo {
            owner,
            kind: ChannelKind::Propagator,
            value_kind: ValueKind::Value,
            value,
        }
    }

    /// The same channel shifted `offset` values further, used when creating a block of
    /// consecutive variables.
    pub(crate) fn offset_by(self, offset: i32) -> ChannelInfo {
        ChannelInfo {
            value: self.value + offset,
            ..self
        }
    }
}
