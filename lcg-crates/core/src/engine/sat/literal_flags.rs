use bitfield::Bit;
use bitfield::BitMut;

const DECIDABLE_BIT: usize = 0;
const UIPABLE_BIT: usize = 1;
const LEARNABLE_BIT: usize = 2;

/// Per-variable permissions used by branching and conflict analysis.
///
/// A variable which may be decided on may also be a UIP; the setters keep that implication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LiteralFlags {
    bits: u8,
}

impl Default for LiteralFlags {
    fn default() -> Self {
        LiteralFlags { bits: 0b111 }
    }
}

impl LiteralFlags {
    pub(crate) fn decidable(self) -> bool {
        self.bits.bit(DECIDABLE_BIT)
    }

    pub(crate) fn uipable(self) -> bool {
        self.bits.bit(UIPABLE_BIT)
    }

    pub(crate) fn learnable(self) -> bool {
        self.bits.bit(LEARNABLE_BIT)
    }

    pub(crate) fn set_decidable(&mut self, decidable: bool) {
        self.bits.set_bit(DECIDABLE_BIT, decidable);
        if decidable {
            self.bits.set_bit(UIPABLE_BIT, true);
        }
    }

    pub(crate) fn set_uipable(&mut self, uipable: bool) {
        self.bits.set_bit(UIPABLE_BIT, uipable);
        if !uipable {
            self.bits.set_bit(DECIDABLE_BIT, false);
        }
    }

    pub(crate) fn set_learnable(&mut self, learnable: bool) {
        self.bits.set_bit(LEARNABLE_BIT, learnable);
    }
}
