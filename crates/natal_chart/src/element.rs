//! Element and polarity classifications shared by both traditions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yang => "Yang",
            Self::Yin => "Yin",
        }
    }
}

/// The five phases (Wu Xing), in generating-cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WuXing {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

pub const ALL_WU_XING: [WuXing; 5] = [
    WuXing::Wood,
    WuXing::Fire,
    WuXing::Earth,
    WuXing::Metal,
    WuXing::Water,
];

impl WuXing {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "Wood",
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Metal => "Metal",
            Self::Water => "Water",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Expressive (Yang) or receptive (Yin) character of the phase as a
    /// whole, independent of any stem's own polarity.
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Wood | Self::Fire | Self::Metal => Polarity::Yang,
            Self::Earth | Self::Water => Polarity::Yin,
        }
    }
}

/// Classical Western elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WesternElement {
    Fire,
    Earth,
    Air,
    Water,
}

impl WesternElement {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Air => "Air",
            Self::Water => "Water",
        }
    }

    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Fire | Self::Air => Polarity::Yang,
            Self::Earth | Self::Water => Polarity::Yin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_cycle_order() {
        for (i, e) in ALL_WU_XING.iter().enumerate() {
            assert_eq!(e.index(), i);
        }
    }

    #[test]
    fn polarity_tables() {
        assert_eq!(WuXing::Metal.polarity(), Polarity::Yang);
        assert_eq!(WuXing::Earth.polarity(), Polarity::Yin);
        assert_eq!(WesternElement::Air.polarity(), Polarity::Yang);
        assert_eq!(WesternElement::Water.polarity(), Polarity::Yin);
    }
}
