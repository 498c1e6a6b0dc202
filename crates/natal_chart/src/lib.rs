//! Chart-level derivations on top of the position engine.
//!
//! - [`houses`]: Ascendant, Midheaven and their opposites
//! - [`zodiac`]: tropical signs
//! - [`bazi`]: Four Pillars of Destiny
//! - [`fusion`] and [`harmony`]: cross-tradition synthesis

pub mod bazi;
pub mod element;
pub mod error;
pub mod fusion;
pub mod harmony;
pub mod houses;
pub mod zodiac;

pub use bazi::{
    BaziInput, Branch, ElementBalance, FourPillars, Pillar, PillarPrecision, Stem, day_pillar,
    element_balance, four_pillars, hour_pillar, month_pillar, year_pillar,
};
pub use element::{ALL_WU_XING, Polarity, WesternElement, WuXing};
pub use error::ChartError;
pub use fusion::{FusionLayer, FusionSignature, LayerRole, Shape, Tradition, fusion_signature};
pub use harmony::{ElementHarmony, ElementVector, element_harmony};
pub use houses::{ChartAngle, HouseFrame, ascendant_deg, midheaven_deg};
pub use zodiac::{ALL_SIGNS, Dms, SignPosition, ZodiacSign, deg_to_dms, sign_of};
