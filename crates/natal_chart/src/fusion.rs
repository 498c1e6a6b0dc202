//! Fusion signature: a two-layer visual descriptor combining the BaZi day
//! master with the Western sun sign.
//!
//! The Yin input becomes the background container, the Yang input the
//! foreground core. When both share a polarity the BaZi input takes the
//! foreground and a contrast palette keeps the two layers distinguishable.

use serde::Serialize;

use crate::element::{Polarity, WuXing};
use crate::zodiac::ZodiacSign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Bazi,
    Western,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Diamond,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Background,
    Foreground,
}

const YANG_COLOR: &str = "#A8D8F8";
const YIN_COLOR: &str = "#F2E8D1";

/// Same-polarity palettes: (background, foreground).
const CONTRAST_YANG: (&str, &str) = ("#D0E8F8", "#7FB6FF");
const CONTRAST_YIN: (&str, &str) = ("#FAF5E6", "#E6DCC0");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FusionLayer {
    pub source: Tradition,
    pub role: LayerRole,
    pub element: &'static str,
    pub polarity: Polarity,
    pub shape: Shape,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FusionSignature {
    pub background: FusionLayer,
    pub foreground: FusionLayer,
    /// Both inputs had the same polarity.
    pub contrast_applied: bool,
    pub description: String,
}

struct Input {
    source: Tradition,
    element: &'static str,
    polarity: Polarity,
}

impl Input {
    fn layer(&self, role: LayerRole, color: &'static str) -> FusionLayer {
        FusionLayer {
            source: self.source,
            role,
            element: self.element,
            polarity: self.polarity,
            shape: shape_for(self.element, self.polarity),
            color,
        }
    }
}

fn shape_for(element: &str, polarity: Polarity) -> Shape {
    match (polarity, element) {
        (Polarity::Yin, _) => Shape::Circle,
        (Polarity::Yang, "Metal" | "Air") => Shape::Diamond,
        (Polarity::Yang, _) => Shape::Triangle,
    }
}

/// Combine the day-master element with the sun sign.
pub fn fusion_signature(day_master: WuXing, sun_sign: ZodiacSign) -> FusionSignature {
    let eastern = Input {
        source: Tradition::Bazi,
        element: day_master.name(),
        polarity: day_master.polarity(),
    };
    let western_element = sun_sign.element();
    let western = Input {
        source: Tradition::Western,
        element: western_element.name(),
        polarity: western_element.polarity(),
    };

    let contrast_applied = eastern.polarity == western.polarity;
    let (background, foreground) = if contrast_applied {
        let (bg, fg) = match eastern.polarity {
            Polarity::Yang => CONTRAST_YANG,
            Polarity::Yin => CONTRAST_YIN,
        };
        (
            western.layer(LayerRole::Background, bg),
            eastern.layer(LayerRole::Foreground, fg),
        )
    } else if eastern.polarity == Polarity::Yin {
        (
            eastern.layer(LayerRole::Background, YIN_COLOR),
            western.layer(LayerRole::Foreground, YANG_COLOR),
        )
    } else {
        (
            western.layer(LayerRole::Background, YIN_COLOR),
            eastern.layer(LayerRole::Foreground, YANG_COLOR),
        )
    };

    let description = format!(
        "The {} ({}) core structures the {} ({}) context.",
        foreground.element,
        foreground.polarity.name(),
        background.element,
        background.polarity.name(),
    );

    FusionSignature {
        background,
        foreground,
        contrast_applied,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yang_metal_over_yin_earth() {
        let f = fusion_signature(WuXing::Metal, ZodiacSign::Taurus);
        assert!(!f.contrast_applied);
        assert_eq!(f.foreground.source, Tradition::Bazi);
        assert_eq!(f.foreground.shape, Shape::Diamond);
        assert_eq!(f.background.source, Tradition::Western);
        assert_eq!(f.background.shape, Shape::Circle);
        assert_eq!(
            f.description,
            "The Metal (Yang) core structures the Earth (Yin) context."
        );
    }

    #[test]
    fn yin_bazi_becomes_background() {
        let f = fusion_signature(WuXing::Water, ZodiacSign::Leo);
        assert_eq!(f.background.source, Tradition::Bazi);
        assert_eq!(f.foreground.source, Tradition::Western);
        assert_eq!(f.foreground.shape, Shape::Triangle);
        assert_eq!(f.foreground.color, YANG_COLOR);
        assert_eq!(f.background.color, YIN_COLOR);
    }

    #[test]
    fn same_polarity_uses_contrast() {
        for (el, sign) in [
            (WuXing::Fire, ZodiacSign::Gemini),
            (WuXing::Earth, ZodiacSign::Cancer),
        ] {
            let f = fusion_signature(el, sign);
            assert!(f.contrast_applied);
            assert_eq!(f.foreground.source, Tradition::Bazi);
            assert_eq!(f.background.source, Tradition::Western);
            assert_ne!(f.foreground.color, f.background.color);
        }
    }

    #[test]
    fn deterministic() {
        let a = fusion_signature(WuXing::Wood, ZodiacSign::Scorpio);
        let b = fusion_signature(WuXing::Wood, ZodiacSign::Scorpio);
        assert_eq!(a, b);
    }
}
