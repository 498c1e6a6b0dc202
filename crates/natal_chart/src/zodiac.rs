//! Tropical zodiac signs and degree-minute-second formatting.
//!
//! Twelve equal 30° signs starting at the vernal equinox.

use natal_time::normalize_deg;
use serde::{Deserialize, Serialize};

use crate::element::WesternElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in order (0 = Aries).
pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index (Aries = 0 .. Pisces = 11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Triplicity: Fire, Earth, Air, Water repeating from Aries.
    pub const fn element(self) -> WesternElement {
        match self.index() % 4 {
            0 => WesternElement::Fire,
            1 => WesternElement::Earth,
            2 => WesternElement::Air,
            _ => WesternElement::Water,
        }
    }
}

/// Degrees-minutes-seconds of a non-negative angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: u16,
    pub minutes: u8,
    pub seconds: f64,
}

/// Decimal degrees to DMS; the sign of the input is dropped.
pub fn deg_to_dms(deg: f64) -> Dms {
    let d = deg.abs();
    let degrees = d.floor();
    let rem = (d - degrees) * 60.0;
    let minutes = rem.floor();
    Dms {
        degrees: degrees as u16,
        minutes: minutes as u8,
        seconds: (rem - minutes) * 60.0,
    }
}

/// Sign and position within it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPosition {
    pub sign: ZodiacSign,
    /// [0, 30)
    pub degree_in_sign: f64,
    pub dms: Dms,
}

/// Sign of an ecliptic longitude. Boundaries belong to the later sign.
pub fn sign_of(lon_deg: f64) -> SignPosition {
    let lon = normalize_deg(lon_deg);
    let idx = ((lon / 30.0).floor() as usize).min(11);
    let degree_in_sign = lon - idx as f64 * 30.0;
    SignPosition {
        sign: ALL_SIGNS[idx],
        degree_in_sign,
        dms: deg_to_dms(degree_in_sign),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(sign_of(0.0).sign, ZodiacSign::Aries);
        assert_eq!(sign_of(30.0).sign, ZodiacSign::Taurus);
        assert_eq!(sign_of(359.999).sign, ZodiacSign::Pisces);
        assert_eq!(sign_of(-0.5).sign, ZodiacSign::Pisces);
        assert_eq!(sign_of(360.0).sign, ZodiacSign::Aries);
    }

    #[test]
    fn degree_in_sign() {
        let p = sign_of(92.5);
        assert_eq!(p.sign, ZodiacSign::Cancer);
        assert!((p.degree_in_sign - 2.5).abs() < 1e-12);
        assert_eq!(p.dms.degrees, 2);
        assert_eq!(p.dms.minutes, 30);
    }

    #[test]
    fn dms_known() {
        let d = deg_to_dms(23.853);
        assert_eq!((d.degrees, d.minutes), (23, 51));
        assert!((d.seconds - 10.8).abs() < 0.01);
    }

    #[test]
    fn triplicities() {
        assert_eq!(ZodiacSign::Leo.element(), WesternElement::Fire);
        assert_eq!(ZodiacSign::Virgo.element(), WesternElement::Earth);
        assert_eq!(ZodiacSign::Aquarius.element(), WesternElement::Air);
        assert_eq!(ZodiacSign::Pisces.element(), WesternElement::Water);
    }
}
