//! Four Pillars of Destiny (BaZi).
//!
//! Each pillar pairs one of ten Heavenly Stems with one of twelve Earthly
//! Branches. Together they run through a 60-term sexagenary cycle in which
//! stem and branch advance in lockstep, so only pairs of equal parity occur.
//!
//! - Year: changes at Li Chun (solar longitude 315°), not on January 1.
//! - Month: one branch per 30° of solar longitude, starting at Li Chun.
//! - Day: continuous count from the Julian Day Number of the civil date.
//! - Hour: double hours of true solar time; Zi straddles midnight.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use natal_time::{julian_day_number, normalize_deg, true_solar_time_minutes};
use serde::Serialize;

use crate::element::{ALL_WU_XING, Polarity, WuXing};
use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

pub const ALL_STEMS: [Stem; 10] = [
    Stem::Jia,
    Stem::Yi,
    Stem::Bing,
    Stem::Ding,
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
];

impl Stem {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Jia => "Jia",
            Self::Yi => "Yi",
            Self::Bing => "Bing",
            Self::Ding => "Ding",
            Self::Wu => "Wu",
            Self::Ji => "Ji",
            Self::Geng => "Geng",
            Self::Xin => "Xin",
            Self::Ren => "Ren",
            Self::Gui => "Gui",
        }
    }

    pub const fn chinese(self) -> &'static str {
        match self {
            Self::Jia => "甲",
            Self::Yi => "乙",
            Self::Bing => "丙",
            Self::Ding => "丁",
            Self::Wu => "戊",
            Self::Ji => "己",
            Self::Geng => "庚",
            Self::Xin => "辛",
            Self::Ren => "壬",
            Self::Gui => "癸",
        }
    }

    /// Stems come in pairs per element: Jia/Yi Wood, Bing/Ding Fire, ...
    pub const fn element(self) -> WuXing {
        ALL_WU_XING[self.index() / 2]
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

/// Fixed element of each branch, Zi first.
const BRANCH_ELEMENT: [WuXing; 12] = [
    WuXing::Water,
    WuXing::Earth,
    WuXing::Wood,
    WuXing::Wood,
    WuXing::Earth,
    WuXing::Fire,
    WuXing::Fire,
    WuXing::Earth,
    WuXing::Metal,
    WuXing::Metal,
    WuXing::Earth,
    WuXing::Water,
];

impl Branch {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Zi => "Zi",
            Self::Chou => "Chou",
            Self::Yin => "Yin",
            Self::Mao => "Mao",
            Self::Chen => "Chen",
            Self::Si => "Si",
            Self::Wu => "Wu",
            Self::Wei => "Wei",
            Self::Shen => "Shen",
            Self::You => "You",
            Self::Xu => "Xu",
            Self::Hai => "Hai",
        }
    }

    pub const fn chinese(self) -> &'static str {
        match self {
            Self::Zi => "子",
            Self::Chou => "丑",
            Self::Yin => "寅",
            Self::Mao => "卯",
            Self::Chen => "辰",
            Self::Si => "巳",
            Self::Wu => "午",
            Self::Wei => "未",
            Self::Shen => "申",
            Self::You => "酉",
            Self::Xu => "戌",
            Self::Hai => "亥",
        }
    }

    pub const fn animal(self) -> &'static str {
        match self {
            Self::Zi => "Rat",
            Self::Chou => "Ox",
            Self::Yin => "Tiger",
            Self::Mao => "Rabbit",
            Self::Chen => "Dragon",
            Self::Si => "Snake",
            Self::Wu => "Horse",
            Self::Wei => "Goat",
            Self::Shen => "Monkey",
            Self::You => "Rooster",
            Self::Xu => "Dog",
            Self::Hai => "Pig",
        }
    }

    pub const fn element(self) -> WuXing {
        BRANCH_ELEMENT[self.index()]
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

/// One stem-branch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
    /// Position in the sexagenary cycle, 0 = Jia-Zi.
    pub cycle_index: u8,
    pub stem_element: WuXing,
    pub stem_polarity: Polarity,
    pub branch_element: WuXing,
    pub branch_polarity: Polarity,
    pub animal: &'static str,
}

impl Pillar {
    /// Pillar at a (possibly negative or >59) cycle position.
    pub fn from_cycle(index: i64) -> Self {
        let i = index.rem_euclid(60) as usize;
        Self::from_parts(ALL_STEMS[i % 10], ALL_BRANCHES[i % 12])
    }

    /// Combine a stem and branch. Mixed parities do not occur in the cycle;
    /// for those the index reflects the stem-branch congruence only.
    pub fn from_parts(stem: Stem, branch: Branch) -> Self {
        let s = stem.index() as i64;
        let b = branch.index() as i64;
        let cycle_index = (6 * s - 5 * b).rem_euclid(60) as u8;
        Self {
            stem,
            branch,
            cycle_index,
            stem_element: stem.element(),
            stem_polarity: stem.polarity(),
            branch_element: branch.element(),
            branch_polarity: branch.polarity(),
            animal: branch.animal(),
        }
    }

    /// "甲子" style two-character form.
    pub fn chinese(&self) -> String {
        format!("{}{}", self.stem.chinese(), self.branch.chinese())
    }
}

/// Solar longitude of Li Chun, the start of the Tiger month and BaZi year.
pub const LI_CHUN_DEG: f64 = 315.0;

/// Year pillar of a civil date given the apparent solar longitude.
///
/// January and February dates before Li Chun belong to the previous year.
pub fn year_pillar(civil_year: i32, civil_month: u32, sun_longitude_deg: f64) -> Pillar {
    let lon = normalize_deg(sun_longitude_deg);
    let before_li_chun = civil_month <= 2 && (270.0..LI_CHUN_DEG).contains(&lon);
    let year = if before_li_chun { civil_year - 1 } else { civil_year };
    Pillar::from_cycle(i64::from(year) - 4)
}

/// Month pillar from the solar longitude and the year stem ("five tigers").
pub fn month_pillar(sun_longitude_deg: f64, year_stem: Stem) -> Pillar {
    let idx = (normalize_deg(sun_longitude_deg - LI_CHUN_DEG) / 30.0).floor() as usize % 12;
    let first_stem = [2, 4, 6, 8, 0][year_stem.index() % 5];
    Pillar::from_parts(
        ALL_STEMS[(first_stem + idx) % 10],
        ALL_BRANCHES[(2 + idx) % 12],
    )
}

/// Day pillar of a local civil date.
pub fn day_pillar(date: NaiveDate) -> Pillar {
    let jdn = julian_day_number(date.year(), date.month(), date.day());
    Pillar::from_cycle(jdn + 49)
}

/// Hour pillar from true solar time (minutes after midnight) and the day
/// stem ("five rats").
pub fn hour_pillar(true_solar_minutes: f64, day_stem: Stem) -> Pillar {
    let idx = ((true_solar_minutes + 60.0) / 120.0).floor().rem_euclid(12.0) as usize;
    let first_stem = [0, 2, 4, 6, 8][day_stem.index() % 5];
    Pillar::from_parts(ALL_STEMS[(first_stem + idx) % 10], ALL_BRANCHES[idx])
}

/// Whether the hour pillar could be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarPrecision {
    Full,
    HourUnknown,
}

/// Inputs for [`four_pillars`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaziInput {
    /// Civil date at the birth place.
    pub local_date: NaiveDate,
    pub utc: DateTime<Utc>,
    /// East-positive longitude of the birth place.
    pub longitude_deg: f64,
    /// Apparent geocentric solar longitude at `utc`.
    pub sun_longitude_deg: f64,
    pub hour_known: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Option<Pillar>,
    /// Stem of the day pillar; the self in BaZi readings.
    pub day_master: Stem,
    pub precision: PillarPrecision,
    /// "年 月 日 时" in Chinese characters.
    pub notation: String,
}

impl FourPillars {
    pub fn day_master_element(&self) -> WuXing {
        self.day_master.element()
    }

    /// Pillars present, year first.
    pub fn pillars(&self) -> impl Iterator<Item = &Pillar> {
        [Some(&self.year), Some(&self.month), Some(&self.day), self.hour.as_ref()]
            .into_iter()
            .flatten()
    }
}

pub fn four_pillars(input: &BaziInput) -> Result<FourPillars, ChartError> {
    if !input.sun_longitude_deg.is_finite() {
        return Err(ChartError::NonFinite("solar longitude"));
    }
    if !input.longitude_deg.is_finite() {
        return Err(ChartError::NonFinite("longitude"));
    }

    let date = input.local_date;
    let year = year_pillar(date.year(), date.month(), input.sun_longitude_deg);
    let month = month_pillar(input.sun_longitude_deg, year.stem);
    let day = day_pillar(date);
    let hour = input.hour_known.then(|| {
        let tst = true_solar_time_minutes(&input.utc, input.longitude_deg);
        hour_pillar(tst, day.stem)
    });

    let precision = if hour.is_some() {
        PillarPrecision::Full
    } else {
        PillarPrecision::HourUnknown
    };
    let mut notation = format!("{} {} {}", year.chinese(), month.chinese(), day.chinese());
    if let Some(h) = &hour {
        notation.push(' ');
        notation.push_str(&h.chinese());
    }
    tracing::debug!(%notation, ?precision, "four pillars");

    Ok(FourPillars {
        year,
        month,
        day,
        hour,
        day_master: day.stem,
        precision,
        notation,
    })
}

/// Share of each element across stem and branch slots, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementBalance {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
    pub dominant: WuXing,
    pub weakest: WuXing,
}

impl ElementBalance {
    pub fn get(&self, element: WuXing) -> f64 {
        match element {
            WuXing::Wood => self.wood,
            WuXing::Fire => self.fire,
            WuXing::Earth => self.earth,
            WuXing::Metal => self.metal,
            WuXing::Water => self.water,
        }
    }
}

/// Unweighted element balance. Ties resolve to the earlier element in
/// Wood, Fire, Earth, Metal, Water order.
pub fn element_balance(pillars: &FourPillars) -> ElementBalance {
    let mut counts = [0u32; 5];
    let mut slots = 0u32;
    for p in pillars.pillars() {
        counts[p.stem_element.index()] += 1;
        counts[p.branch_element.index()] += 1;
        slots += 2;
    }
    let pct = counts.map(|c| f64::from(c) * 100.0 / f64::from(slots));

    let mut dominant = 0;
    let mut weakest = 0;
    for i in 1..5 {
        if pct[i] > pct[dominant] {
            dominant = i;
        }
        if pct[i] < pct[weakest] {
            weakest = i;
        }
    }

    ElementBalance {
        wood: pct[0],
        fire: pct[1],
        earth: pct[2],
        metal: pct[3],
        water: pct[4],
        dominant: ALL_WU_XING[dominant],
        weakest: ALL_WU_XING[weakest],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_roundtrip() {
        for i in 0..60 {
            let p = Pillar::from_cycle(i);
            assert_eq!(i64::from(p.cycle_index), i);
            assert_eq!(Pillar::from_parts(p.stem, p.branch), p);
        }
    }

    #[test]
    fn jia_zi_is_zero() {
        let p = Pillar::from_cycle(0);
        assert_eq!((p.stem, p.branch), (Stem::Jia, Branch::Zi));
        assert_eq!(p.chinese(), "甲子");
        assert_eq!(p.animal, "Rat");
    }

    #[test]
    fn stem_tables() {
        assert_eq!(Stem::Geng.element(), WuXing::Metal);
        assert_eq!(Stem::Geng.polarity(), Polarity::Yang);
        assert_eq!(Stem::Gui.element(), WuXing::Water);
        assert_eq!(Stem::Gui.polarity(), Polarity::Yin);
        assert_eq!(Branch::Chen.element(), WuXing::Earth);
        assert_eq!(Branch::Si.element(), WuXing::Fire);
    }

    #[test]
    fn year_pillar_known_years() {
        let p = year_pillar(1980, 6, 93.0);
        assert_eq!((p.stem, p.branch), (Stem::Geng, Branch::Shen));
        let p = year_pillar(1984, 3, 350.0);
        assert_eq!((p.stem, p.branch), (Stem::Jia, Branch::Zi));
    }

    #[test]
    fn year_changes_at_li_chun() {
        assert_eq!(year_pillar(2024, 2, 314.9).branch, Branch::Mao);
        assert_eq!(year_pillar(2024, 2, 315.0).branch, Branch::Chen);
        // Late December sun is past 270° but still the same civil year.
        assert_eq!(year_pillar(2023, 12, 280.0).branch, Branch::Mao);
    }

    #[test]
    fn month_pillar_five_tigers() {
        let p = month_pillar(320.0, Stem::Jia);
        assert_eq!((p.stem, p.branch), (Stem::Bing, Branch::Yin));
        let p = month_pillar(280.0, Stem::Ji);
        assert_eq!(p.branch, Branch::Zi);
        // Month 11 of a Ji year: Bing + 10.
        assert_eq!(p.stem, Stem::Bing);
    }

    #[test]
    fn day_pillar_known_date() {
        let p = day_pillar(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!((p.stem, p.branch), (Stem::Jia, Branch::Zi));
        let next = day_pillar(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(next.cycle_index, 1);
    }

    #[test]
    fn hour_pillar_double_hours() {
        assert_eq!(hour_pillar(0.0, Stem::Jia).branch, Branch::Zi);
        assert_eq!(hour_pillar(23.5 * 60.0, Stem::Jia).branch, Branch::Zi);
        assert_eq!(hour_pillar(60.0, Stem::Jia).branch, Branch::Chou);
        assert_eq!(hour_pillar(12.0 * 60.0, Stem::Jia).branch, Branch::Wu);
        assert_eq!(hour_pillar(0.0, Stem::Jia).stem, Stem::Jia);
        assert_eq!(hour_pillar(0.0, Stem::Yi).stem, Stem::Bing);
    }

    #[test]
    fn unknown_hour_is_omitted() {
        let input = BaziInput {
            local_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            utc: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
            longitude_deg: 0.0,
            sun_longitude_deg: 280.5,
            hour_known: false,
        };
        let p = four_pillars(&input).unwrap();
        assert!(p.hour.is_none());
        assert_eq!(p.precision, PillarPrecision::HourUnknown);
        assert_eq!(p.notation.split(' ').count(), 3);
        let b = element_balance(&p);
        let total = b.wood + b.fire + b.earth + b.metal + b.water;
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_rejected() {
        let input = BaziInput {
            local_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            utc: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
            longitude_deg: 0.0,
            sun_longitude_deg: f64::NAN,
            hour_known: true,
        };
        assert!(four_pillars(&input).is_err());
    }
}
