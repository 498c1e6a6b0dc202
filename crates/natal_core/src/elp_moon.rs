//! Geocentric position of the Moon from the ELP-2000/82 main problem.
//!
//! Periodic terms abridged to 60 longitude/distance and 60 latitude terms,
//! after Meeus, "Astronomical Algorithms", Chapter 47. Accuracy is about
//! 10″ in longitude and 4″ in latitude near the present epoch.

/// Multipliers of D, M, M′, F followed by Σl (1e-6 deg) and Σr (1e-3 km).
#[rustfmt::skip]
const LON_DIST: [([i8; 4], i32, i32); 60] = [
    ([0, 0, 1, 0], 6288774, -20905355),
    ([2, 0, -1, 0], 1274027, -3699111),
    ([2, 0, 0, 0], 658314, -2955968),
    ([0, 0, 2, 0], 213618, -569925),
    ([0, 1, 0, 0], -185116, 48888),
    ([0, 0, 0, 2], -114332, -3149),
    ([2, 0, -2, 0], 58793, 246158),
    ([2, -1, -1, 0], 57066, -152138),
    ([2, 0, 1, 0], 53322, -170733),
    ([2, -1, 0, 0], 45758, -204586),
    ([0, 1, -1, 0], -40923, -129620),
    ([1, 0, 0, 0], -34720, 108743),
    ([0, 1, 1, 0], -30383, 104755),
    ([2, 0, 0, -2], 15327, 10321),
    ([0, 0, 1, 2], -12528, 0),
    ([0, 0, 1, -2], 10980, 79661),
    ([4, 0, -1, 0], 10675, -34782),
    ([0, 0, 3, 0], 10034, -23210),
    ([4, 0, -2, 0], 8548, -21636),
    ([2, 1, -1, 0], -7888, 24208),
    ([2, 1, 0, 0], -6766, 30824),
    ([1, 0, -1, 0], -5163, -8379),
    ([1, 1, 0, 0], 4987, -16675),
    ([2, -1, 1, 0], 4036, -12831),
    ([2, 0, 2, 0], 3994, -10445),
    ([4, 0, 0, 0], 3861, -11650),
    ([2, 0, -3, 0], 3665, 14403),
    ([0, 1, -2, 0], -2689, -7003),
    ([2, 0, -1, 2], -2602, 0),
    ([2, -1, -2, 0], 2390, 10056),
    ([1, 0, 1, 0], -2348, 6322),
    ([2, -2, 0, 0], 2236, -9884),
    ([0, 1, 2, 0], -2120, 5751),
    ([0, 2, 0, 0], -2069, 0),
    ([2, -2, -1, 0], 2048, -4950),
    ([2, 0, 1, -2], -1773, 4130),
    ([2, 0, 0, 2], -1595, 0),
    ([4, -1, -1, 0], 1215, -3958),
    ([0, 0, 2, 2], -1110, 0),
    ([3, 0, -1, 0], -892, 3258),
    ([2, 1, 1, 0], -810, 2616),
    ([4, -1, -2, 0], 759, -1897),
    ([0, 2, -1, 0], -713, -2117),
    ([2, 2, -1, 0], -700, 2354),
    ([2, 1, -2, 0], 691, 0),
    ([2, -1, 0, -2], 596, 0),
    ([4, 0, 1, 0], 549, -1423),
    ([0, 0, 4, 0], 537, -1117),
    ([4, -1, 0, 0], 520, -1571),
    ([1, 0, -2, 0], -487, -1739),
    ([2, 1, 0, -2], -399, 0),
    ([0, 0, 2, -2], -381, -4421),
    ([1, 1, 1, 0], 351, 0),
    ([3, 0, -2, 0], -340, 0),
    ([4, 0, -3, 0], 330, 0),
    ([2, -1, 2, 0], 327, 0),
    ([0, 2, 1, 0], -323, 1165),
    ([1, 1, -1, 0], 299, 0),
    ([2, 0, 3, 0], 294, 0),
    ([2, 0, -1, -2], 0, 8752),
];

/// Multipliers of D, M, M′, F followed by Σb (1e-6 deg).
#[rustfmt::skip]
const LAT: [([i8; 4], i32); 60] = [
    ([0, 0, 0, 1], 5128122),
    ([0, 0, 1, 1], 280602),
    ([0, 0, 1, -1], 277693),
    ([2, 0, 0, -1], 173237),
    ([2, 0, -1, 1], 55413),
    ([2, 0, -1, -1], 46271),
    ([2, 0, 0, 1], 32573),
    ([0, 0, 2, 1], 17198),
    ([2, 0, 1, -1], 9266),
    ([0, 0, 2, -1], 8822),
    ([2, -1, 0, -1], 8216),
    ([2, 0, -2, -1], 4324),
    ([2, 0, 1, 1], 4200),
    ([2, 1, 0, -1], -3359),
    ([2, -1, -1, 1], 2463),
    ([2, -1, 0, 1], 2211),
    ([2, -1, -1, -1], 2065),
    ([0, 1, -1, -1], -1870),
    ([4, 0, -1, -1], 1828),
    ([0, 1, 0, 1], -1794),
    ([0, 0, 0, 3], -1749),
    ([0, 1, -1, 1], -1565),
    ([1, 0, 0, 1], -1491),
    ([0, 1, 1, 1], -1475),
    ([0, 1, 1, -1], -1410),
    ([0, 1, 0, -1], -1344),
    ([1, 0, 0, -1], -1335),
    ([0, 0, 3, 1], 1107),
    ([4, 0, 0, -1], 1021),
    ([4, 0, -1, 1], 833),
    ([0, 0, 1, -3], 777),
    ([4, 0, -2, 1], 671),
    ([2, 0, 0, -3], 607),
    ([2, 0, 2, -1], 596),
    ([2, -1, 1, -1], 491),
    ([2, 0, -2, 1], -451),
    ([0, 0, 3, -1], 439),
    ([2, 0, 2, 1], 422),
    ([2, 0, -3, -1], 421),
    ([2, 1, -1, 1], -366),
    ([2, 1, 0, 1], -351),
    ([4, 0, 0, 1], 331),
    ([2, -1, 1, 1], 315),
    ([2, -2, 0, -1], 302),
    ([0, 0, 1, 3], -283),
    ([2, 1, 1, -1], -229),
    ([1, 1, 0, -1], 223),
    ([1, 1, 0, 1], 223),
    ([0, 1, -2, -1], -220),
    ([2, 1, -1, -1], -220),
    ([1, 0, 1, 1], -185),
    ([2, -1, -2, -1], 181),
    ([0, 1, 2, 1], -177),
    ([4, 0, -2, -1], 176),
    ([4, -1, -1, -1], 166),
    ([1, 0, 1, -1], -164),
    ([4, 0, 1, -1], 132),
    ([1, 0, -1, -1], -119),
    ([4, -1, 0, -1], 115),
    ([2, -2, 0, 1], 107),
];

/// Mean lunar distance used as the constant term, km.
const MEAN_DISTANCE_KM: f64 = 385_000.56;

/// Geometric geocentric Moon, mean ecliptic and equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonGeocentric {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance_km: f64,
}

/// Fundamental lunar arguments in degrees: L′, D, M, M′, F.
pub fn lunar_arguments(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    [
        218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
            - t4 / 65_194_000.0,
        297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
            - t4 / 113_065_000.0,
        357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
        134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
            - t4 / 14_712_000.0,
        93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
            + t4 / 863_310_000.0,
    ]
}

/// Argument and eccentricity factor for one multiplier row.
fn term_argument(mult: &[i8; 4], dmmf: &[f64; 4], e: f64) -> (f64, f64) {
    let arg: f64 = mult
        .iter()
        .zip(dmmf)
        .map(|(&k, a)| k as f64 * a)
        .sum();
    let factor = match mult[1].unsigned_abs() {
        0 => 1.0,
        1 => e,
        _ => e * e,
    };
    (arg, factor)
}

/// Moon position at `t` Julian centuries of TT since J2000.0.
pub fn moon_geocentric(t: f64) -> MoonGeocentric {
    let [lp, d, m, mp, f] = lunar_arguments(t).map(|deg| deg.rem_euclid(360.0).to_radians());
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;
    let dmmf = [d, m, mp, f];

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for (mult, l, r) in &LON_DIST {
        let (arg, factor) = term_argument(mult, &dmmf, e);
        sum_l += *l as f64 * factor * arg.sin();
        sum_r += *r as f64 * factor * arg.cos();
    }
    let mut sum_b = 0.0;
    for (mult, b) in &LAT {
        let (arg, factor) = term_argument(mult, &dmmf, e);
        sum_b += *b as f64 * factor * arg.sin();
    }

    // Venus, Jupiter and Earth-flattening terms.
    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    MoonGeocentric {
        lon_deg: (lp.to_degrees() + sum_l / 1e6).rem_euclid(360.0),
        lat_deg: sum_b / 1e6,
        distance_km: MEAN_DISTANCE_KM + sum_r / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_example_47a() {
        // 1992 April 12, 0h TD
        let t = (2_448_724.5 - 2_451_545.0) / 36_525.0;
        let moon = moon_geocentric(t);
        assert!((moon.lon_deg - 133.162655).abs() < 1e-5, "λ = {}", moon.lon_deg);
        assert!((moon.lat_deg + 3.229126).abs() < 1e-5, "β = {}", moon.lat_deg);
        assert!((moon.distance_km - 368_409.7).abs() < 0.1, "Δ = {}", moon.distance_km);
    }

    #[test]
    fn distance_within_perigee_apogee() {
        for k in 0..200 {
            let t = -0.5 + k as f64 * 0.005;
            let moon = moon_geocentric(t);
            assert!((355_000.0..407_500.0).contains(&moon.distance_km));
            assert!(moon.lat_deg.abs() < 5.35);
        }
    }
}
