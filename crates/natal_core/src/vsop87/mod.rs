//! Truncated VSOP87D series for the Earth and the major planets.
//!
//! Heliocentric ecliptic coordinates referred to the mean ecliptic and
//! equinox of date. Amplitudes are in 1e-8 rad (L, B) and 1e-8 AU (R);
//! τ is Julian millennia of TT since J2000.0.
//! Source: Bretagnon & Francou (1988), as abridged in Meeus, Appendix III.

mod earth;
mod jupiter;
mod mars;
mod mercury;
mod neptune;
mod saturn;
mod uranus;
mod venus;

use natal_frames::{Spherical, spherical_to_cartesian};

use crate::Body;
use crate::series::{Term, evaluate};

/// L, B and R tables of one body, one table per power of τ.
#[derive(Debug)]
pub struct PlanetSeries {
    pub lon: &'static [&'static [Term]],
    pub lat: &'static [&'static [Term]],
    pub radius: &'static [&'static [Term]],
}

impl PlanetSeries {
    pub fn heliocentric(&self, tau: f64) -> Heliocentric {
        Heliocentric {
            lon_rad: (evaluate(self.lon, tau) * 1e-8).rem_euclid(std::f64::consts::TAU),
            lat_rad: evaluate(self.lat, tau) * 1e-8,
            radius_au: evaluate(self.radius, tau) * 1e-8,
        }
    }
}

/// Heliocentric ecliptic coordinates, ecliptic of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heliocentric {
    pub lon_rad: f64,
    pub lat_rad: f64,
    pub radius_au: f64,
}

impl Heliocentric {
    /// Rectangular ecliptic coordinates, AU.
    pub fn to_cartesian(&self) -> [f64; 3] {
        spherical_to_cartesian(&Spherical {
            lon_deg: self.lon_rad.to_degrees(),
            lat_deg: self.lat_rad.to_degrees(),
            radius: self.radius_au,
        })
    }
}

/// Evaluate the Earth series at `tau` Julian millennia of TT from J2000.0.
pub fn earth_heliocentric(tau: f64) -> Heliocentric {
    earth::SERIES.heliocentric(tau)
}

/// Series for a planet; `None` for the luminaries and Pluto.
pub fn planet_series(body: Body) -> Option<&'static PlanetSeries> {
    match body {
        Body::Mercury => Some(&mercury::SERIES),
        Body::Venus => Some(&venus::SERIES),
        Body::Mars => Some(&mars::SERIES),
        Body::Jupiter => Some(&jupiter::SERIES),
        Body::Saturn => Some(&saturn::SERIES),
        Body::Uranus => Some(&uranus::SERIES),
        Body::Neptune => Some(&neptune::SERIES),
        Body::Sun | Body::Moon | Body::Pluto => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tau_of(jde: f64) -> f64 {
        (jde - 2_451_545.0) / 365_250.0
    }

    #[test]
    fn earth_example_25b() {
        // 1992 Oct 13.0 TD: L = 19.907372°, B = −0.000179°, R = 0.99760775 AU
        let e = earth_heliocentric(tau_of(2_448_908.5));
        let (l, b) = (e.lon_rad.to_degrees(), e.lat_rad.to_degrees());
        assert!((l - 19.907372).abs() < 1e-5, "L = {l}");
        assert!((b + 0.000179).abs() < 1e-5, "B = {b}");
        assert!((e.radius_au - 0.99760775).abs() < 1e-7, "R = {}", e.radius_au);
    }

    #[test]
    fn earth_radius_stays_near_one_au() {
        for k in -10..10 {
            let e = earth_heliocentric(k as f64 * 0.01);
            assert!((0.98..1.02).contains(&e.radius_au));
        }
    }

    #[test]
    fn venus_example_32a() {
        // 1992 Dec 20.0 TD: L = 26.11428°, B = −2.62070°, R = 0.724603 AU
        let Some(series) = planet_series(Body::Venus) else {
            panic!("venus has a series");
        };
        let v = series.heliocentric(tau_of(2_448_976.5));
        let (l, b) = (v.lon_rad.to_degrees(), v.lat_rad.to_degrees());
        assert!((l - 26.11428).abs() < 1e-5, "L = {l}");
        assert!((b + 2.62070).abs() < 1e-5, "B = {b}");
        assert!((v.radius_au - 0.724603).abs() < 1e-6, "R = {}", v.radius_au);
    }

    #[test]
    fn planets_at_j2000() {
        // Heliocentric ecliptic of date at 2000 Jan 1.5 TT.
        let expected = [
            (Body::Mercury, 253.7829, -3.0228, 0.46647),
            (Body::Mars, 359.4475, -1.4198, 1.39121),
            (Body::Jupiter, 36.2947, -1.1746, 4.96539),
            (Body::Saturn, 45.7224, -2.3031, 9.18373),
            (Body::Uranus, 316.4186, -0.6848, 19.92397),
            (Body::Neptune, 303.9292, 0.2420, 30.12053),
        ];
        for (body, lon, lat, radius) in expected {
            let h = planet_series(body).map(|s| s.heliocentric(0.0));
            let Some(h) = h else {
                panic!("{body} has a series");
            };
            assert!((h.lon_rad.to_degrees() - lon).abs() < 1e-3, "{body} L");
            assert!((h.lat_rad.to_degrees() - lat).abs() < 1e-3, "{body} B");
            assert!((h.radius_au - radius).abs() < 1e-4, "{body} R");
        }
    }

    #[test]
    fn luminaries_and_pluto_have_no_series() {
        for body in [Body::Sun, Body::Moon, Body::Pluto] {
            assert!(planet_series(body).is_none());
        }
    }
}
