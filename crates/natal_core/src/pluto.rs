//! Heliocentric position of Pluto.
//!
//! Periodic series in the mean longitudes of Jupiter, Saturn and Pluto
//! (Chapront & Francou, as abridged in Meeus, ch. 37). Referred to the
//! mean ecliptic and equinox of J2000.0; valid 1885–2099 only.

use natal_frames::Spherical;

/// Multipliers of J, S and P, then the sine and cosine amplitudes of
/// longitude and latitude (1e-6 deg) and radius (1e-7 AU).
#[rustfmt::skip]
const TERMS: &[[f64; 9]] = &[
    [0.0, 0.0, 1.0, -19799805.0, 19850055.0, -5452852.0, -14974862.0, 66865439.0, 68951812.0],
    [0.0, 0.0, 2.0, 897144.0, -4954829.0, 3527812.0, 1672790.0, -11827535.0, -332538.0],
    [0.0, 0.0, 3.0, 611149.0, 1211027.0, -1050748.0, 327647.0, 1593179.0, -1438890.0],
    [0.0, 0.0, 4.0, -341243.0, -189585.0, 178690.0, -292153.0, -18444.0, 483220.0],
    [0.0, 0.0, 5.0, 129287.0, -34992.0, 18650.0, 100340.0, -65977.0, -85431.0],
    [0.0, 0.0, 6.0, -38164.0, 30893.0, -30697.0, -25823.0, 31174.0, -6032.0],
    [0.0, 1.0, -1.0, 20442.0, -9987.0, 4878.0, 11248.0, -5794.0, 22161.0],
    [0.0, 1.0, 0.0, -4063.0, -5071.0, 226.0, -64.0, 4601.0, 4032.0],
    [0.0, 1.0, 1.0, -6016.0, -3336.0, 2030.0, -836.0, -1729.0, 234.0],
    [0.0, 1.0, 2.0, -3956.0, 3039.0, 69.0, -604.0, -415.0, 702.0],
    [0.0, 1.0, 3.0, -667.0, 3572.0, -247.0, -567.0, 239.0, 723.0],
    [0.0, 2.0, -2.0, 1276.0, 501.0, -57.0, 1.0, 67.0, -67.0],
    [0.0, 2.0, -1.0, 1152.0, -917.0, -122.0, 175.0, 1034.0, -451.0],
    [0.0, 2.0, 0.0, 630.0, -1277.0, -49.0, -164.0, -129.0, 504.0],
    [1.0, -1.0, 0.0, 2571.0, -459.0, -197.0, 199.0, 480.0, -231.0],
    [1.0, -1.0, 1.0, 899.0, -1449.0, -25.0, 217.0, 2.0, -441.0],
    [1.0, 0.0, -3.0, -1016.0, 1043.0, 589.0, -248.0, -3359.0, 265.0],
    [1.0, 0.0, -2.0, -2343.0, -1012.0, -269.0, 711.0, 7856.0, -7832.0],
    [1.0, 0.0, -1.0, 7042.0, 788.0, 185.0, 193.0, 36.0, 45763.0],
    [1.0, 0.0, 0.0, 1199.0, -338.0, 315.0, 807.0, 8663.0, 8547.0],
    [1.0, 0.0, 1.0, 418.0, -67.0, -130.0, -43.0, -809.0, -769.0],
    [1.0, 0.0, 2.0, 120.0, -274.0, 5.0, 3.0, 263.0, -144.0],
    [1.0, 0.0, 3.0, -60.0, -159.0, 2.0, 17.0, -126.0, 32.0],
    [1.0, 0.0, 4.0, -82.0, -29.0, 2.0, 5.0, -35.0, -16.0],
    [1.0, 1.0, -3.0, -36.0, -29.0, 2.0, 3.0, -19.0, -4.0],
    [1.0, 1.0, -2.0, -40.0, 7.0, 3.0, 1.0, -15.0, 8.0],
    [1.0, 1.0, -1.0, -14.0, 22.0, 2.0, -1.0, -4.0, 12.0],
    [1.0, 1.0, 0.0, 4.0, 13.0, 1.0, -1.0, 5.0, 6.0],
    [1.0, 1.0, 1.0, 5.0, 2.0, 0.0, -1.0, 3.0, 1.0],
    [1.0, 1.0, 3.0, -1.0, 0.0, 0.0, 0.0, 6.0, -2.0],
    [2.0, 0.0, -6.0, 2.0, 0.0, 0.0, -2.0, 2.0, 2.0],
    [2.0, 0.0, -5.0, -4.0, 5.0, 2.0, 2.0, -2.0, -2.0],
    [2.0, 0.0, -4.0, 4.0, -7.0, -7.0, 0.0, 14.0, 13.0],
    [2.0, 0.0, -3.0, 14.0, 24.0, 10.0, -8.0, -63.0, 13.0],
    [2.0, 0.0, -2.0, -49.0, -34.0, -3.0, 20.0, 136.0, -236.0],
    [2.0, 0.0, -1.0, 163.0, -48.0, 6.0, 5.0, 273.0, 1065.0],
    [2.0, 0.0, 0.0, 9.0, -24.0, 14.0, 17.0, 251.0, 149.0],
    [2.0, 0.0, 1.0, -4.0, 1.0, -2.0, 0.0, -25.0, -9.0],
    [2.0, 0.0, 2.0, -3.0, 1.0, 0.0, 0.0, 9.0, -2.0],
    [2.0, 0.0, 3.0, 1.0, 3.0, 0.0, 0.0, -8.0, 7.0],
    [3.0, 0.0, -2.0, -3.0, -1.0, 0.0, 1.0, 2.0, -10.0],
    [3.0, 0.0, -1.0, 5.0, -3.0, 0.0, 0.0, 19.0, 35.0],
    [3.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 10.0, 3.0],
];

/// Pluto at `t` Julian centuries of TT from J2000.0, J2000 ecliptic.
pub fn pluto_heliocentric(t: f64) -> Spherical {
    let jupiter = 34.35 + 3034.9057 * t;
    let saturn = 50.08 + 1222.1138 * t;
    let pluto = 238.96 + 144.96 * t;

    let (mut lon, mut lat, mut radius) = (0.0, 0.0, 0.0);
    for [i, j, k, lon_a, lon_b, lat_a, lat_b, rad_a, rad_b] in TERMS {
        let (sin_a, cos_a) = (i * jupiter + j * saturn + k * pluto).to_radians().sin_cos();
        lon += lon_a * sin_a + lon_b * cos_a;
        lat += lat_a * sin_a + lat_b * cos_a;
        radius += rad_a * sin_a + rad_b * cos_a;
    }
    Spherical {
        lon_deg: 238.958_116 + 144.96 * t + lon * 1e-6,
        lat_deg: -3.908_239 + lat * 1e-6,
        radius: 40.724_134_6 + radius * 1e-7,
    }
}
