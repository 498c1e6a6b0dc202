//! Neptune, truncated VSOP87D.

use std::f64::consts::PI;

use crate::series::Term;
use super::PlanetSeries;

pub(super) const SERIES: PlanetSeries = PlanetSeries {
    lon: &[L0, L1, L2, L3, L4],
    lat: &[B0, B1, B2, B3, B4],
    radius: &[R0, R1, R2, R3],
};

#[rustfmt::skip]
const L0: &[Term] = &[
    [531188633.0, 0.0, 0.0],
    [1798476.0, 2.9010127, 38.1330356],
    [1019728.0, 0.4858092, 1.4844727],
    [124532.0, 4.830081, 36.648563],
    [42064.0, 5.41055, 2.96895],
    [37715.0, 6.09222, 35.16409],
    [33785.0, 1.24489, 76.26607],
    [16483.0, 0.00008, 491.55793],
    [9199.0, 4.9375, 39.6175],
    [8994.0, 0.2746, 175.1661],
    [4216.0, 1.9871, 73.2971],
    [3365.0, 1.0359, 33.6796],
    [2285.0, 4.2061, 4.4534],
    [1434.0, 2.7834, 74.7816],
    [900.0, 2.076, 109.946],
    [745.0, 3.190, 71.813],
    [506.0, 5.748, 114.399],
    [400.0, 0.350, 1021.249],
    [345.0, 3.462, 41.102],
    [340.0, 3.304, 77.751],
    [323.0, 2.248, 32.165],
    [306.0, 0.497, 0.521],
    [287.0, 4.505, 0.048],
    [282.0, 2.246, 146.594],
    [267.0, 4.889, 0.963],
    [252.0, 5.782, 388.465],
    [245.0, 1.247, 9.561],
    [233.0, 2.505, 137.033],
    [227.0, 1.797, 453.425],
    [170.0, 3.324, 108.461],
    [151.0, 2.192, 33.940],
    [150.0, 2.997, 5.938],
    [148.0, 0.859, 111.430],
    [119.0, 3.677, 2.448],
    [109.0, 2.416, 183.243],
    [103.0, 0.041, 0.261],
    [103.0, 4.404, 70.328],
    [102.0, 5.705, 0.112],
];

#[rustfmt::skip]
const L1: &[Term] = &[
    [3837687717.0, 0.0, 0.0],
    [16604.0, 4.86319, 1.48447],
    [15807.0, 2.27923, 38.13304],
    [3335.0, 3.6820, 76.2661],
    [1306.0, 3.6732, 2.9689],
    [605.0, 1.505, 35.164],
    [179.0, 3.453, 39.618],
    [107.0, 2.451, 4.453],
    [106.0, 2.755, 33.680],
    [73.0, 5.49, 36.65],
    [57.0, 1.86, 114.40],
    [57.0, 5.22, 0.52],
    [35.0, 4.52, 74.78],
    [32.0, 5.90, 77.75],
    [30.0, 3.67, 388.47],
    [29.0, 5.17, 9.56],
    [29.0, 5.17, 2.45],
    [26.0, 5.25, 168.05],
];

#[rustfmt::skip]
const L2: &[Term] = &[
    [53893.0, 0.0, 0.0],
    [296.0, 1.855, 1.484],
    [281.0, 1.191, 38.133],
    [270.0, 5.721, 76.266],
    [23.0, 1.21, 2.97],
    [9.0, 4.43, 35.16],
    [7.0, 0.54, 2.45],
];

#[rustfmt::skip]
const L3: &[Term] = &[
    [31.0, 0.0, 0.0],
    [15.0, 1.35, 76.27],
    [12.0, 6.04, 1.48],
    [12.0, 6.11, 38.13],
];

const L4: &[Term] = &[[114.0, PI, 0.0]];

#[rustfmt::skip]
const B0: &[Term] = &[
    [3088623.0, 1.4410437, 38.1330356],
    [27780.0, 5.91272, 76.26607],
    [27624.0, 0.0, 0.0],
    [15448.0, 3.50877, 39.61751],
    [15355.0, 2.52124, 36.64856],
    [2000.0, 1.5100, 74.7816],
    [1968.0, 4.3778, 1.4845],
    [1015.0, 3.2156, 35.1641],
    [606.0, 2.802, 73.297],
    [595.0, 2.129, 41.102],
    [589.0, 3.187, 2.969],
    [402.0, 4.169, 114.399],
    [280.0, 1.682, 77.751],
    [262.0, 3.767, 213.299],
    [254.0, 3.271, 453.425],
    [206.0, 4.257, 529.691],
    [140.0, 3.530, 137.033],
];

#[rustfmt::skip]
const B1: &[Term] = &[
    [227279.0, 3.807931, 38.133036],
    [1803.0, 1.9758, 76.2661],
    [1433.0, PI, 0.0],
    [1386.0, 4.8256, 36.6486],
    [1073.0, 6.0805, 39.6175],
    [148.0, 3.858, 74.782],
    [136.0, 0.478, 1.484],
    [70.0, 6.19, 35.16],
    [52.0, 5.05, 73.30],
    [43.0, 0.31, 114.40],
    [37.0, 4.89, 41.10],
    [37.0, 5.76, 2.97],
    [26.0, 5.22, 213.30],
];

#[rustfmt::skip]
const B2: &[Term] = &[
    [9691.0, 5.5712, 38.1330],
    [79.0, 3.63, 76.27],
    [72.0, 0.45, 36.65],
    [59.0, PI, 0.0],
    [30.0, 1.61, 39.62],
    [6.0, 5.61, 74.78],
];

#[rustfmt::skip]
const B3: &[Term] = &[
    [273.0, 1.017, 38.133],
    [2.0, 0.0, 0.0],
    [2.0, 2.37, 36.65],
    [2.0, 5.33, 76.27],
];

const B4: &[Term] = &[[6.0, 2.67, 38.13]];

#[rustfmt::skip]
const R0: &[Term] = &[
    [3007013206.0, 0.0, 0.0],
    [27062259.0, 1.32999459, 38.13303564],
    [1691764.0, 3.2518614, 36.6485629],
    [807831.0, 5.185928, 1.484473],
    [537761.0, 4.521139, 35.164090],
    [495726.0, 1.571057, 491.557929],
    [274572.0, 1.845523, 175.166060],
    [135134.0, 3.372206, 39.617508],
    [121802.0, 5.797544, 76.266071],
    [100895.0, 0.377027, 73.297126],
    [69792.0, 3.79617, 2.96895],
    [46688.0, 5.74938, 33.67962],
    [24594.0, 0.50802, 109.94569],
    [16939.0, 1.59422, 71.81265],
    [14230.0, 1.07786, 74.78160],
    [12012.0, 1.92062, 1021.24889],
    [8395.0, 0.6782, 146.5943],
    [7572.0, 1.0715, 388.4652],
    [5721.0, 2.5906, 4.4534],
    [4840.0, 1.9069, 41.1020],
    [4483.0, 2.9057, 529.6910],
    [4421.0, 1.7499, 108.4612],
    [4354.0, 0.6799, 32.1645],
    [4270.0, 3.4134, 453.4249],
    [3381.0, 0.8481, 183.2428],
    [2881.0, 1.9860, 137.0330],
    [2879.0, 3.6742, 350.3321],
    [2636.0, 3.0976, 213.2991],
    [2530.0, 5.7984, 490.0735],
    [2523.0, 0.4863, 493.0424],
    [2306.0, 2.8096, 70.3282],
    [2087.0, 0.6186, 33.9402],
];

#[rustfmt::skip]
const R1: &[Term] = &[
    [236339.0, 0.704980, 38.133036],
    [13220.0, 3.32015, 1.48447],
    [8622.0, 6.2163, 35.1641],
    [2702.0, 1.8814, 39.6175],
    [2155.0, 2.0943, 2.9689],
    [2153.0, 5.1687, 76.2661],
    [1603.0, 0.0, 0.0],
    [1464.0, 1.1842, 33.6796],
    [1136.0, 3.9189, 36.6486],
    [898.0, 5.241, 388.465],
    [790.0, 0.533, 168.053],
    [760.0, 0.021, 182.280],
    [607.0, 1.077, 1021.249],
    [572.0, 3.401, 484.444],
    [561.0, 2.887, 498.671],
];

#[rustfmt::skip]
const R2: &[Term] = &[
    [4247.0, 5.8991, 38.1330],
    [218.0, 0.346, 1.484],
    [163.0, 2.239, 168.053],
    [156.0, 4.594, 182.280],
    [127.0, 2.848, 35.164],
];

const R3: &[Term] = &[[166.0, 4.552, 38.133]];
