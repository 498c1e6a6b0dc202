//! Coordinate frames for geocentric positions.
//!
//! - ecliptic ↔ equatorial ↔ horizontal rotations
//! - Cartesian ↔ spherical conversion
//! - IAU 2000B nutation and IAU 2006 general precession in longitude

pub mod nutation;
pub mod precession;
pub mod spherical;
pub mod transform;

pub use nutation::{Nutation, nutation};
pub use precession::{general_precession_arcsec, general_precession_deg};
pub use spherical::{Spherical, cartesian_to_spherical, spherical_to_cartesian};
pub use transform::{
    Ecliptic, Equatorial, Horizontal, ecliptic_to_equatorial, equatorial_to_ecliptic,
    equatorial_to_horizontal,
};
