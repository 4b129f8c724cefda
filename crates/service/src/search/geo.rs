//! Great-circle distance on a spherical Earth.

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;
pub const MILES_PER_KM: f64 = 0.621371;

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Distance in miles between two points given in decimal degrees, using the
/// spherical law of cosines.
pub fn distance_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let delta_lambda = (lng2 - lng1).to_radians();
    let cos_angle = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();
    // rounding can push the cosine just outside acos' domain
    EARTH_RADIUS_MILES * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Center point plus a radius in kilometres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl GeoFilter {
    pub fn radius_miles(&self) -> f64 {
        km_to_miles(self.radius_km)
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        distance_miles(self.latitude, self.longitude, latitude, longitude) <= self.radius_miles()
    }

    /// Smallest cosine of the central angle still inside the radius.
    ///
    /// `R * acos(c) <= r` holds exactly when `c >= cos(r / R)` for radii up
    /// to half the circumference, so a store can test the cosine directly.
    /// Past that every point matches and the bound drops below -1.
    pub fn min_cos_angle(&self) -> f64 {
        let angle = self.radius_miles() / EARTH_RADIUS_MILES;
        if angle >= std::f64::consts::PI {
            -2.0
        } else {
            angle.cos()
        }
    }
}
