//! Great-circle distances on a spherical Earth.
//!
//! The search compares *haversine distances*: `hav(θ) = sin²(θ / 2)` of the central angle `θ`
//! between two points. This is monotone in the great-circle distance, so ordering by it is the
//! same as ordering by kilometers, and it avoids an `asin` and a `sqrt` per candidate.
//! [`haversin_to_km`] converts at the boundary.

use std::f64::consts::PI;

use float_next_after::NextAfter;

/// Radius of the sphere used for all distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const RAD: f64 = PI / 180.0;

/// Relative slack taken off every box lower bound.
const LOWER_BOUND_SLACK: f64 = 1.0 - 1e-9;

/// Great-circle distance in kilometers between two longitude/latitude points, in degrees.
///
/// ```
/// use geo_nearest::geo::distance;
///
/// let d = distance(30.5, 50.5, -119.7, 34.4);
/// assert_eq!((d * 1e4).round() / 1e4, 10131.7396);
/// ```
pub fn distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lon1 = wrap_lon(lon1);
    let lon2 = wrap_lon(lon2);
    haversin_to_km(haversin_dist(lon1, lat1, lon2, lat2, (lat1 * RAD).cos()))
}

/// Minimum great-circle distance in kilometers from a point to any point inside a
/// longitude/latitude box. Zero if the point is inside the box.
pub fn box_distance(
    lon: f64,
    lat: f64,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
) -> f64 {
    let lon = wrap_lon(lon);
    haversin_to_km(box_haversin(
        lon,
        lat,
        (lat * RAD).cos(),
        min_lon,
        min_lat,
        max_lon,
        max_lat,
    ))
}

/// Wrap a longitude into `[-180, 180]`. Values already in range are returned unchanged.
#[inline]
pub(crate) fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[inline]
pub(crate) fn haversin(theta: f64) -> f64 {
    let s = (theta / 2.0).sin();
    s * s
}

/// Haversine distance given the haversine of the longitude difference and `cos(lat1)`.
#[inline]
fn haversin_dist_partial(haversin_dlon: f64, cos_lat1: f64, lat1: f64, lat2: f64) -> f64 {
    cos_lat1 * (lat2 * RAD).cos() * haversin_dlon + haversin((lat1 - lat2) * RAD)
}

/// Haversine distance between two points, with `cos(lat1)` precomputed by the caller.
#[inline]
pub(crate) fn haversin_dist(lon1: f64, lat1: f64, lon2: f64, lat2: f64, cos_lat1: f64) -> f64 {
    haversin_dist_partial(haversin((lon1 - lon2) * RAD), cos_lat1, lat1, lat2)
}

/// Convert a haversine distance to kilometers.
///
/// Rounding can push the haversine of (nearly) antipodal points slightly above 1, where `asin`
/// is undefined, hence the clamp.
#[inline]
pub(crate) fn haversin_to_km(h: f64) -> f64 {
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Convert kilometers to a haversine distance. Distances of half the circumference or more
/// cover the whole sphere and map to infinity.
#[inline]
pub(crate) fn km_to_haversin(km: f64) -> f64 {
    let theta = km / EARTH_RADIUS_KM;
    if theta >= PI {
        f64::INFINITY
    } else {
        haversin(theta)
    }
}

/// Admissible lower bound, as a haversine distance, from a point to every point in a box.
///
/// `lon` must already be wrapped into `[-180, 180]` and `cos_lat` must be `cos(lat)`.
pub(crate) fn box_haversin(
    lon: f64,
    lat: f64,
    cos_lat: f64,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
) -> f64 {
    let dlon = lon_offset(lon, min_lon, max_lon);
    if dlon == 0.0 {
        // the box spans the query meridian; latitude difference alone bounds the distance
        let nearest_lat = lat.max(min_lat).min(max_lat);
        return lower_bound(haversin((lat - nearest_lat) * RAD));
    }

    // West or east of the box: the closest point lies on the nearer edge meridian. Along a
    // meridian the distance is extremal at the vertex latitude.
    let haversin_dlon = haversin(dlon * RAD);
    let vertex = vertex_lat(lat, haversin_dlon);
    let h = if vertex > min_lat && vertex < max_lat {
        haversin_dist_partial(haversin_dlon, cos_lat, lat, vertex)
    } else {
        haversin_dist_partial(haversin_dlon, cos_lat, lat, min_lat).min(haversin_dist_partial(
            haversin_dlon,
            cos_lat,
            lat,
            max_lat,
        ))
    };
    lower_bound(h)
}

/// Shortest angular distance in degrees from `lon` to the interval `[min_lon, max_lon]`,
/// treating longitude as circular.
#[inline]
fn lon_offset(lon: f64, min_lon: f64, max_lon: f64) -> f64 {
    [-360.0, 0.0, 360.0]
        .into_iter()
        .map(|shift| axis_dist(lon, min_lon + shift, max_lon + shift))
        .fold(f64::INFINITY, f64::min)
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist(k: f64, min: f64, max: f64) -> f64 {
    if k < min {
        min - k
    } else if k <= max {
        0.0
    } else {
        k - max
    }
}

/// Latitude of the point on a meridian `dlon` away that is closest to a point at `lat`.
///
/// When the meridian is 90° or more away the perpendicular foot lies past the pole, so the
/// pole on the query's side is returned.
#[inline]
fn vertex_lat(lat: f64, haversin_dlon: f64) -> f64 {
    let cos_dlon = 1.0 - 2.0 * haversin_dlon;
    if cos_dlon <= 0.0 {
        return if lat > 0.0 { 90.0 } else { -90.0 };
    }
    ((lat * RAD).tan() / cos_dlon).atan() / RAD
}

/// Shrink a bound so that rounding never lifts it above the exact distance of a contained point.
#[inline]
fn lower_bound(h: f64) -> f64 {
    if h > 0.0 {
        (h * LOWER_BOUND_SLACK).next_after(f64::NEG_INFINITY)
    } else {
        0.0
    }
}
