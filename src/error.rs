use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum GeoIndexError {
    /// A longitude/latitude pair that cannot be located on the sphere.
    ///
    /// Longitude and latitude must be finite and latitude must lie within `[-90, 90]`.
    #[error("Invalid coordinate: lon {lon}, lat {lat}")]
    InvalidCoordinate { lon: f64, lat: f64 },

    /// A maximum search distance that is NaN or negative.
    #[error("Invalid maximum distance: {0} km")]
    InvalidDistance(f64),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, GeoIndexError>;
