//! Best-first nearest-neighbor search on the sphere.

use crate::error::{GeoIndexError, Result};
use crate::geo::index::GeoIndex;
use crate::geo::queue::{Candidate, NeighborQueue};
use crate::geo::sphere::{box_haversin, haversin_dist, km_to_haversin, wrap_lon};

const RAD: f64 = std::f64::consts::PI / 180.0;

/// The parameters of one nearest-neighbor query.
///
/// ```
/// use geo_nearest::geo::AroundQuery;
///
/// let query = AroundQuery::new(-119.7051, 34.4363)
///     .with_max_results(5)
///     .with_max_distance(50.);
/// assert_eq!(query.max_results, Some(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AroundQuery {
    /// Query longitude in degrees. Values outside `[-180, 180]` are wrapped.
    pub lon: f64,
    /// Query latitude in degrees, within `[-90, 90]`.
    pub lat: f64,
    /// Stop after this many results. `None` is unbounded.
    pub max_results: Option<usize>,
    /// Only return points within this many kilometers. `None` is unbounded.
    ///
    /// The limit is converted once to a haversine distance and compared in that space, so a
    /// point lying exactly on the limit may fall either side of it by rounding.
    pub max_distance: Option<f64>,
}

impl AroundQuery {
    /// An unbounded query around a longitude/latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            max_results: None,
            max_distance: None,
        }
    }

    /// Limit the number of results.
    #[must_use]
    pub fn with_max_results(self, max_results: usize) -> Self {
        Self {
            max_results: Some(max_results),
            ..self
        }
    }

    /// Limit the distance of results, in kilometers.
    #[must_use]
    pub fn with_max_distance(self, max_distance: f64) -> Self {
        Self {
            max_distance: Some(max_distance),
            ..self
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.lon.is_finite() || !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat)
        {
            return Err(GeoIndexError::InvalidCoordinate {
                lon: self.lon,
                lat: self.lat,
            });
        }
        if let Some(max_distance) = self.max_distance {
            if max_distance.is_nan() || max_distance < 0.0 {
                return Err(GeoIndexError::InvalidDistance(max_distance));
            }
        }
        Ok(())
    }
}

/// Search `index` for the points closest to the query, in ascending great-circle distance.
///
/// Returns point ids. Exact ties come back in unspecified order.
///
/// # Errors
///
/// If the query coordinate is not on the sphere, or its maximum distance is NaN or negative.
pub fn around<I: GeoIndex>(index: &I, query: &AroundQuery) -> Result<Vec<u32>> {
    around_filtered(index, query, |_| true)
}

/// Like [`around`], but only returns ids for which `filter` returns `true`.
///
/// The filter is called at most once per point, in ascending distance order, and only for
/// points within the distance limit. A panicking filter aborts the search.
pub fn around_filtered<I, F>(index: &I, query: &AroundQuery, filter: F) -> Result<Vec<u32>>
where
    I: GeoIndex,
    F: FnMut(u32) -> bool,
{
    let mut queue = NeighborQueue::new();
    around_with_queue(index, query, &mut queue, filter)
}

/// Like [`around_filtered`], but runs in a caller-provided queue so its allocation can be reused
/// across queries. The queue is cleared before the search starts.
pub fn around_with_queue<'a, I, F>(
    index: &'a I,
    query: &AroundQuery,
    queue: &mut NeighborQueue<I::Node<'a>>,
    mut filter: F,
) -> Result<Vec<u32>>
where
    I: GeoIndex,
    F: FnMut(u32) -> bool,
{
    query.validate()?;
    queue.clear();

    let max_results = query.max_results.unwrap_or(usize::MAX);
    if max_results == 0 || index.num_items() == 0 {
        return Ok(vec![]);
    }
    let Some(root) = index.root() else {
        return Ok(vec![]);
    };

    let lon = wrap_lon(query.lon);
    let lat = query.lat;
    let cos_lat = (lat * RAD).cos();
    let max_dist = query.max_distance.map_or(f64::INFINITY, km_to_haversin);

    let node_dist = |node: &I::Node<'a>| {
        let (min_lon, min_lat, max_lon, max_lat) = index.bbox(node);
        box_haversin(lon, lat, cos_lat, min_lon, min_lat, max_lon, max_lat)
    };

    queue.push(Candidate::Node {
        dist: node_dist(&root),
        node: root,
    });

    let mut results = vec![];
    let mut expanded = 0usize;
    let mut stop = "exhausted";

    while let Some(candidate) = queue.pop() {
        match candidate {
            Candidate::Point { id, dist } => {
                // everything still queued is at least this far away
                if dist > max_dist {
                    stop = "max_distance";
                    break;
                }
                if filter(id) {
                    results.push(id);
                    if results.len() >= max_results {
                        stop = "max_results";
                        break;
                    }
                }
            }
            Candidate::Node { node, .. } => {
                expanded += 1;
                for pos in index.node_points(&node) {
                    let (id, p_lon, p_lat) = index.point(pos);
                    let dist = haversin_dist(lon, lat, p_lon, p_lat, cos_lat);
                    if dist <= max_dist {
                        queue.push(Candidate::Point { id, dist });
                    }
                }
                for child in index.children(&node).into_iter().flatten() {
                    let dist = node_dist(&child);
                    if dist <= max_dist {
                        queue.push(Candidate::Node { node: child, dist });
                    }
                }
            }
        }
    }

    tracing::debug!(
        lon,
        lat,
        results = results.len(),
        expanded,
        pending = queue.len(),
        stop,
        "around search finished"
    );

    Ok(results)
}
