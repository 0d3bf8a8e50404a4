use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geo::distance;
use crate::kdtree::{KDTreeBuilder, OwnedKDTree};

/// Uniformly random longitude/latitude pairs.
pub(crate) fn random_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(-180.0..=180.0), rng.gen_range(-90.0..=90.0)))
        .collect()
}

/// Random points crowded around the antimeridian and both poles.
pub(crate) fn awkward_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| match i % 3 {
            0 => {
                let lon = if rng.gen_bool(0.5) {
                    rng.gen_range(175.0..=180.0)
                } else {
                    rng.gen_range(-180.0..=-175.0)
                };
                (lon, rng.gen_range(-60.0..=60.0))
            }
            1 => (rng.gen_range(-180.0..=180.0), rng.gen_range(80.0..=90.0)),
            _ => (rng.gen_range(-180.0..=180.0), rng.gen_range(-90.0..=-80.0)),
        })
        .collect()
}

pub(crate) fn make_tree(points: &[(f64, f64)], node_size: u16) -> OwnedKDTree<f64> {
    let mut builder = KDTreeBuilder::new_with_node_size(points.len() as u32, node_size);
    for (lon, lat) in points {
        builder.add(*lon, *lat).unwrap();
    }
    builder.finish()
}

/// Every point id with its distance to the query, sorted by distance.
pub(crate) fn brute_force(points: &[(f64, f64)], lon: f64, lat: f64) -> Vec<(u32, f64)> {
    let mut all: Vec<(u32, f64)> = points
        .iter()
        .enumerate()
        .map(|(id, (p_lon, p_lat))| (id as u32, distance(lon, lat, *p_lon, *p_lat)))
        .collect();
    all.sort_by(|a, b| a.1.total_cmp(&b.1));
    all
}

/// Distances to the query of each id in `ids`, in order.
pub(crate) fn distances_of(points: &[(f64, f64)], ids: &[u32], lon: f64, lat: f64) -> Vec<f64> {
    ids.iter()
        .map(|id| {
            let (p_lon, p_lat) = points[*id as usize];
            distance(lon, lat, p_lon, p_lat)
        })
        .collect()
}
