use crate::indices::Indices;
use crate::kdtree::{KDTreeBuilder, KDTreeIndex, KDTreeRef, DEFAULT_NODE_SIZE};
use crate::test::{make_tree, random_points};
use crate::GeoIndexError;

/// Walk the implicit tree and check every split: left half on or below the middle item, right
/// half on or above it, on the node's axis.
fn assert_kd_sorted<T: KDTreeIndex<f64>>(tree: &T) {
    let coords = tree.coords();
    let node_size = tree.node_size() as usize;
    let mut stack = vec![(0usize, tree.indices().len() - 1, 0usize)];
    while let Some((left, right, axis)) = stack.pop() {
        if right - left <= node_size {
            continue;
        }
        let m = (left + right) >> 1;
        let split = coords[2 * m + axis];
        for i in left..m {
            assert!(coords[2 * i + axis] <= split, "left half above split");
        }
        for i in m + 1..=right {
            assert!(coords[2 * i + axis] >= split, "right half below split");
        }
        stack.push((left, m - 1, 1 - axis));
        stack.push((m + 1, right, 1 - axis));
    }
}

#[test]
fn creates_an_index() {
    let points = random_points(1000, 1);
    let tree = make_tree(&points, 10);

    assert_eq!(tree.num_items(), 1000);
    assert_eq!(tree.node_size(), 10);
    assert_kd_sorted(&tree);

    // ids and coords stay parallel through the sort
    let ids = tree.indices();
    let coords = tree.coords();
    let mut seen = vec![false; points.len()];
    for pos in 0..ids.len() {
        let id = ids.get(pos) as usize;
        assert_eq!((coords[2 * pos], coords[2 * pos + 1]), points[id]);
        seen[id] = true;
    }
    assert!(seen.into_iter().all(|s| s), "ids are a permutation");
}

#[test]
fn uses_u16_ids_for_small_trees() {
    let tree = make_tree(&random_points(100, 2), DEFAULT_NODE_SIZE);
    assert!(matches!(tree.indices(), Indices::U16(_)));
}

#[test]
fn uses_u32_ids_for_large_trees() {
    let points = random_points(70_000, 3);
    let tree = make_tree(&points, DEFAULT_NODE_SIZE);
    assert!(matches!(tree.indices(), Indices::U32(_)));
    assert_kd_sorted(&tree);
}

#[test]
fn builds_empty_and_single_item_trees() {
    let empty = KDTreeBuilder::<f64>::new(0).finish();
    assert_eq!(empty.num_items(), 0);
    assert!(empty.coords().is_empty());

    let mut builder = KDTreeBuilder::<f64>::new(1);
    assert_eq!(builder.add(12.0, -45.0).unwrap(), 0);
    let single = builder.finish();
    assert_eq!(single.coords(), &[12.0, -45.0]);
    assert_eq!(single.indices().get(0), 0);
}

#[test]
fn builds_f32_trees() {
    let mut builder = KDTreeBuilder::<f32>::new_with_node_size(50, 4);
    for (lon, lat) in random_points(50, 4) {
        builder.add(lon as f32, lat as f32).unwrap();
    }
    let tree = builder.finish();
    assert_eq!(tree.num_items(), 50);
    assert_eq!(tree.into_inner()[1] & 0x0f, 7);
}

#[test]
fn rejects_points_off_the_sphere() {
    let mut builder = KDTreeBuilder::<f64>::new(1);
    assert!(matches!(
        builder.add(0.0, 91.0),
        Err(GeoIndexError::InvalidCoordinate { .. })
    ));
    assert!(matches!(
        builder.add(180.5, 0.0),
        Err(GeoIndexError::InvalidCoordinate { .. })
    ));
    assert!(builder.add(f64::NAN, 0.0).is_err());

    // rejected points do not take up a slot
    assert_eq!(builder.add(180.0, -90.0).unwrap(), 0);
    builder.finish();
}

#[test]
#[should_panic(expected = "Added 1 items when expected 2.")]
fn panics_if_added_fewer_items_than_declared() {
    let mut builder = KDTreeBuilder::<f64>::new(2);
    builder.add(0.0, 0.0).unwrap();
    builder.finish();
}

#[test]
fn views_an_existing_buffer() {
    let points = random_points(300, 5);
    let owned = make_tree(&points, 16);
    let buffer = owned.clone().into_inner();

    let view = KDTreeRef::<f64>::try_new(&buffer).unwrap();
    assert_eq!(view, owned.as_ref());
    assert_eq!(view.num_items(), 300);
    assert_eq!(view.node_size(), 16);
    assert_kd_sorted(&view);
}

#[test]
fn rejects_malformed_buffers() {
    let buffer = make_tree(&random_points(10, 6), 8).into_inner();

    let mut bad_magic = buffer.clone();
    bad_magic[0] = 0xfb;
    assert!(KDTreeRef::<f64>::try_new(&bad_magic).is_err());

    let mut bad_version = buffer.clone();
    bad_version[1] = (2 << 4) + 8;
    assert!(KDTreeRef::<f64>::try_new(&bad_version).is_err());

    // f64 data read as f32
    assert!(KDTreeRef::<f32>::try_new(&buffer).is_err());

    assert!(KDTreeRef::<f64>::try_new(&buffer[..buffer.len() - 8]).is_err());
    assert!(KDTreeRef::<f64>::try_new(&buffer[..4]).is_err());
}
