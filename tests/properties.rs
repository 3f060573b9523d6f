use delaunay_flip::{
    convex_hull, deviation, polygon_area, triangulate, Adjacent, Point, Rect, Triangulation,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_cloud(seed: u64, n: usize, size: f64) -> Vec<Point<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.random_range(1.0..size - 1.0),
                rng.random_range(1.0..size - 1.0),
            )
        })
        .collect()
}

/// `n` points spread over the square [0, scale]², with the corners included.
fn scaled_cloud(seed: u64, n: usize, scale: f64) -> Vec<Point<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, scale),
        Point::new(scale, scale),
        Point::new(scale, 0.0),
    ];
    points.extend((0..n).map(|_| {
        Point::new(
            rng.random_range(0.01..0.99) * scale,
            rng.random_range(0.01..0.99) * scale,
        )
    }));
    points
}

fn build(seed: u64, n: usize) -> Triangulation<f64> {
    let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(1000.0, 1000.0));
    let mut tri = Triangulation::new(bounds).unwrap();
    tri.insert_all(random_cloud(seed, n, 1000.0)).unwrap();
    tri
}

#[test]
fn triangle_count_matches_euler() {
    for seed in 0..4 {
        let tri = build(seed, 150);
        let n = tri.points().len();
        let h = convex_hull(tri.points()).len();
        assert_eq!(h, 4);
        assert_eq!(tri.triangles().len(), 2 * n - h - 2);
        assert_eq!(tri.edges().len(), 3 * n - h - 3);
    }
}

#[test]
fn planar_cover_holds_after_every_insertion() {
    let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(1000.0, 1000.0));
    let mut tri = Triangulation::new(bounds).unwrap();
    for p in random_cloud(7, 60, 1000.0) {
        tri.insert(p).unwrap();
        let area: f64 = tri.triangles().iter().map(|t| t.area()).sum();
        assert!((area - polygon_area(&convex_hull(tri.points()))).abs() < 1e-6);
        assert!(deviation(tri.points(), &tri.triangle_indices()) < 1e-12);
    }
}

#[test]
fn delaunay_property() {
    let tri = build(11, 200);
    for t in tri.triangles() {
        let margin = 1e-6 * t.circumradius().max(1.0);
        for q in tri.points() {
            if !t.has_vertex(q) {
                assert!(!t.circumcircle_contains(q, margin));
            }
        }
    }
}

#[test]
fn any_domain_scale_builds() {
    for scale in [1e-3, 1.0, 1e7] {
        for seed in 0..3 {
            let tri = triangulate(&scaled_cloud(seed, 300, scale)).unwrap();
            let n = tri.points().len();
            assert_eq!(n, 304);
            assert_eq!(tri.triangles().len(), 2 * n - 4 - 2);
            assert!(tri.is_delaunay().unwrap());
            tri.mesh().validate().unwrap();
        }
    }
}

#[test]
fn every_edge_is_manifold() {
    let tri = build(3, 120);
    let mesh = tri.mesh();
    let mut hull = 0;
    for e in mesh.edge_ids() {
        match mesh.adjacent(e) {
            Adjacent::One(_) => hull += 1,
            Adjacent::Two(..) => {}
            Adjacent::None => panic!("edge {:?} borders no triangle", e),
        }
    }
    assert_eq!(hull, 4);
    mesh.validate().unwrap();
}

#[test]
fn legalization_is_idempotent() {
    let mut tri = build(5, 150);
    let flips = tri.stats().flips;
    assert!(flips > 0);
    assert_eq!(tri.legalize_all().unwrap(), 0);
    assert_eq!(tri.stats().flips, flips);
}

#[test]
fn integer_points_on_shared_edges() {
    // integer coordinates put many points exactly on existing edges
    let mut rng = StdRng::seed_from_u64(42);
    let mut data: Vec<Point<f64>> = Vec::new();
    while data.len() < 120 {
        let p = Point::new(rng.random_range(0..=40) as f64, rng.random_range(0..=40) as f64);
        if !data.contains(&p) {
            data.push(p);
        }
    }
    let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    let mut tri = Triangulation::new(bounds).unwrap();
    tri.insert_all(data).unwrap();

    let on_rim = tri
        .points()
        .iter()
        .filter(|p| p.x == 0.0 || p.x == 40.0 || p.y == 0.0 || p.y == 40.0)
        .count();
    assert_eq!(tri.triangles().len(), 2 * tri.points().len() - on_rim - 2);
    assert!(tri.is_delaunay().unwrap());
    tri.mesh().validate().unwrap();
}
