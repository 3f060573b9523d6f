use delaunay_flip::{deviation, Point, Rect, Triangulation};
use rand::Rng;

fn main() {
    // random integer point cloud in a 1000 x 1000 square
    let (min, max) = (0, 1000);
    let mut rng = rand::rng();
    let mut data: Vec<Point<f64>> = Vec::new();
    while data.len() < 100 {
        let p = Point::new(
            rng.random_range(min..=max) as f64,
            rng.random_range(min..=max) as f64,
        );
        if !data.contains(&p) {
            data.push(p);
        }
    }

    let bounds = Rect::new(
        Point::new(min as f64, min as f64),
        Point::new(max as f64, max as f64),
    );
    let mut tri = Triangulation::new(bounds).unwrap();
    tri.insert_all(data).unwrap();

    let stats = tri.stats();
    println!(
        "{} points, {} triangles, {} edges, {} flips",
        tri.points().len(),
        tri.triangles().len(),
        tri.edges().len(),
        stats.flips
    );
    println!(
        "deviation: {:e}",
        deviation(tri.points(), &tri.triangle_indices())
    );
    for t in tri.triangles().iter().take(5) {
        let c = t.centroid();
        println!("{:?} centroid ({:.1}, {:.1})", t.vertices(), c.x, c.y);
    }
}
