//! Narrow-phase collision tests.
//!
//! `NarrowPhase` is the seam the engine calls through; `Geometry` is the
//! built-in implementation covering bounding circles and convex polygons.

use glam::DVec2;

use salvo_core::components::{Hull, Placed};

/// Exact shape tests between already-broad-phased objects.
pub trait NarrowPhase {
    /// Overlap test between a projectile and a target. Returns a contact point.
    fn collide(&self, projectile: Placed<'_>, target: Placed<'_>) -> Option<DVec2>;

    /// Segment test for beams. Returns entry and exit points.
    fn collide_line(&self, start: DVec2, end: DVec2, target: Placed<'_>) -> Option<[DVec2; 2]>;
}

/// Circle and convex-polygon geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geometry;

impl NarrowPhase for Geometry {
    fn collide(&self, projectile: Placed<'_>, target: Placed<'_>) -> Option<DVec2> {
        match (projectile.hull, target.hull) {
            (Hull::Sprite { radius: ra }, Hull::Sprite { radius: rb }) => {
                circle_circle(projectile.pos, *ra, target.pos, *rb)
            }
            (Hull::Sprite { radius }, Hull::Polygon { points }) => {
                let poly = world_points(points, target.pos, target.dir);
                circle_polygon(projectile.pos, *radius, &poly)
            }
            (Hull::Polygon { points }, Hull::Sprite { radius }) => {
                let poly = world_points(points, projectile.pos, projectile.dir);
                circle_polygon(target.pos, *radius, &poly)
            }
            (Hull::Polygon { points: pa }, Hull::Polygon { points: pb }) => {
                let a = world_points(pa, projectile.pos, projectile.dir);
                let b = world_points(pb, target.pos, target.dir);
                polygon_polygon(&a, &b)
            }
        }
    }

    fn collide_line(&self, start: DVec2, end: DVec2, target: Placed<'_>) -> Option<[DVec2; 2]> {
        match target.hull {
            Hull::Sprite { radius } => segment_circle(start, end, target.pos, *radius),
            Hull::Polygon { points } => {
                let poly = world_points(points, target.pos, target.dir);
                segment_polygon(start, end, &poly)
            }
        }
    }
}

fn world_points(points: &[DVec2], pos: DVec2, dir: f64) -> Vec<DVec2> {
    let rot = DVec2::from_angle(dir);
    points.iter().map(|p| pos + rot.rotate(*p)).collect()
}

fn circle_circle(a: DVec2, ra: f64, b: DVec2, rb: f64) -> Option<DVec2> {
    let d = b - a;
    let reach = ra + rb;
    if d.length_squared() > reach * reach {
        return None;
    }
    if reach <= 0.0 {
        return Some(a);
    }
    Some(a + d * (ra / reach))
}

fn closest_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

fn edges(poly: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    poly.iter()
        .zip(poly.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

/// Point-in-convex-polygon, either winding.
fn contains(poly: &[DVec2], p: DVec2) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    for (a, b) in edges(poly) {
        let cross = (b - a).perp_dot(p - a);
        if cross != 0.0 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    true
}

fn circle_polygon(center: DVec2, radius: f64, poly: &[DVec2]) -> Option<DVec2> {
    if contains(poly, center) {
        return Some(center);
    }
    let r2 = radius * radius;
    edges(poly)
        .map(|(a, b)| closest_on_segment(center, a, b))
        .filter(|q| q.distance_squared(center) <= r2)
        .min_by(|x, y| {
            x.distance_squared(center)
                .total_cmp(&y.distance_squared(center))
        })
}

fn polygon_polygon(a: &[DVec2], b: &[DVec2]) -> Option<DVec2> {
    // Separating axis test over both polygons' edge normals.
    for poly in [a, b] {
        for (p, q) in edges(poly) {
            let axis = (q - p).perp();
            let (amin, amax) = project(a, axis);
            let (bmin, bmax) = project(b, axis);
            if amax < bmin || bmax < amin {
                return None;
            }
        }
    }
    a.iter()
        .find(|p| contains(b, **p))
        .or_else(|| b.iter().find(|p| contains(a, **p)))
        .copied()
        .or_else(|| Some((centroid(a) + centroid(b)) * 0.5))
}

fn project(poly: &[DVec2], axis: DVec2) -> (f64, f64) {
    poly.iter()
        .map(|p| p.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn centroid(poly: &[DVec2]) -> DVec2 {
    if poly.is_empty() {
        return DVec2::ZERO;
    }
    poly.iter().fold(DVec2::ZERO, |acc, p| acc + *p) / poly.len() as f64
}

fn segment_circle(start: DVec2, end: DVec2, center: DVec2, radius: f64) -> Option<[DVec2; 2]> {
    let d = end - start;
    let f = start - center;
    let a = d.length_squared();
    let c = f.length_squared() - radius * radius;
    if a == 0.0 {
        return (c <= 0.0).then_some([start, start]);
    }
    let b = 2.0 * f.dot(d);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t0 = (-b - root) / (2.0 * a);
    let t1 = (-b + root) / (2.0 * a);
    if t1 < 0.0 || t0 > 1.0 {
        return None;
    }
    let t0 = t0.max(0.0);
    let t1 = t1.min(1.0);
    Some([start + d * t0, start + d * t1])
}

fn segment_polygon(start: DVec2, end: DVec2, poly: &[DVec2]) -> Option<[DVec2; 2]> {
    let d = end - start;
    let mut hits: Vec<f64> = edges(poly)
        .filter_map(|(a, b)| segment_param(start, d, a, b - a))
        .collect();
    if contains(poly, start) {
        hits.push(0.0);
    }
    if contains(poly, end) {
        hits.push(1.0);
    }
    let lo = hits.iter().copied().reduce(f64::min)?;
    let hi = hits.iter().copied().reduce(f64::max)?;
    Some([start + d * lo, start + d * hi])
}

/// Parameter along `p + t·r` where it crosses segment `q + u·s`.
fn segment_param(p: DVec2, r: DVec2, q: DVec2, s: DVec2) -> Option<f64> {
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }
    let qp = q - p;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
}
