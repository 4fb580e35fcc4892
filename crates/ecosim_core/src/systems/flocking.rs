//! Separation, alignment and cohesion cues over a creature's flockmates.
//!
//! The three vectors are handed to the decision policy as raw observation
//! channels; nothing here blends them into a heading.

use ecosim_data::Point;

pub type Vec2 = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Boids {
    pub separation: Vec2,
    pub alignment: Vec2,
    pub cohesion: Vec2,
}

/// Sums shorter than this count as zero-length.
const ZERO_LENGTH: f64 = 1e-12;

fn normalize(v: Vec2) -> Vec2 {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    if len > ZERO_LENGTH {
        (v.0 / len, v.1 / len)
    } else {
        (0.0, 0.0)
    }
}

/// Mean position of `points`, or `None` for an empty set.
#[must_use]
pub fn centroid<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let (sx, sy, n) = points
        .into_iter()
        .fold((0.0, 0.0, 0usize), |(sx, sy, n), p| (sx + p.x, sy + p.y, n + 1));
    (n > 0).then(|| Point::new(sx / n as f64, sy / n as f64))
}

/// `mates` holds each flockmate's position and heading.
#[must_use]
pub fn compute(me: Point, mates: &[(Point, f64)], separation_radius: f64) -> Boids {
    if mates.is_empty() {
        return Boids::default();
    }

    let cohesion = centroid(mates.iter().map(|(p, _)| *p))
        .map_or((0.0, 0.0), |c| me.direction_to(&c));

    let heading_sum = mates
        .iter()
        .fold((0.0, 0.0), |acc, (_, h)| (acc.0 + h.cos(), acc.1 + h.sin()));
    let alignment = normalize(heading_sum);

    let push = mates
        .iter()
        .filter(|(p, _)| me.distance(p) < separation_radius)
        .fold((0.0, 0.0), |acc, (p, _)| (acc.0 + me.x - p.x, acc.1 + me.y - p.y));
    let separation = normalize(push);

    Boids {
        separation,
        alignment,
        cohesion,
    }
}
