//! Seeded hand-drawn distortion of paths.
//!
//! Each straight segment becomes a slightly bowed quadratic whose end point
//! wanders a little, so corners overshoot the way a pen stroke does. The
//! distortion is a pure function of the shape's seed, so a shape looks the
//! same every frame and after every move.

use kurbo::{BezPath, PathEl, Point, Vec2};

/// xorshift32 generator.
struct SketchRng {
    state: u32,
}

impl SketchRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in `[-amount, amount]`.
    fn jitter(&mut self, amount: f64) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64 * 2.0 - 1.0) * amount
    }

    fn jitter_point(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.jitter(amount), p.y + self.jitter(amount))
    }
}

/// Distort `path` for a hand-drawn look.
///
/// `roughness` of 0 returns the path untouched. `pass` selects an independent
/// random sequence so two passes over one path draw the doubled sketch line.
/// The effect shrinks with `sqrt(zoom)` to look similar at every zoom level.
pub fn roughen(path: &BezPath, roughness: f64, zoom: f64, seed: u32, pass: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }

    let scale = 1.0 / zoom.max(f64::EPSILON).sqrt();
    let wander = roughness * 2.0 * scale;
    let mut rng = SketchRng::new(seed.wrapping_add(pass.wrapping_mul(99_991)));

    let mut out = BezPath::new();
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(rng.jitter_point(p, wander));
                last = p;
            }
            PathEl::LineTo(p) => {
                let d = p - last;
                let len = d.hypot();
                let normal = if len > 1e-3 {
                    Vec2::new(-d.y / len, d.x / len)
                } else {
                    Vec2::ZERO
                };
                let bow = rng.jitter(roughness * roughness * len / 200.0) * scale;
                let control = last.midpoint(p) + normal * bow;
                out.quad_to(control, rng.jitter_point(p, wander));
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(rng.jitter_point(p1, wander * 0.7), rng.jitter_point(p2, wander));
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(
                    rng.jitter_point(p1, wander * 0.5),
                    rng.jitter_point(p2, wander * 0.5),
                    rng.jitter_point(p3, wander),
                );
                last = p3;
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
