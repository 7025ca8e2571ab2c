use nalgebra::Vector2;

use crate::position::great_circle_distance_m;

/// Cubic Bézier segment in the (lon, lat) plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSegment {
    /// Start, first control, second control, end
    controls: [Vector2<f64>; 4],
    /// Length estimate (meters)
    length_m: f64,
    /// Cumulative arc length (meters) at `refine_steps + 1` uniform
    /// parameter values, first entry is 0.
    arc_table: Vec<f64>,
}

impl CubicSegment {
    /// Builds a new [CubicSegment].
    /// ## Inputs
    /// - start, c1, c2, end: control values
    /// - length_steps: uniform steps used to estimate the segment length
    /// - refine_steps: uniform steps of the point-at-length lookup table
    pub fn new(
        start: Vector2<f64>,
        c1: Vector2<f64>,
        c2: Vector2<f64>,
        end: Vector2<f64>,
        length_steps: usize,
        refine_steps: usize,
    ) -> Self {
        let mut s = Self {
            controls: [start, c1, c2, end],
            length_m: 0.0,
            arc_table: Vec::with_capacity(refine_steps + 1),
        };
        s.length_m = s.sampled_length_m(length_steps);

        let mut acc = 0.0;
        let mut prev = start;
        s.arc_table.push(0.0);
        for i in 1..=refine_steps.max(1) {
            let p = s.position(i as f64 / refine_steps.max(1) as f64);
            acc += great_circle_distance_m(prev, p);
            s.arc_table.push(acc);
            prev = p;
        }
        s
    }

    /// Evaluates the cubic blend at `t` in [0, 1].
    /// Expressed relatively to the start point: coincident controls
    /// always evaluate to that exact point.
    pub fn position(&self, t: f64) -> Vector2<f64> {
        let [p0, p1, p2, p3] = self.controls;
        if t <= 0.0 {
            return p0;
        }
        if t >= 1.0 {
            return p3;
        }
        let u = 1.0 - t;
        p0 + (p1 - p0) * (3.0 * u * u * t) + (p2 - p0) * (3.0 * u * t * t) + (p3 - p0) * t.powi(3)
    }

    /// Segment start point
    pub fn start(&self) -> Vector2<f64> {
        self.controls[0]
    }

    /// Segment end point
    pub fn end(&self) -> Vector2<f64> {
        self.controls[3]
    }

    /// Estimated length (meters)
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    fn sampled_length_m(&self, steps: usize) -> f64 {
        let steps = steps.max(1);
        let mut prev = self.start();
        (1..=steps)
            .map(|i| {
                let p = self.position(i as f64 / steps as f64);
                let d = great_circle_distance_m(prev, p);
                prev = p;
                d
            })
            .sum()
    }

    /// Point located `local_m` meters after the segment start.
    /// The target is mapped proportionally onto the refined arc table,
    /// so 0 lands on [Self::start] and [Self::length_m] on [Self::end].
    pub fn point_at_length(&self, local_m: f64) -> Vector2<f64> {
        if self.length_m <= 0.0 || local_m <= 0.0 {
            return self.start();
        }
        if local_m >= self.length_m {
            return self.end();
        }

        let refined_total = self.arc_table[self.arc_table.len() - 1];
        let target = local_m / self.length_m * refined_total;
        let steps = (self.arc_table.len() - 1) as f64;

        for (i, pair) in self.arc_table.windows(2).enumerate() {
            let (lhs, rhs) = (pair[0], pair[1]);
            if rhs >= target {
                let span = rhs - lhs;
                let frac = if span > 0.0 {
                    (target - lhs) / span
                } else {
                    0.0
                };
                let t = (i as f64 + frac) / steps;
                return self.position(t);
            }
        }

        self.end()
    }
}
