//! Piecewise cubic curves, sampled by arc length.
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::Vector2;

use crate::{cfg::CurveOpts, datum::Datum, position::PlanarPoint};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod segment;
pub use segment::CubicSegment;

/// Handle offset, relative to its owning point, in degrees.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Handle {
    /// Longitude offset
    pub dx: f64,
    /// Latitude offset
    pub dy: f64,
}

impl Handle {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.dx, self.dy)
    }
}

impl std::ops::Neg for Handle {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

/// One point of a [CurveDefinition], with its tangent handles.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ControlPoint {
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Incoming handle offset
    #[cfg_attr(feature = "serde", serde(default))]
    pub incoming_handle: Handle,
    /// Outgoing handle offset
    #[cfg_attr(feature = "serde", serde(default))]
    pub outgoing_handle: Handle,
    /// Editing one handle mirrors the other one. This is an edition
    /// constraint only: the curve always uses both handles as they are.
    #[cfg_attr(feature = "serde", serde(default))]
    pub handles_locked: bool,
}

impl ControlPoint {
    /// Anchor style [ControlPoint]: no handles.
    pub fn anchor(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            ..Default::default()
        }
    }

    /// Builds a [ControlPoint] with independent handles
    pub fn new(longitude: f64, latitude: f64, incoming: Handle, outgoing: Handle) -> Self {
        Self {
            longitude,
            latitude,
            incoming_handle: incoming,
            outgoing_handle: outgoing,
            handles_locked: false,
        }
    }

    /// Builds a smooth [ControlPoint]: locked handles,
    /// `outgoing` on one side and its opposite on the other.
    pub fn smooth(longitude: f64, latitude: f64, outgoing: Handle) -> Self {
        Self {
            longitude,
            latitude,
            incoming_handle: -outgoing,
            outgoing_handle: outgoing,
            handles_locked: true,
        }
    }

    /// Builds a [ControlPoint] from absolute handle positions (lon, lat),
    /// as an editor usually manipulates them.
    pub fn from_absolute_handles(
        longitude: f64,
        latitude: f64,
        incoming: Option<(f64, f64)>,
        outgoing: Option<(f64, f64)>,
        handles_locked: bool,
    ) -> Self {
        let offset = |abs: Option<(f64, f64)>| {
            abs.map(|(lon, lat)| Handle::new(lon - longitude, lat - latitude))
                .unwrap_or_default()
        };
        Self {
            longitude,
            latitude,
            incoming_handle: offset(incoming),
            outgoing_handle: offset(outgoing),
            handles_locked,
        }
    }

    /// Updates the incoming handle. Mirrors the outgoing one when locked.
    pub fn set_incoming(&mut self, handle: Handle) {
        self.incoming_handle = handle;
        if self.handles_locked {
            self.outgoing_handle = -handle;
        }
    }

    /// Updates the outgoing handle. Mirrors the incoming one when locked.
    pub fn set_outgoing(&mut self, handle: Handle) {
        self.outgoing_handle = handle;
        if self.handles_locked {
            self.incoming_handle = -handle;
        }
    }

    /// Point coordinates, as (lon, lat) vector
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.longitude, self.latitude)
    }

    /// Absolute position of the incoming handle end
    pub fn incoming_control(&self) -> Vector2<f64> {
        self.position() + self.incoming_handle.to_vector()
    }

    /// Absolute position of the outgoing handle end
    pub fn outgoing_control(&self) -> Vector2<f64> {
        self.position() + self.outgoing_handle.to_vector()
    }
}

/// Ordered chain: start anchor, interior control points, end anchor.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveDefinition {
    /// [Datum] the coordinates are expressed in
    pub datum: Datum,
    /// Chain of [ControlPoint]s, anchors included
    pub points: Vec<ControlPoint>,
}

impl CurveDefinition {
    pub fn new(datum: Datum, points: Vec<ControlPoint>) -> Self {
        Self { datum, points }
    }

    /// Straight line between both anchors
    pub fn straight(start: &PlanarPoint, end: &PlanarPoint) -> Self {
        Self::with_control_points(start, end, vec![])
    }

    /// Curve passing through interior `control_points`, between both anchors.
    /// `end` is expressed in the [Datum] of `start`.
    pub fn with_control_points(
        start: &PlanarPoint,
        end: &PlanarPoint,
        control_points: Vec<ControlPoint>,
    ) -> Self {
        let end = end.to_datum(start.datum);
        let mut points = Vec::with_capacity(control_points.len() + 2);
        points.push(ControlPoint::anchor(start.longitude, start.latitude));
        points.extend(control_points);
        points.push(ControlPoint::anchor(end.longitude, end.latitude));
        Self::new(start.datum, points)
    }

    /// Number of interior control points
    pub fn num_control_points(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    pub fn first(&self) -> Option<&ControlPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ControlPoint> {
        self.points.last()
    }
}

/// Evaluable chain of [CubicSegment]s, built from a [CurveDefinition].
#[derive(Debug, Clone)]
pub struct CurvePath {
    datum: Datum,
    /// Curve first point
    start: Vector2<f64>,
    /// Curve last point
    end: Vector2<f64>,
    segments: Vec<CubicSegment>,
    /// Total length (meters)
    length_m: f64,
}

impl CurvePath {
    /// Builds a [CurvePath]. Segment `i` spans point `i` (outgoing handle)
    /// to point `i+1` (incoming handle). Chains of less than two points
    /// are rejected by the caller: we only return an empty path then.
    pub fn new(definition: &CurveDefinition, opts: &CurveOpts) -> Self {
        let segments = definition
            .points
            .iter()
            .tuple_windows()
            .map(|(lhs, rhs)| {
                CubicSegment::new(
                    lhs.position(),
                    lhs.outgoing_control(),
                    rhs.incoming_control(),
                    rhs.position(),
                    opts.length_steps,
                    opts.refine_steps,
                )
            })
            .collect::<Vec<_>>();

        let length_m = segments.iter().map(|seg| seg.length_m()).sum::<f64>();

        let start = definition
            .first()
            .map(|pt| pt.position())
            .unwrap_or_else(Vector2::zeros);

        let end = definition
            .last()
            .map(|pt| pt.position())
            .unwrap_or(start);

        if length_m == 0.0 {
            warn!("degenerate curve: zero length");
        } else {
            debug!(
                "curve: {} segment(s), length={:.3}m",
                segments.len(),
                length_m
            );
        }

        Self {
            datum: definition.datum,
            start,
            end,
            segments,
            length_m,
        }
    }

    /// [Datum] of this curve
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Total length (meters)
    pub fn length(&self) -> f64 {
        self.length_m
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    /// Curve first and last points
    pub fn points(&self) -> (PlanarPoint, PlanarPoint) {
        (
            PlanarPoint::from_vector(self.start, self.datum),
            PlanarPoint::from_vector(self.end, self.datum),
        )
    }

    fn vector_at_length(&self, length_m: f64) -> Vector2<f64> {
        if length_m <= 0.0 || self.length_m <= 0.0 {
            return self.start;
        }
        if length_m >= self.length_m {
            return self.end;
        }

        let mut acc = 0.0;
        for seg in self.segments.iter() {
            let seg_len = seg.length_m();
            if acc + seg_len >= length_m && seg_len > 0.0 {
                return seg.point_at_length(length_m - acc);
            }
            acc += seg_len;
        }

        self.end
    }

    /// Point located at cumulative arc length `length_m` (meters).
    /// Clamped to the curve endpoints, never extrapolated.
    pub fn point_at_length(&self, length_m: f64) -> PlanarPoint {
        PlanarPoint::from_vector(self.vector_at_length(length_m), self.datum)
    }

    /// Generates `count` points spaced uniformly along the curve (by arc length),
    /// both endpoints included when `count >= 2`.
    pub fn generate_points(&self, count: usize) -> Vec<PlanarPoint> {
        match count {
            0 => Vec::new(),
            1 => vec![PlanarPoint::from_vector(self.start, self.datum)],
            _ => {
                let step = self.length_m / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        let v = if i == count - 1 {
                            self.end
                        } else {
                            self.vector_at_length(step * i as f64)
                        };
                        PlanarPoint::from_vector(v, self.datum)
                    })
                    .collect()
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ControlPoint, CurveDefinition, CurvePath, Handle};
    use crate::{
        cfg::CurveOpts,
        datum::Datum,
        position::{great_circle_distance_m, PlanarPoint},
    };

    use itertools::Itertools;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rstest::*;

    #[fixture]
    fn start() -> PlanarPoint {
        PlanarPoint::new(116.3000, 39.9000, Datum::WGS84)
    }

    #[fixture]
    fn end() -> PlanarPoint {
        PlanarPoint::new(116.3200, 39.9100, Datum::WGS84)
    }

    fn detour(start: &PlanarPoint, end: &PlanarPoint) -> CurveDefinition {
        CurveDefinition::with_control_points(
            start,
            end,
            vec![
                ControlPoint::smooth(116.3060, 39.9120, Handle::new(0.004, 0.0)),
                ControlPoint::new(
                    116.3140,
                    39.9000,
                    Handle::new(-0.003, 0.0),
                    Handle::new(0.003, 0.0),
                ),
            ],
        )
    }

    #[rstest]
    fn straight_line(start: PlanarPoint, end: PlanarPoint) {
        let curve = CurvePath::new(&CurveDefinition::straight(&start, &end), &CurveOpts::default());

        let expected = start.distance_m(&end);
        assert!(
            (curve.length() - expected).abs() < 1.0E-3 * expected,
            "length {} expected {}",
            curve.length(),
            expected
        );

        let points = curve.generate_points(2);
        assert_eq!(points, vec![start, end]);
        assert_eq!(curve.points(), (start, end));
    }

    #[rstest]
    fn boundaries(start: PlanarPoint, end: PlanarPoint) {
        let definition = detour(&start, &end);
        assert_eq!(definition.num_control_points(), 2);
        assert_eq!(CurveDefinition::straight(&start, &end).num_control_points(), 0);

        let curve = CurvePath::new(&definition, &CurveOpts::default());
        assert_eq!(curve.segments().len(), 3);
        assert!(curve.length() > start.distance_m(&end));

        assert_eq!(curve.point_at_length(0.0), start);
        assert_eq!(curve.point_at_length(-5.0), start);
        assert_eq!(curve.point_at_length(curve.length()), end);
        assert_eq!(curve.point_at_length(curve.length() + 100.0), end);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(7, 7)]
    #[case(50, 50)]
    fn generated_count(start: PlanarPoint, end: PlanarPoint, #[case] count: usize, #[case] expected: usize) {
        let curve = CurvePath::new(&detour(&start, &end), &CurveOpts::default());
        let points = curve.generate_points(count);
        assert_eq!(points.len(), expected);
        if count == 1 {
            assert_eq!(points[0], start);
        }
        if count >= 2 {
            assert_eq!(points[0], start);
            assert_eq!(points[count - 1], end);
        }
    }

    #[rstest]
    fn uniform_spacing(start: PlanarPoint, end: PlanarPoint) {
        let curve = CurvePath::new(&detour(&start, &end), &CurveOpts::default());
        let count = 80;
        let points = curve.generate_points(count);
        let expected = curve.length() / (count - 1) as f64;

        for (lhs, rhs) in points.iter().tuple_windows() {
            let d = great_circle_distance_m(lhs.to_vector(), rhs.to_vector());
            assert!(
                (d - expected).abs() < 0.02 * expected,
                "spacing {} expected {}",
                d,
                expected
            );
        }
    }

    #[test]
    fn degenerate_curve() {
        let point = PlanarPoint::new(121.47, 31.23, Datum::GCJ02);
        let curve = CurvePath::new(&CurveDefinition::straight(&point, &point), &CurveOpts::default());
        assert_eq!(curve.datum(), Datum::GCJ02);
        assert_eq!(curve.length(), 0.0);
        assert_eq!(curve.point_at_length(12.0), point);
        assert_eq!(curve.generate_points(3), vec![point, point, point]);
    }

    #[test]
    fn zero_length_segment_in_chain() {
        let start = PlanarPoint::new(121.47, 31.23, Datum::GCJ02);
        let end = PlanarPoint::new(121.48, 31.23, Datum::GCJ02);
        // interior point sitting on the start anchor
        let definition = CurveDefinition::with_control_points(
            &start,
            &end,
            vec![ControlPoint::anchor(121.47, 31.23)],
        );
        let curve = CurvePath::new(&definition, &CurveOpts::default());
        assert_eq!(curve.segments()[0].length_m(), 0.0);
        assert_eq!(curve.point_at_length(0.0), start);
        assert_eq!(curve.point_at_length(curve.length()), end);

        let mid = curve.point_at_length(curve.length() / 2.0);
        assert!((mid.longitude - 121.475).abs() < 1.0E-4);
    }

    #[test]
    fn coarse_resolution_stays_uniform() {
        let mut rng = SmallRng::seed_from_u64(42);
        let opts = CurveOpts {
            length_steps: 20,
            refine_steps: 100,
        };
        for _ in 0..20 {
            let start = PlanarPoint::new(
                rng.random_range(100.0..120.0),
                rng.random_range(20.0..40.0),
                Datum::WGS84,
            );
            let end = PlanarPoint::new(
                start.longitude + rng.random_range(0.005..0.02),
                start.latitude + rng.random_range(-0.01..0.01),
                Datum::WGS84,
            );
            // handles along the chord, shorter than half of it: no loop
            let k = rng.random_range(0.1..0.3);
            let control = ControlPoint::smooth(
                (start.longitude + end.longitude) / 2.0,
                (start.latitude + end.latitude) / 2.0 + rng.random_range(-0.001..0.001),
                Handle::new(
                    (end.longitude - start.longitude) * k,
                    (end.latitude - start.latitude) * k,
                ),
            );
            let curve = CurvePath::new(
                &CurveDefinition::with_control_points(&start, &end, vec![control]),
                &opts,
            );

            let points = curve.generate_points(12);
            assert_eq!(points.first(), Some(&start));
            assert_eq!(points.last(), Some(&end));

            let expected = curve.length() / 11.0;
            for (lhs, rhs) in points.iter().tuple_windows() {
                let d = lhs.distance_m(rhs);
                assert!((d - expected).abs() < 0.05 * expected, "{} vs {}", d, expected);
            }
        }
    }

    #[test]
    fn locked_handles_mirror() {
        let mut pt = ControlPoint::smooth(116.0, 39.0, Handle::new(0.01, 0.0));
        assert_eq!(pt.incoming_handle, Handle::new(-0.01, 0.0));

        pt.set_incoming(Handle::new(0.0, -0.02));
        assert_eq!(pt.outgoing_handle, Handle::new(0.0, 0.02));

        pt.handles_locked = false;
        pt.set_outgoing(Handle::new(0.5, 0.5));
        assert_eq!(pt.incoming_handle, Handle::new(0.0, -0.02));
    }

    #[test]
    fn absolute_handles() {
        let pt = ControlPoint::from_absolute_handles(
            116.0,
            39.0,
            Some((115.99, 39.0)),
            None,
            false,
        );
        assert!((pt.incoming_handle.dx + 0.01).abs() < 1.0E-12);
        assert_eq!(pt.incoming_handle.dy, 0.0);
        assert!(pt.outgoing_handle.is_zero());
        assert!((pt.incoming_control() - nalgebra::Vector2::new(115.99, 39.0)).norm() < 1.0E-12);
        assert_eq!(pt.outgoing_control(), pt.position());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn persisted_shape() {
        let pt = ControlPoint::smooth(116.3012, 39.9001, Handle::new(0.0002, 0.0002));
        let json = serde_json::to_value(pt).unwrap();
        assert_eq!(json["incomingHandle"]["dx"], -0.0002);
        assert_eq!(json["outgoingHandle"]["dy"], 0.0002);
        assert_eq!(json["handlesLocked"], true);

        let pt: ControlPoint =
            serde_json::from_str(r#"{"longitude": 116.3, "latitude": 39.9}"#).unwrap();
        assert_eq!(pt, ControlPoint::anchor(116.3, 39.9));
    }
}
