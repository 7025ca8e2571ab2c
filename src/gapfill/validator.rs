use log::debug;

use crate::{
    cfg::Config,
    error::Error,
    gapfill::GapFillRequest,
    store::TrackSnapshot,
    track::Anchor,
};

/// Validated gap-fill: both [Anchor]s and the number of points to synthesize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ValidatedGap {
    pub start: Anchor,
    pub end: Anchor,
    pub count: usize,
}

/// Checks a [GapFillRequest] against a [TrackSnapshot], prior any mutation.
pub(crate) struct Validator<'a> {
    cfg: &'a Config,
    snapshot: &'a TrackSnapshot,
}

impl<'a> Validator<'a> {
    pub fn new(cfg: &'a Config, snapshot: &'a TrackSnapshot) -> Self {
        Self { cfg, snapshot }
    }

    /// Number of samples `start + i * interval` (i >= 1) falling
    /// strictly before `end`, computed in nanoseconds.
    fn sample_count(start: &Anchor, end: &Anchor, interval_ns: i128) -> usize {
        let gap_ns = (end.epoch() - start.epoch()).total_nanoseconds();
        if gap_ns <= 0 || interval_ns <= 0 {
            return 0;
        }
        ((gap_ns - 1) / interval_ns) as usize
    }

    pub fn validate(&self, request: &GapFillRequest) -> Result<ValidatedGap, Error> {
        let curve = &request.curve;
        if curve.points.len() < 2 {
            return Err(Error::MalformedCurve(curve.points.len()));
        }

        let interval_s = request.interval.to_seconds();
        if !(self.cfg.min_interval_s..=self.cfg.max_interval_s).contains(&interval_s) {
            return Err(Error::InvalidInterval(
                interval_s,
                self.cfg.min_interval_s,
                self.cfg.max_interval_s,
            ));
        }

        let (start_index, end_index) = (request.start_index, request.end_index);

        let start = self
            .snapshot
            .record(start_index)
            .ok_or(Error::UnknownIndex(start_index))?;

        let end = self
            .snapshot
            .record(end_index)
            .ok_or(Error::UnknownIndex(end_index))?;

        if end.index <= start.index || end.epoch <= start.epoch {
            return Err(Error::InvalidAnchors(start_index, end_index));
        }

        let between = self.snapshot.records_between(start_index, end_index);
        if !between.is_empty() {
            return Err(Error::OccupiedRange(start_index, end_index, between.len()));
        }

        if let Some(synthesis) = self
            .snapshot
            .syntheses
            .iter()
            .find(|synthesis| synthesis.overlaps(start_index, end_index))
        {
            return Err(Error::OverlappingSynthesis(
                start_index,
                end_index,
                synthesis.id,
            ));
        }

        let start = Anchor::from_record(start, curve.datum);
        let end = Anchor::from_record(end, curve.datum);

        let last = curve.points.len() - 1;
        for (idx, anchor) in [(0, &start), (last, &end)] {
            let point = &curve.points[idx];
            let tolerance = self.cfg.endpoint_tolerance_deg;
            if (point.longitude - anchor.position.longitude).abs() > tolerance
                || (point.latitude - anchor.position.latitude).abs() > tolerance
            {
                return Err(Error::EndpointMismatch(idx));
            }
        }

        let count = Self::sample_count(&start, &end, request.interval.total_nanoseconds());
        if count < 1 {
            return Err(Error::GapTooShort(
                (end.epoch() - start.epoch()).to_seconds(),
                interval_s,
            ));
        }

        debug!(
            "{}: #{}..#{} validated, {} control point(s), {} point(s) to synthesize",
            self.snapshot.track,
            start_index,
            end_index,
            curve.num_control_points(),
            count
        );

        Ok(ValidatedGap { start, end, count })
    }
}
