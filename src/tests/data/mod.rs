use crate::prelude::{
    ControlPoint, CurveDefinition, Datum, Duration, Epoch, GapFillRequest, Handle, MemoryStore,
    PlanarPoint, TrackId, TrajectoryRecord,
};

/// Reference track: recorded at 1 Hz, with a 10 s gap (tunnel)
/// between #10 and #11, then a 30 s gap between #15 and #16.
pub const REFERENCE_TRACK: TrackId = TrackId(7);

/// Second track, never modified by the reference scenarios
pub const OTHER_TRACK: TrackId = TrackId(8);

/// GPST seconds of record #10
pub const REFERENCE_T0_GPST_S: f64 = 1_400_000_000.0;

/// #10 coordinates (WGS84)
pub const TUNNEL_ENTRY: (f64, f64) = (116.3000, 39.9000);

/// #11 coordinates (WGS84)
pub const TUNNEL_EXIT: (f64, f64) = (116.3010, 39.9006);

pub fn epoch(t_s: f64) -> Epoch {
    Epoch::from_gpst_seconds(REFERENCE_T0_GPST_S + t_s)
}

/// (t_s, lon, lat, speed, heading, elevation) of each reference record
fn reference_samples() -> Vec<(f64, f64, f64, f64, f64, Option<f64>)> {
    let mut samples = Vec::new();
    for i in 0..10 {
        let k = (10 - i) as f64;
        samples.push((
            -k,
            TUNNEL_ENTRY.0 - k * 1.0E-5,
            TUNNEL_ENTRY.1 + k * 5.0E-5,
            5.0,
            350.0,
            Some(52.0),
        ));
    }
    // #10: tunnel entry
    samples.push((0.0, TUNNEL_ENTRY.0, TUNNEL_ENTRY.1, 5.0, 350.0, Some(50.0)));
    // #11: tunnel exit
    samples.push((10.0, TUNNEL_EXIT.0, TUNNEL_EXIT.1, 15.0, 10.0, Some(60.0)));
    for i in 1..=4 {
        let k = i as f64;
        samples.push((
            10.0 + k,
            TUNNEL_EXIT.0 + k * 2.0E-5,
            TUNNEL_EXIT.1 + k * 1.2E-4,
            15.0,
            10.0,
            None,
        ));
    }
    // #16, after a 30 s outage
    samples.push((44.0, 116.3020, 39.9110, 12.0, 20.0, None));
    samples.push((45.0, 116.3021, 39.9111, 12.0, 20.0, None));
    samples
}

pub fn reference_records() -> Vec<TrajectoryRecord> {
    reference_samples()
        .into_iter()
        .enumerate()
        .map(|(index, (t_s, lon, lat, speed, heading, elevation))| {
            TrajectoryRecord::new(
                index as u64,
                epoch(t_s),
                PlanarPoint::new(lon, lat, Datum::WGS84),
                speed,
                heading,
                elevation,
            )
        })
        .collect()
}

/// [MemoryStore] holding [REFERENCE_TRACK] and [OTHER_TRACK]
pub fn reference_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert_track(REFERENCE_TRACK, reference_records())
        .unwrap();
    store.insert_track(OTHER_TRACK, reference_records()).unwrap();
    store
}

/// Straight tunnel crossing (#10 -> #11)
pub fn tunnel_request(interval_s: f64) -> GapFillRequest {
    let entry = PlanarPoint::new(TUNNEL_ENTRY.0, TUNNEL_ENTRY.1, Datum::WGS84);
    let exit = PlanarPoint::new(TUNNEL_EXIT.0, TUNNEL_EXIT.1, Datum::WGS84);
    GapFillRequest {
        track: REFERENCE_TRACK,
        start_index: 10,
        end_index: 11,
        curve: CurveDefinition::straight(&entry, &exit),
        interval: Duration::from_seconds(interval_s),
    }
}

/// Curved tunnel crossing (#10 -> #11), bending east
pub fn curved_tunnel_request(interval_s: f64) -> GapFillRequest {
    let mut request = tunnel_request(interval_s);
    let entry = PlanarPoint::new(TUNNEL_ENTRY.0, TUNNEL_ENTRY.1, Datum::WGS84);
    let exit = PlanarPoint::new(TUNNEL_EXIT.0, TUNNEL_EXIT.1, Datum::WGS84);
    request.curve = CurveDefinition::with_control_points(
        &entry,
        &exit,
        vec![ControlPoint::smooth(
            116.3012,
            39.9001,
            Handle::new(0.0002, 0.0002),
        )],
    );
    request
}
