//! Planar datum conversions between the three reference frames
//! a trajectory point is materialized in.
use crate::{
    constants::{CALIBRATED_LATITUDE_DEG, CALIBRATED_LONGITUDE_DEG},
    error::Error,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod bd09;
pub mod gcj02;

/// Geodetic reference frame (datum).
#[allow(non_camel_case_types)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Datum {
    /// [Datum::WGS84] is the geodetic reference.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "wgs84"))]
    WGS84,
    /// [Datum::GCJ02] is offset from [Datum::WGS84]
    /// by empirical nonlinear polynomials.
    #[cfg_attr(feature = "serde", serde(alias = "gcj02"))]
    GCJ02,
    /// [Datum::BD09] is offset from [Datum::GCJ02]
    /// by a small rotation and scaling perturbation.
    #[cfg_attr(feature = "serde", serde(alias = "bd09"))]
    BD09,
}

impl Datum {
    /// All [Datum]s, reference first.
    pub const ALL: [Self; 3] = [Self::WGS84, Self::GCJ02, Self::BD09];
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WGS84 => write!(f, "WGS84"),
            Self::GCJ02 => write!(f, "GCJ02"),
            Self::BD09 => write!(f, "BD09"),
        }
    }
}

impl std::str::FromStr for Datum {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "wgs84" => Ok(Self::WGS84),
            "gcj02" => Ok(Self::GCJ02),
            "bd09" => Ok(Self::BD09),
            _ => Err(Error::UnknownDatum(s.to_string())),
        }
    }
}

/// True when (lon, lat) lies outside the area the offset model was
/// calibrated for. The region applies to WGS84 coordinates: no
/// correction applies to points located outside of it.
pub fn out_of_region(lon: f64, lat: f64) -> bool {
    let (lon_min, lon_max) = CALIBRATED_LONGITUDE_DEG;
    let (lat_min, lat_max) = CALIBRATED_LATITUDE_DEG;
    !(lon_min..=lon_max).contains(&lon) || !(lat_min..=lat_max).contains(&lat)
}

/// Converts (lon, lat) expressed in [Datum] `from` into [Datum] `to`.
/// Identity when both match. WGS84 <=> BD09 is composed through GCJ02.
pub fn convert(lon_lat: (f64, f64), from: Datum, to: Datum) -> (f64, f64) {
    let (lon, lat) = lon_lat;
    match (from, to) {
        (Datum::WGS84, Datum::GCJ02) => gcj02::from_wgs84(lon, lat),
        (Datum::GCJ02, Datum::WGS84) => gcj02::to_wgs84(lon, lat),
        (Datum::GCJ02, Datum::BD09) => bd09::from_gcj02(lon, lat),
        (Datum::BD09, Datum::GCJ02) => bd09::to_gcj02(lon, lat),
        (Datum::WGS84, Datum::BD09) => {
            convert(convert(lon_lat, from, Datum::GCJ02), Datum::GCJ02, to)
        },
        (Datum::BD09, Datum::WGS84) => {
            convert(convert(lon_lat, from, Datum::GCJ02), Datum::GCJ02, to)
        },
        _ => lon_lat,
    }
}

#[cfg(test)]
mod test {
    use super::{convert, out_of_region, Datum};
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rstest::*;
    use std::str::FromStr;

    #[rstest]
    #[case("WGS84", Datum::WGS84)]
    #[case("wgs-84", Datum::WGS84)]
    #[case(" gcj02", Datum::GCJ02)]
    #[case("BD09", Datum::BD09)]
    fn datum_parsing(#[case] s: &str, #[case] expected: Datum) {
        assert_eq!(Datum::from_str(s), Ok(expected));
        assert_eq!(Datum::from_str(&expected.to_string()), Ok(expected));
    }

    #[test]
    fn unknown_datum() {
        assert!(Datum::from_str("ed50").is_err());
    }

    #[test]
    fn identity() {
        for datum in Datum::ALL {
            assert_eq!(convert((116.4, 39.9), datum, datum), (116.4, 39.9));
        }
    }

    #[rstest]
    #[case(2.35, 48.85)]
    #[case(-74.0, 40.7)]
    #[case(151.2, -33.9)]
    #[case(116.4, 60.0)]
    fn outside_region_is_identity(#[case] lon: f64, #[case] lat: f64) {
        assert!(out_of_region(lon, lat));
        for from in Datum::ALL {
            for to in Datum::ALL {
                assert_eq!(convert((lon, lat), from, to), (lon, lat), "{}->{}", from, to);
            }
        }
    }

    #[test]
    fn composition() {
        let wgs = (121.4737, 31.2304);
        let direct = convert(wgs, Datum::WGS84, Datum::BD09);
        let gcj = convert(wgs, Datum::WGS84, Datum::GCJ02);
        let composed = convert(gcj, Datum::GCJ02, Datum::BD09);
        assert_eq!(direct, composed);

        // BD09 is further shifted (north east) from GCJ02
        assert!(direct.0 > gcj.0);
        assert!(direct.1 > gcj.1);
    }

    #[rstest]
    #[case(120.0, 55.826)]
    #[case(110.0, 55.827)]
    #[case(137.833, 35.0)]
    #[case(137.8346, 55.827)]
    #[case(72.0045, 30.0)]
    #[case(72.0041, 0.8294)]
    #[case(100.0, 0.83)]
    fn round_trips_near_region_edge(#[case] lon: f64, #[case] lat: f64) {
        assert!(!out_of_region(lon, lat));
        for from in Datum::ALL {
            // same location, expressed in `from`
            let (lon, lat) = convert((lon, lat), Datum::WGS84, from);
            for to in Datum::ALL {
                let there = convert((lon, lat), from, to);
                let back = convert(there, to, from);
                assert!(
                    (back.0 - lon).abs() < 1.0E-8 && (back.1 - lat).abs() < 1.0E-8,
                    "{}->{}->{} ({}, {}) returned ({}, {})",
                    from,
                    to,
                    from,
                    lon,
                    lat,
                    back.0,
                    back.1
                );
            }
        }
    }

    #[test]
    fn round_trips_inside_region() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let lon = rng.random_range(75.0..135.0);
            let lat = rng.random_range(18.0..53.0);
            assert!(!out_of_region(lon, lat));

            for from in Datum::ALL {
                for to in Datum::ALL {
                    let there = convert((lon, lat), from, to);
                    let back = convert(there, to, from);
                    assert!(
                        (back.0 - lon).abs() < 1.0E-5 && (back.1 - lat).abs() < 1.0E-5,
                        "{}->{}->{} ({}, {}) returned ({}, {})",
                        from,
                        to,
                        from,
                        lon,
                        lat,
                        back.0,
                        back.1
                    );
                }
            }
        }
    }
}
