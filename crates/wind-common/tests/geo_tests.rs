//! Property-style tests for longitude arithmetic and model time conversion.

use chrono::{Duration, TimeZone, Utc};
use wind_common::geo::{canonicalize_longitude, longitude_distance, Window};
use wind_common::time::{
    datetime_to_posix, datetime_to_timestamp, posix_to_datetime, timestamp_to_datetime,
};
use wind_common::WindError;

fn sample_longitudes() -> Vec<f64> {
    let mut values = Vec::new();
    let mut x = -1085.25;
    while x <= 1085.25 {
        values.push(x);
        x += 17.75;
    }
    values.extend_from_slice(&[-0.0, 0.0, 359.999, 360.0, -360.0, 180.0, -180.0, 1e-12, -1e-12]);
    values
}

// ============================================================================
// canonicalize_longitude
// ============================================================================

#[test]
fn test_canonicalize_range() {
    for x in sample_longitudes() {
        let c = canonicalize_longitude(x);
        assert!((0.0..360.0).contains(&c), "{} -> {}", x, c);
    }
}

#[test]
fn test_canonicalize_idempotent() {
    for x in sample_longitudes() {
        let once = canonicalize_longitude(x);
        assert_eq!(canonicalize_longitude(once), once, "input {}", x);
    }
}

#[test]
fn test_canonicalize_preserves_canonical_values() {
    for x in [0.0, 0.5, 139.0, 180.0, 359.5] {
        assert_eq!(canonicalize_longitude(x), x);
    }
}

// ============================================================================
// longitude_distance
// ============================================================================

#[test]
fn test_distance_symmetric_and_bounded() {
    let values = sample_longitudes();
    for &a in &values {
        for &b in &values {
            let ab = longitude_distance(a, b);
            let ba = longitude_distance(b, a);
            assert!((ab - ba).abs() < 1e-9, "d({}, {}) = {} vs {}", a, b, ab, ba);
            assert!((0.0..=180.0).contains(&ab), "d({}, {}) = {}", a, b, ab);
        }
    }
}

#[test]
fn test_distance_matches_plain_formula_for_canonical_inputs() {
    for (a, b) in [(10.0_f64, 20.0_f64), (357.0, 2.0), (0.0, 359.5), (90.0, 270.0)] {
        let direct = (a - b).abs();
        let expected = direct.min(360.0 - direct);
        assert!((longitude_distance(a, b) - expected).abs() < 1e-12);
    }
}

#[test]
fn test_distance_zero_for_same_point() {
    assert_eq!(longitude_distance(42.0, 42.0), 0.0);
    assert_eq!(longitude_distance(0.0, 360.0), 0.0);
}

// ============================================================================
// Window validation
// ============================================================================

#[test]
fn test_area_of_interest_accepts_edges() {
    assert!(Window::area_of_interest(90.0, 0.5, 0.0, 180.0).is_ok());
    assert!(Window::area_of_interest(-90.0, 0.5, 359.0, 0.5).is_ok());
}

#[test]
fn test_area_of_interest_rejects_latitude_out_of_range() {
    let err = Window::area_of_interest(91.0, 5.0, 0.0, 5.0).unwrap_err();
    assert!(matches!(err, WindError::Configuration(ref m) if m.contains("91")));
}

#[test]
fn test_area_of_interest_rejects_wide_longitude() {
    let err = Window::area_of_interest(0.0, 5.0, 0.0, 180.5).unwrap_err();
    assert!(matches!(err, WindError::Configuration(_)));
}

#[test]
fn test_area_of_interest_rejects_nan() {
    assert!(Window::area_of_interest(f64::NAN, 5.0, 0.0, 5.0).is_err());
}

#[test]
fn test_window_membership_across_seam() {
    let w = Window::area_of_interest(0.0, 5.0, 2.0, 5.0).unwrap();
    assert!(w.contains_longitude(357.0));
    assert!(w.contains_longitude(0.0));
    assert!(w.contains_longitude(7.0));
    assert!(!w.contains_longitude(356.5));
    assert!(!w.contains_longitude(7.5));
}

// ============================================================================
// Time conversions
// ============================================================================

#[test]
fn test_posix_round_trip() {
    let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    for step in 0..500i64 {
        let posix = datetime_to_posix(&(start + Duration::seconds(step * 86_413 + 7)));
        let dt = posix_to_datetime(posix).unwrap();
        let model = datetime_to_timestamp(&dt);
        let back = timestamp_to_datetime(model).unwrap();
        assert!(
            (datetime_to_posix(&back) - posix).abs() <= 1,
            "posix {} -> model {} -> {}",
            posix,
            model,
            datetime_to_posix(&back)
        );
    }
}

#[test]
fn test_synoptic_hours_round_trip_exactly() {
    let start = Utc.with_ymd_and_hms(2017, 11, 11, 0, 0, 0).unwrap();
    for hour in 0..240 {
        let dt = start + Duration::hours(hour);
        let model = datetime_to_timestamp(&dt);
        assert_eq!(timestamp_to_datetime(model).unwrap(), dt);
    }
}

#[test]
fn test_epoch_offset() {
    let dt = timestamp_to_datetime(2.0).unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap());
}
