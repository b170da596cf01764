use pawtrack::{
    position::{GeoPoint, DEFAULT_LOCATION},
    walk::WalkRecord,
};

/// Degrees of slack around a route so its ends stay off the border
const ROUTE_MARGIN_DEG: f64 = 0.0005;

/// Longitude (x) and latitude (y) bounds that frame `path`.
/// An empty path frames the default location.
pub fn route_bounds(path: &[GeoPoint]) -> ([f64; 2], [f64; 2]) {
    let Some(first) = path.first() else {
        return (
            [
                DEFAULT_LOCATION.lng - ROUTE_MARGIN_DEG,
                DEFAULT_LOCATION.lng + ROUTE_MARGIN_DEG,
            ],
            [
                DEFAULT_LOCATION.lat - ROUTE_MARGIN_DEG,
                DEFAULT_LOCATION.lat + ROUTE_MARGIN_DEG,
            ],
        );
    };

    let (mut min_lng, mut max_lng) = (first.lng, first.lng);
    let (mut min_lat, mut max_lat) = (first.lat, first.lat);
    for p in path {
        min_lng = min_lng.min(p.lng);
        max_lng = max_lng.max(p.lng);
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
    }

    (
        [min_lng - ROUTE_MARGIN_DEG, max_lng + ROUTE_MARGIN_DEG],
        [min_lat - ROUTE_MARGIN_DEG, max_lat + ROUTE_MARGIN_DEG],
    )
}

/// Up to `limit` of the newest walks as (MM-DD, minutes) bars, oldest first
pub fn recent_walk_bars(records: &[WalkRecord], limit: usize) -> Vec<(String, u64)> {
    let mut bars: Vec<(String, u64)> = records
        .iter()
        .take(limit)
        .map(|r| (r.date.format("%m-%d").to_string(), r.duration_minutes))
        .collect();
    bars.reverse();
    bars
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn walk(day: u32, minutes: u64) -> WalkRecord {
        WalkRecord::new(
            NaiveDate::from_ymd_opt(2023, 4, day).unwrap(),
            minutes,
            1.0,
            vec![],
        )
    }

    #[test]
    fn test_route_bounds_empty_frames_default_location() {
        let (x, y) = route_bounds(&[]);
        assert!(x[0] < DEFAULT_LOCATION.lng && DEFAULT_LOCATION.lng < x[1]);
        assert!(y[0] < DEFAULT_LOCATION.lat && DEFAULT_LOCATION.lat < y[1]);
    }

    #[test]
    fn test_route_bounds_cover_every_point() {
        let path = [
            GeoPoint::new(37.0, 127.0),
            GeoPoint::new(37.2, 126.9),
            GeoPoint::new(36.9, 127.1),
        ];
        let (x, y) = route_bounds(&path);
        for p in &path {
            assert!(x[0] < p.lng && p.lng < x[1]);
            assert!(y[0] < p.lat && p.lat < y[1]);
        }
    }

    #[test]
    fn test_recent_walk_bars_are_chronological() {
        let records = [walk(5, 10), walk(4, 20), walk(3, 30)];
        let bars = recent_walk_bars(&records, 2);
        assert_eq!(
            bars,
            vec![("04-04".to_string(), 20), ("04-05".to_string(), 10)]
        );
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.24), "1.2");
        assert_eq!(format_label(3.4), "3.4");
    }
}
