use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
/// Average dog-walking pace in meters per second
const WALKING_PACE_MPS: f64 = 1.3;

/// Seoul City Hall, where the simulated walker starts
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint::new(37.5665, 126.9780);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance using the haversine formula
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Move `meters` along `heading` (radians clockwise from north)
    pub fn offset(&self, meters: f64, heading: f64) -> GeoPoint {
        let d_lat = meters * heading.cos() / METERS_PER_DEGREE_LAT;
        let d_lng = meters * heading.sin() / (METERS_PER_DEGREE_LAT * self.lat.to_radians().cos());
        GeoPoint::new(self.lat + d_lat, self.lng + d_lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(v: (f64, f64)) -> Self {
        GeoPoint::new(v.0, v.1)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(p: GeoPoint) -> Self {
        (p.lat, p.lng)
    }
}

/// Total length of a path in kilometers
pub fn path_length_km(path: &[GeoPoint]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| a.distance_km(b))
        .sum()
}

/// Supplies positions while a walk is running
pub trait PositionSource {
    /// Position after `elapsed_secs` seconds of walking, or None when there
    /// is no new sample for that second.
    fn next_position(&mut self, elapsed_secs: u64) -> Option<GeoPoint>;
}

/// Random-heading walker drifting at walking pace from a start point
#[derive(Debug)]
pub struct SimulatedWalker {
    start: GeoPoint,
    current: GeoPoint,
    heading: f64,
    sample_every_secs: u64,
    rng: StdRng,
}

impl SimulatedWalker {
    pub fn new(start: GeoPoint, sample_every_secs: u64) -> Self {
        Self::with_rng(start, sample_every_secs, StdRng::from_entropy())
    }

    pub fn with_seed(start: GeoPoint, sample_every_secs: u64, seed: u64) -> Self {
        Self::with_rng(start, sample_every_secs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(start: GeoPoint, sample_every_secs: u64, mut rng: StdRng) -> Self {
        let heading = rng.gen_range(0.0..std::f64::consts::TAU);
        Self {
            start,
            current: start,
            heading,
            sample_every_secs: sample_every_secs.max(1),
            rng,
        }
    }
}

impl PositionSource for SimulatedWalker {
    fn next_position(&mut self, elapsed_secs: u64) -> Option<GeoPoint> {
        if elapsed_secs == 0 {
            // every walk starts back at the start point
            self.current = self.start;
            return Some(self.current);
        }
        if elapsed_secs % self.sample_every_secs != 0 {
            return None;
        }

        self.heading += self.rng.gen_range(-0.5..0.5);
        let meters = WALKING_PACE_MPS * self.sample_every_secs as f64;
        self.current = self.current.offset(meters, self.heading);
        Some(self.current)
    }
}
