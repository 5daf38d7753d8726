use serde::{Deserialize, Serialize};

/// Exact statute-mile factor used for every conversion, both directions.
pub const MILE_IN_KM: f64 = 1.60934;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

/// A non-negative scalar carrying its unit explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn miles(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Miles,
        }
    }

    pub fn kilometers(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Kilometers,
        }
    }

    pub fn as_miles(&self) -> f64 {
        match self.unit {
            DistanceUnit::Miles => self.value,
            DistanceUnit::Kilometers => self.value / MILE_IN_KM,
        }
    }

    pub fn as_kilometers(&self) -> f64 {
        match self.unit {
            DistanceUnit::Miles => self.value * MILE_IN_KM,
            DistanceUnit::Kilometers => self.value,
        }
    }

    pub fn as_meters(&self) -> f64 {
        self.as_kilometers() * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationPreference {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinate,
    pub distance_from_user: Distance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterFountain {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinate,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    LocatingParking,
    AwaitingSelection,
    Generating,
    Ready,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// One polyline the map should draw, in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLayer {
    pub coordinates: Vec<Coordinate>,
    pub color: String,
    pub dashed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub color: String,
    pub scale: f64,
    pub label: String,
}

/// Replayable record of one rendering pass: layers and markers in draw
/// order, plus the bounds the map viewport should fit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderDocument {
    pub layers: Vec<RouteLayer>,
    pub markers: Vec<Marker>,
    pub bounds: Option<RouteBounds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteView {
    pub geometry: Vec<Coordinate>,
    /// One-way distance, starting point to turnaround point.
    pub distance_miles: f64,
    /// Round-trip distance of the out-and-back route.
    pub total_distance_miles: f64,
    pub elevation_gain_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlanView {
    pub primary: RouteView,
    pub alternatives: Vec<RouteView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: SessionPhase,
    pub loading: bool,
    pub error: Option<String>,
    pub target_distance_miles: f64,
    pub elevation_preference: ElevationPreference,
    pub parking_lots: Vec<ParkingLot>,
    pub selected_lot_id: Option<String>,
    pub routes: Option<RoutePlanView>,
    pub water_fountains: Vec<WaterFountain>,
    pub render: RenderDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub location: String,
    #[serde(default = "default_target_distance_miles")]
    pub target_distance_miles: f64,
    #[serde(default = "default_elevation_preference")]
    pub elevation_preference: ElevationPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDistanceRequest {
    pub target_distance_miles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPreferenceRequest {
    pub elevation_preference: ElevationPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectParkingRequest {
    pub lot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowAlternativeRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpxResponse {
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_f: Option<i32>,
    pub humidity: Option<f64>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

pub fn default_target_distance_miles() -> f64 {
    2.0
}

pub fn default_elevation_preference() -> ElevationPreference {
    ElevationPreference::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_conversion_uses_exact_factor() {
        let two_miles = Distance::miles(2.0);
        assert_eq!(two_miles.as_kilometers(), 2.0 * MILE_IN_KM);
        assert_eq!(two_miles.as_meters(), 2.0 * MILE_IN_KM * 1000.0);

        let five_km = Distance::kilometers(5.0);
        assert_eq!(five_km.as_miles(), 5.0 / MILE_IN_KM);
    }

    #[test]
    fn distance_accessor_is_identity_for_own_unit() {
        assert_eq!(Distance::miles(3.5).as_miles(), 3.5);
        assert_eq!(Distance::kilometers(3.5).as_kilometers(), 3.5);
    }
}
