use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::models::RouteCandidate;
use shared::Coordinate;

#[derive(Debug, thiserror::Error)]
pub enum GpxExportError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

/// Encode a route's full out-and-back path as a base64 GPX 1.1 document.
pub fn encode_route_as_gpx(route: &RouteCandidate) -> Result<String, GpxExportError> {
    encode_path(&route.out_and_back_path())
}

fn encode_path(path: &[Coordinate]) -> Result<String, GpxExportError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("outandback".into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some("outandback".into()),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    for waypoint in path.iter().map(to_waypoint) {
        segment.points.push(waypoint);
    }
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lon, coord.lat))
}
