use shared::{Coordinate, Marker, RenderDocument, RouteLayer};

use crate::amenities::padded_bounds;

const PRIMARY_COLOR: &str = "#22c55e";
const ALTERNATIVE_COLOR: &str = "#3b82f6";
const START_COLOR: &str = "#22c55e";
const TURNAROUND_COLOR: &str = "#ef4444";
const FOUNTAIN_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStyle {
    Primary,
    Alternative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Start,
    Turnaround,
    Fountain,
}

/// Rendering surface owned by one planning session.
///
/// The session drives calls in a fixed order: clear, draw, start marker,
/// turnaround marker, fit bounds, amenity markers. `clear_route_layers`
/// completes before it returns; no layer from a previous pass may survive a
/// new draw.
pub trait MapRenderer: Send {
    fn clear_route_layers(&mut self);
    fn draw_route(&mut self, geometry: &[Coordinate], style: RouteStyle);
    fn place_marker(&mut self, coordinate: Coordinate, style: MarkerStyle, label: &str);
    fn fit_bounds(&mut self, coords: &[Coordinate]);
}

/// Renderer for the HTTP shell: records every operation into a
/// [`RenderDocument`] a browser map replays in order.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    document: RenderDocument,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &RenderDocument {
        &self.document
    }
}

impl MapRenderer for GeoJsonRenderer {
    fn clear_route_layers(&mut self) {
        self.document = RenderDocument::default();
    }

    fn draw_route(&mut self, geometry: &[Coordinate], style: RouteStyle) {
        let color = match style {
            RouteStyle::Primary => PRIMARY_COLOR,
            RouteStyle::Alternative => ALTERNATIVE_COLOR,
        };
        // Solid outbound line plus a dashed return line over the same
        // geometry, the way the web map drew out-and-back routes.
        self.document.layers.push(RouteLayer {
            coordinates: geometry.to_vec(),
            color: color.to_string(),
            dashed: false,
        });
        self.document.layers.push(RouteLayer {
            coordinates: geometry.to_vec(),
            color: color.to_string(),
            dashed: true,
        });
    }

    fn place_marker(&mut self, coordinate: Coordinate, style: MarkerStyle, label: &str) {
        let (color, scale) = match style {
            MarkerStyle::Start => (START_COLOR, 1.0),
            MarkerStyle::Turnaround => (TURNAROUND_COLOR, 1.0),
            MarkerStyle::Fountain => (FOUNTAIN_COLOR, 0.7),
        };
        self.document.markers.push(Marker {
            coordinate,
            color: color.to_string(),
            scale,
            label: label.to_string(),
        });
    }

    fn fit_bounds(&mut self, coords: &[Coordinate]) {
        self.document.bounds = padded_bounds(coords);
    }
}
