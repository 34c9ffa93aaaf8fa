use crate::math::{GeoMath, ZoomHeuristic};
use crate::model::{GeoPoint, NftRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Observer,
    Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: GeoPoint,
}

/// Everything a mapping backend needs to draw the distance view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    pub camera: GeoPoint,
    pub zoom: u8,
    pub distance_m: Option<f64>,
    pub label: String,
    pub in_range: bool,
    pub geofence_radius_m: f64,
    pub markers: Vec<MapMarker>,
}

/// Frames an observer and a target NFT on the map.
#[derive(Debug, Clone, Default)]
pub struct DistanceView {
    heuristic: ZoomHeuristic,
}

impl DistanceView {
    pub fn new(heuristic: ZoomHeuristic) -> Self {
        Self { heuristic }
    }

    pub fn frame(&self, observer: Option<GeoPoint>, target: &NftRecord) -> MapFrame {
        let mut markers = vec![MapMarker {
            kind: MarkerKind::Target,
            position: target.location,
        }];

        let (camera, zoom, distance_m) = match observer {
            Some(origin) => {
                markers.push(MapMarker {
                    kind: MarkerKind::Observer,
                    position: origin,
                });
                let distance = GeoMath::distance(origin, target.location);
                (
                    GeoMath::midpoint(origin, target.location),
                    self.heuristic.two_point_framing_zoom(distance),
                    Some(distance),
                )
            }
            None => (
                target.location,
                self.heuristic.radius_framing_zoom(target.radius_m),
                target.reported_distance_m,
            ),
        };

        MapFrame {
            camera,
            zoom,
            distance_m,
            label: distance_label(distance_m),
            in_range: distance_m.is_some_and(|d| d <= target.radius_m),
            geofence_radius_m: target.radius_m,
            markers,
        }
    }
}

pub fn distance_label(distance_m: Option<f64>) -> String {
    match distance_m {
        Some(d) if d.is_finite() => format!("{:.0}m away", d.round()),
        _ => "distance unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNftRecord;

    fn target(radius: f64, distance: Option<f64>) -> NftRecord {
        NftRecord::try_from(RawNftRecord {
            id: Some("drop-1".into()),
            latitude: Some(0.0),
            longitude: Some(0.0),
            radius: Some(radius),
            distance,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn observer_frames_both_points() {
        let view = DistanceView::default();
        let observer = GeoPoint::new(0.0, 0.01);
        let frame = view.frame(Some(observer), &target(2_000.0, None));

        assert_eq!(frame.zoom, 12);
        assert_eq!(frame.label, "1112m away");
        assert!(frame.in_range);
        assert_eq!(frame.markers.len(), 2);
        assert!((frame.camera.longitude - 0.005).abs() < 1e-9);
    }

    #[test]
    fn observer_outside_geofence_is_not_in_range() {
        let frame = DistanceView::default().frame(Some(GeoPoint::new(0.0, 0.01)), &target(100.0, None));
        assert!(!frame.in_range);
    }

    #[test]
    fn without_observer_camera_follows_geofence() {
        let frame = DistanceView::default().frame(None, &target(6_000.0, Some(42.4)));
        assert_eq!(frame.camera, GeoPoint::new(0.0, 0.0));
        assert_eq!(frame.zoom, 12);
        assert_eq!(frame.label, "42m away");
        assert_eq!(frame.markers.len(), 1);
    }

    #[test]
    fn unknown_distance_has_explicit_label() {
        let frame = DistanceView::default().frame(None, &target(50.0, None));
        assert_eq!(frame.label, "distance unknown");
        assert!(!frame.in_range);
        assert_eq!(frame.zoom, 16);
    }
}
