use crate::math::GeoMath;
use crate::model::point::GeoPoint;
use crate::telemetry::LogManager;
use serde::{Deserialize, Serialize};

/// Geofence radius applied when a record does not carry one.
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 100.0;

pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";

/// NFT record exactly as it arrives from the discovery backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNftRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "collection_name")]
    pub collection: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    pub distance: Option<f64>,
    pub radius: Option<f64>,
    pub image_url: Option<String>,
    pub ipfs_hash: Option<String>,
    pub server_url: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("coordinate ({latitude}, {longitude}) out of range")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("negative distance {0}")]
    NegativeDistance(f64),
    #[error("negative radius {0}")]
    NegativeRadius(f64),
}

/// Where the artwork for a record can be fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    Direct { url: String },
    Ipfs { gateway: String, cid: String },
}

impl ImageSource {
    pub fn url(&self) -> String {
        match self {
            ImageSource::Direct { url } => url.clone(),
            ImageSource::Ipfs { gateway, cid } => {
                format!("{}/ipfs/{}", gateway.trim_end_matches('/'), cid)
            }
        }
    }

    fn from_raw(raw: &RawNftRecord) -> Option<Self> {
        if let Some(cid) = non_blank(&raw.ipfs_hash) {
            let gateway = non_blank(&raw.server_url)
                .unwrap_or(DEFAULT_IPFS_GATEWAY)
                .to_string();
            return Some(ImageSource::Ipfs {
                gateway,
                cid: cid.to_string(),
            });
        }
        non_blank(&raw.image_url).map(|url| ImageSource::Direct {
            url: url.to_string(),
        })
    }
}

/// Validated NFT record used by every view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftRecord {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub location: GeoPoint,
    pub reported_distance_m: Option<f64>,
    pub radius_m: f64,
    pub image: Option<ImageSource>,
}

impl NftRecord {
    /// Distance to the record: computed when the observer is known, otherwise
    /// whatever the backend reported.
    pub fn distance_from(&self, observer: Option<GeoPoint>) -> Option<f64> {
        match observer {
            Some(origin) => Some(GeoMath::distance(origin, self.location)),
            None => self.reported_distance_m,
        }
    }
}

impl TryFrom<RawNftRecord> for NftRecord {
    type Error = RecordError;

    fn try_from(raw: RawNftRecord) -> Result<Self, Self::Error> {
        let id = non_blank(&raw.id)
            .ok_or(RecordError::MissingField("id"))?
            .to_string();
        let latitude = raw.latitude.ok_or(RecordError::MissingField("latitude"))?;
        let longitude = raw.longitude.ok_or(RecordError::MissingField("longitude"))?;
        let location = GeoPoint::new(latitude, longitude);
        if !location.is_valid() {
            return Err(RecordError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        let reported_distance_m = match raw.distance {
            Some(d) if d < 0.0 || d.is_nan() => return Err(RecordError::NegativeDistance(d)),
            other => other,
        };
        let radius_m = match raw.radius {
            Some(r) if r < 0.0 || r.is_nan() => return Err(RecordError::NegativeRadius(r)),
            Some(r) => r,
            None => DEFAULT_GEOFENCE_RADIUS_M,
        };

        let image = ImageSource::from_raw(&raw);
        let name = non_blank(&raw.name).unwrap_or(&id).to_string();
        let collection = non_blank(&raw.collection).unwrap_or("Unknown").to_string();

        Ok(Self {
            id,
            name,
            collection,
            location,
            reported_distance_m,
            radius_m,
            image,
        })
    }
}

/// A raw record that failed validation, with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub index: usize,
    pub reason: RecordError,
}

#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub accepted: Vec<NftRecord>,
    pub rejected: Vec<Rejection>,
}

/// Validates records at the presentation boundary. Bad entries are dropped
/// and logged, never passed on.
pub fn validate_batch(raw: Vec<RawNftRecord>) -> RecordBatch {
    let logger = LogManager::for_component("records");
    let mut batch = RecordBatch::default();

    for (index, record) in raw.into_iter().enumerate() {
        match NftRecord::try_from(record) {
            Ok(record) => batch.accepted.push(record),
            Err(reason) => {
                logger.warn(&format!("dropping record #{index}: {reason}"));
                batch.rejected.push(Rejection { index, reason });
            }
        }
    }

    logger.record(&format!(
        "validated {} records ({} rejected)",
        batch.accepted.len(),
        batch.rejected.len()
    ));
    batch
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, lat: f64, lon: f64) -> RawNftRecord {
        RawNftRecord {
            id: Some(id.into()),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        }
    }

    #[test]
    fn raw_record_parses_backend_aliases() {
        let json = r#"{"id":"7","collection_name":"Drops","lat":10.5,"lng":-3.0,"distance":42.0}"#;
        let raw: RawNftRecord = serde_json::from_str(json).unwrap();
        let record = NftRecord::try_from(raw).unwrap();
        assert_eq!(record.collection, "Drops");
        assert_eq!(record.location, GeoPoint::new(10.5, -3.0));
        assert_eq!(record.reported_distance_m, Some(42.0));
        assert_eq!(record.radius_m, DEFAULT_GEOFENCE_RADIUS_M);
        assert_eq!(record.name, "7");
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        let mut record = raw("a", 0.0, 0.0);
        record.longitude = None;
        assert_eq!(
            NftRecord::try_from(record),
            Err(RecordError::MissingField("longitude"))
        );
    }

    #[test]
    fn out_of_range_and_negative_values_are_rejected() {
        assert!(matches!(
            NftRecord::try_from(raw("a", 95.0, 0.0)),
            Err(RecordError::InvalidCoordinate { .. })
        ));

        let mut negative = raw("b", 0.0, 0.0);
        negative.distance = Some(-1.0);
        assert_eq!(
            NftRecord::try_from(negative),
            Err(RecordError::NegativeDistance(-1.0))
        );

        let mut bad_radius = raw("c", 0.0, 0.0);
        bad_radius.radius = Some(-5.0);
        assert_eq!(
            NftRecord::try_from(bad_radius),
            Err(RecordError::NegativeRadius(-5.0))
        );
    }

    #[test]
    fn ipfs_hash_takes_precedence_over_direct_url() {
        let mut record = raw("a", 0.0, 0.0);
        record.image_url = Some("https://example.com/a.png".into());
        record.ipfs_hash = Some("bafyhash".into());
        record.server_url = Some("https://gateway.example/".into());
        let record = NftRecord::try_from(record).unwrap();
        assert_eq!(
            record.image.unwrap().url(),
            "https://gateway.example/ipfs/bafyhash"
        );
    }

    #[test]
    fn ipfs_falls_back_to_public_gateway() {
        let mut record = raw("a", 0.0, 0.0);
        record.ipfs_hash = Some("cid".into());
        let record = NftRecord::try_from(record).unwrap();
        assert_eq!(record.image.unwrap().url(), "https://ipfs.io/ipfs/cid");
    }

    #[test]
    fn distance_prefers_observer_over_reported_value() {
        let mut record = raw("a", 0.0, 1.0);
        record.distance = Some(5.0);
        let record = NftRecord::try_from(record).unwrap();
        assert_eq!(record.distance_from(None), Some(5.0));
        let computed = record.distance_from(Some(GeoPoint::new(0.0, 0.0))).unwrap();
        assert!((computed - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn batch_keeps_index_of_rejected_entries() {
        let batch = validate_batch(vec![
            raw("ok", 1.0, 1.0),
            RawNftRecord::default(),
            raw("also-ok", 2.0, 2.0),
        ]);
        assert_eq!(batch.accepted.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 1);
        assert_eq!(batch.rejected[0].reason, RecordError::MissingField("id"));
    }
}
