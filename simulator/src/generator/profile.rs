use anyhow::{ensure, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};
use scoutcore::math::GeoMath;
use scoutcore::model::{GeoPoint, RawNftRecord};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic field of NFT drops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub center: GeoPoint,
    pub count: usize,
    pub max_distance_m: f64,
    pub radius_m: f64,
    pub seed: u64,
    pub collections: Vec<String>,
    /// Attach a backend-style `distance` field to each record.
    pub report_distance: bool,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(40.7580, -73.9855),
            count: 12,
            max_distance_m: 4_000.0,
            radius_m: 150.0,
            seed: 0,
            collections: vec!["Street Relics".into(), "Skyline Keys".into()],
            report_distance: true,
            description: None,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    fn normalized_count(&self) -> usize {
        self.count.max(1)
    }
}

/// Upper bound on `count`; requests come in over the bridge.
pub const MAX_DROPS: usize = 10_000;

/// Scatters drops around `center` at uniform bearings and distances.
pub fn build_drop_field(config: &GeneratorConfig) -> anyhow::Result<Vec<RawNftRecord>> {
    GeoPoint::checked(config.center.latitude, config.center.longitude)
        .context("generator center is not a valid coordinate")?;
    ensure!(
        config.max_distance_m.is_finite() && config.max_distance_m > 0.0,
        "generator max_distance_m must be positive, got {}",
        config.max_distance_m
    );
    ensure!(
        config.count <= MAX_DROPS,
        "generator count {} exceeds the limit of {}",
        config.count,
        MAX_DROPS
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let count = config.normalized_count();
    let mut records = Vec::with_capacity(count);

    for index in 0..count {
        let bearing = rng.gen_range(0.0..360.0);
        let distance = rng.gen_range(0.0..config.max_distance_m);
        let location = GeoMath::destination(config.center, bearing, distance);
        let collection = if config.collections.is_empty() {
            None
        } else {
            Some(config.collections[index % config.collections.len()].clone())
        };

        records.push(RawNftRecord {
            id: Some(format!("drop-{:03}", index + 1)),
            name: Some(format!("Drop #{}", index + 1)),
            collection,
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            distance: config.report_distance.then_some(distance),
            radius: Some(config.radius_m),
            ipfs_hash: Some(format!("bafy{:016x}", rng.gen::<u64>())),
            ..Default::default()
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_requested_count_within_range() {
        let config = GeneratorConfig {
            count: 40,
            max_distance_m: 1_000.0,
            seed: 7,
            ..Default::default()
        };
        let records = build_drop_field(&config).unwrap();
        assert_eq!(records.len(), 40);
        for record in &records {
            let point = GeoPoint::new(record.latitude.unwrap(), record.longitude.unwrap());
            assert!(GeoMath::distance(config.center, point) <= 1_000.5);
        }
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            seed: 99,
            ..Default::default()
        };
        let a = build_drop_field(&config).unwrap();
        let b = build_drop_field(&config).unwrap();
        assert_eq!(a[3].latitude, b[3].latitude);
        assert_eq!(a[3].ipfs_hash, b[3].ipfs_hash);
    }

    #[test]
    fn generator_rejects_invalid_center() {
        let config = GeneratorConfig {
            center: GeoPoint::new(120.0, 0.0),
            ..Default::default()
        };
        assert!(build_drop_field(&config).is_err());
    }

    #[test]
    fn generator_rejects_oversized_count() {
        let config = GeneratorConfig {
            count: MAX_DROPS + 1,
            ..Default::default()
        };
        assert!(build_drop_field(&config).is_err());

        let at_limit = GeneratorConfig {
            count: MAX_DROPS,
            ..Default::default()
        };
        assert_eq!(build_drop_field(&at_limit).unwrap().len(), MAX_DROPS);
    }

    #[test]
    fn collections_rotate_and_distance_is_optional() {
        let config = GeneratorConfig {
            count: 3,
            report_distance: false,
            collections: vec!["A".into(), "B".into()],
            ..Default::default()
        };
        let records = build_drop_field(&config).unwrap();
        assert_eq!(records[2].collection.as_deref(), Some("A"));
        assert!(records.iter().all(|r| r.distance.is_none()));
    }
}
