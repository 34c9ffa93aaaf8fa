use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use scoutcore::map::MapConfig;
use scoutcore::math::ZoomHeuristic;
use scoutcore::model::GeoPoint;
use scoutcore::radar::{RadarConfig, ViewportLimits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Optional mapping-library settings. The token is only ever read from here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub access_token: Option<String>,
    pub style: Option<String>,
}

impl MapSettings {
    pub fn to_map_config(&self) -> anyhow::Result<MapConfig> {
        MapConfig::new(self.access_token.as_deref(), self.style.as_deref())
            .context("building map configuration")
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Observer position; `None` runs the radar in direction-unknown mode.
    pub observer: Option<GeoPoint>,
    pub radar: RadarConfig,
    pub viewport: ViewportLimits,
    pub zoom: ZoomHeuristic,
    pub generator: GeneratorConfig,
    pub map: Option<MapSettings>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .radar
            .validate()
            .with_context(|| format!("validating radar section of {}", path_ref.display()))?;
        config
            .viewport
            .validate()
            .with_context(|| format!("validating viewport section of {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(observer: Option<GeoPoint>, count: usize, seed: u64) -> Self {
        let mut config = Self {
            observer,
            ..Default::default()
        };
        config.generator.count = count;
        config.generator.seed = seed;
        if let Some(observer) = observer {
            config.generator.center = observer;
        }
        config
    }

    /// `None` when no map section is present; an error when one is present
    /// but unusable.
    pub fn map_config(&self) -> anyhow::Result<Option<MapConfig>> {
        self.map
            .as_ref()
            .map(MapSettings::to_map_config)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_centres_generator_on_observer() {
        let observer = GeoPoint::new(48.85, 2.35);
        let cfg = WorkflowConfig::from_args(Some(observer), 5, 3);
        assert_eq!(cfg.generator.center, observer);
        assert_eq!(cfg.generator.count, 5);
        assert_eq!(cfg.radar.max_radius_px, 50.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"observer:\n  latitude: 51.5\n  longitude: -0.12\nradar:\n  scale_divisor: 500.0\ngenerator:\n  count: 3\n  seed: 11\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.observer, Some(GeoPoint::new(51.5, -0.12)));
        assert_eq!(cfg.radar.scale_divisor, 500.0);
        assert_eq!(cfg.radar.max_radius_px, 50.0);
        assert_eq!(cfg.generator.count, 3);
        assert_eq!(cfg.zoom.radius_framing_zoom(60_000.0), 9);
    }

    #[test]
    fn config_load_rejects_bad_radar_section() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"radar:\n  scale_divisor: 0.0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn config_load_rejects_inverted_viewport() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"viewport:\n  min_zoom: 4.0\n  max_zoom: 2.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn map_section_without_token_is_an_error() {
        let mut cfg = WorkflowConfig::default();
        assert!(cfg.map_config().unwrap().is_none());
        cfg.map = Some(MapSettings::default());
        assert!(cfg.map_config().is_err());
        cfg.map = Some(MapSettings {
            access_token: Some("pk.abc".into()),
            style: None,
        });
        assert_eq!(cfg.map_config().unwrap().unwrap().style, "streets");
    }
}
