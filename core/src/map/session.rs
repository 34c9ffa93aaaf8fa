use crate::map::view::MapFrame;
use crate::prelude::{ScoutError, ScoutResult};
use crate::telemetry::LogManager;

pub const DEFAULT_MAP_STYLE: &str = "streets";

/// Credentials and style for the external mapping library. Passed in
/// explicitly; nothing is read from the process environment.
#[derive(Clone, PartialEq)]
pub struct MapConfig {
    access_token: String,
    pub style: String,
}

impl MapConfig {
    pub fn new(access_token: Option<&str>, style: Option<&str>) -> ScoutResult<Self> {
        let access_token = access_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ScoutError::Config("map access token is missing".into()))?;
        Ok(Self {
            access_token: access_token.to_string(),
            style: style.unwrap_or(DEFAULT_MAP_STYLE).to_string(),
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for MapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapConfig")
            .field("access_token", &"<redacted>")
            .field("style", &self.style)
            .finish()
    }
}

/// Seam to the mapping library: creates a map instance, pushes frames to it,
/// and tears it down.
pub trait MapBackend {
    type Handle;

    fn create(&mut self, config: &MapConfig) -> ScoutResult<Self::Handle>;
    fn apply(&mut self, handle: &mut Self::Handle, frame: &MapFrame) -> ScoutResult<()>;
    fn release(&mut self, handle: Self::Handle);
}

/// Owns at most one backend handle. The handle is created on the first
/// render and released exactly once, on `close` or on drop.
pub struct MapSession<B: MapBackend> {
    backend: B,
    config: MapConfig,
    handle: Option<B::Handle>,
    logger: LogManager,
}

impl<B: MapBackend> MapSession<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            backend,
            config,
            handle: None,
            logger: LogManager::for_component("map"),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn render(&mut self, frame: &MapFrame) -> ScoutResult<()> {
        if self.handle.is_none() {
            let handle = self.backend.create(&self.config)?;
            self.logger
                .record(&format!("map attached (style {})", self.config.style));
            self.handle = Some(handle);
        }
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| ScoutError::Map("map handle unavailable".into()))?;
        self.logger
            .trace(&format!("frame at {} zoom {}", frame.camera, frame.zoom));
        self.backend.apply(handle, frame)
    }

    /// Releases the handle now and hands the backend back.
    pub fn close(mut self) -> B
    where
        B: Default,
    {
        self.detach();
        std::mem::take(&mut self.backend)
    }

    fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.release(handle);
            self.logger.record("map released");
        }
    }
}

impl<B: MapBackend> Drop for MapSession<B> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::view::DistanceView;
    use crate::model::{GeoPoint, NftRecord, RawNftRecord};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Events(Rc<RefCell<Vec<String>>>);

    impl MapBackend for Events {
        type Handle = u32;

        fn create(&mut self, config: &MapConfig) -> ScoutResult<u32> {
            if config.style == "broken" {
                return Err(ScoutError::Map("style not found".into()));
            }
            self.0.borrow_mut().push("create".into());
            Ok(7)
        }

        fn apply(&mut self, handle: &mut u32, frame: &MapFrame) -> ScoutResult<()> {
            self.0
                .borrow_mut()
                .push(format!("apply {} z{}", handle, frame.zoom));
            Ok(())
        }

        fn release(&mut self, handle: u32) {
            self.0.borrow_mut().push(format!("release {handle}"));
        }
    }

    fn frame() -> MapFrame {
        let target = NftRecord::try_from(RawNftRecord {
            id: Some("t".into()),
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Default::default()
        })
        .unwrap();
        DistanceView::default().frame(Some(GeoPoint::new(0.0, 0.0001)), &target)
    }

    fn config(style: &str) -> MapConfig {
        MapConfig::new(Some("pk.token"), Some(style)).unwrap()
    }

    #[test]
    fn missing_token_is_a_config_error() {
        assert!(matches!(MapConfig::new(None, None), Err(ScoutError::Config(_))));
        assert!(MapConfig::new(Some("   "), None).is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", config("streets"));
        assert!(!rendered.contains("pk.token"));
    }

    #[test]
    fn handle_is_created_once_and_released_on_drop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut session = MapSession::new(Events(log.clone()), config("streets"));
            assert!(!session.is_attached());
            session.render(&frame()).unwrap();
            session.render(&frame()).unwrap();
            assert!(session.is_attached());
        }
        assert_eq!(
            *log.borrow(),
            vec!["create", "apply 7 z16", "apply 7 z16", "release 7"]
        );
    }

    #[test]
    fn close_releases_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = MapSession::new(Events(log.clone()), config("streets"));
        session.render(&frame()).unwrap();
        let _backend = session.close();
        assert_eq!(log.borrow().last().map(String::as_str), Some("release 7"));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn failed_create_leaves_nothing_to_release() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut session = MapSession::new(Events(log.clone()), config("broken"));
            assert!(session.render(&frame()).is_err());
            assert!(!session.is_attached());
        }
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn session_that_never_rendered_releases_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        drop(MapSession::new(Events(log.clone()), config("streets")));
        assert!(log.borrow().is_empty());
    }
}
