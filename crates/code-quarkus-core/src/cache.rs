use crate::api::{ApiError, Platform, RemoteConfig};

/// Owner of the fetched platform and remote config.
///
/// Values load at most once until [`ApiCache::invalidate`] or a refresh.
#[derive(Debug, Default)]
pub struct ApiCache {
    platform: Option<Platform>,
    config: Option<RemoteConfig>,
}

impl ApiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            config: None,
        }
    }

    pub fn cached_platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    pub fn cached_config(&self) -> Option<&RemoteConfig> {
        self.config.as_ref()
    }

    pub fn platform<F>(&mut self, load: F) -> Result<&Platform, ApiError>
    where
        F: FnOnce() -> Result<Platform, ApiError>,
    {
        let platform = match self.platform.take() {
            Some(platform) => platform,
            None => load()?,
        };
        let platform: &Platform = self.platform.insert(platform);
        Ok(platform)
    }

    /// Reloads the platform; a failed reload keeps the previous value.
    pub fn refresh_platform<F>(&mut self, load: F) -> Result<&Platform, ApiError>
    where
        F: FnOnce() -> Result<Platform, ApiError>,
    {
        let platform = load()?;
        tracing::debug!("platform cache refreshed");
        let platform: &Platform = self.platform.insert(platform);
        Ok(platform)
    }

    pub fn config<F>(&mut self, load: F) -> Result<&RemoteConfig, ApiError>
    where
        F: FnOnce() -> Result<RemoteConfig, ApiError>,
    {
        let config = match self.config.take() {
            Some(config) => config,
            None => load()?,
        };
        let config: &RemoteConfig = self.config.insert(config);
        Ok(config)
    }

    pub fn invalidate(&mut self) {
        self.platform = None;
        self.config = None;
    }
}
