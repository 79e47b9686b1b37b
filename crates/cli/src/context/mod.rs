//! Application context - dependency injection container

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shiftsync_core::{
    CalendarReconciler, CredentialProvider, ScheduleCache, ScheduleLoader, SyncPipeline,
};
use shiftsync_domain::{Config, Result};
use shiftsync_infra::{
    config, AccessTokenProvider, AuthorizedUserTokenProvider, CredentialOverrides,
    EnvCredentialProvider, FileCredentialProvider, FileScheduleStore, GoogleCalendarService,
    PortalScheduleFetcher, StaticTokenProvider, WebDriverSessionBridge,
};
use tracing::debug;

/// Bearer token used verbatim instead of `token.json` when set.
pub const ACCESS_TOKEN_ENV: &str = "SHIFTSYNC_CALENDAR_ACCESS_TOKEN";

/// Validated configuration plus adapter factories for one invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load configuration from `path`, a probed file or defaults.
    ///
    /// # Errors
    /// `Config` when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self { config: config::load(path)? })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Point the schedule store at `dir` for this run.
    #[must_use]
    pub fn with_schedule_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.config.storage.schedule_dir = dir;
        }
        self
    }

    pub fn schedule_store(&self) -> FileScheduleStore {
        FileScheduleStore::new(&self.config.storage.schedule_dir)
    }

    /// Credentials file when given, the environment otherwise, with
    /// command-line values taking precedence over either.
    pub fn credential_provider(
        &self,
        file: Option<&Path>,
        overrides: CredentialOverrides,
    ) -> Arc<dyn CredentialProvider> {
        match file {
            Some(path) => Arc::new(FileCredentialProvider::new(path).with_overrides(overrides)),
            None => Arc::new(EnvCredentialProvider::new(overrides)),
        }
    }

    /// # Errors
    /// `Config` when the portal settings cannot build a fetcher.
    pub fn schedule_loader(
        &self,
        credentials: Arc<dyn CredentialProvider>,
        headful: bool,
    ) -> Result<ScheduleLoader> {
        let portal = &self.config.portal;
        let browser = self.config.browser.clone();
        let mut bridge = WebDriverSessionBridge::new(portal.login_url.clone(), browser);
        if headful {
            bridge = bridge.headful();
        }
        let fetcher = PortalScheduleFetcher::new(portal)?;
        let cache = ScheduleCache::new(Arc::new(self.schedule_store()));

        Ok(ScheduleLoader::new(
            credentials,
            Arc::new(bridge),
            Arc::new(fetcher),
            cache,
            self.config.browser.login_timeout(),
        ))
    }

    /// # Errors
    /// `Config` when the calendar settings are invalid.
    pub fn reconciler(&self) -> Result<CalendarReconciler> {
        let calendar = GoogleCalendarService::new(&self.config.calendar, self.token_provider()?)?;
        Ok(CalendarReconciler::new(
            Arc::new(calendar),
            self.config.calendar.label.clone(),
            self.config.event.clone(),
        ))
    }

    /// # Errors
    /// As [`AppContext::schedule_loader`] and [`AppContext::reconciler`].
    pub fn pipeline(
        &self,
        credentials: Arc<dyn CredentialProvider>,
        headful: bool,
    ) -> Result<SyncPipeline> {
        Ok(SyncPipeline::new(self.schedule_loader(credentials, headful)?, self.reconciler()?))
    }

    fn token_provider(&self) -> Result<Arc<dyn AccessTokenProvider>> {
        if let Some(token) = std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()) {
            debug!("Using calendar access token from the environment");
            return Ok(Arc::new(StaticTokenProvider::new(token.trim())));
        }

        Ok(Arc::new(AuthorizedUserTokenProvider::new(
            &self.config.calendar.token_path,
            self.config.calendar.request_timeout(),
        )?))
    }
}
