//! Workforce portal adapters

pub mod browser;
pub mod fetcher;

pub use browser::WebDriverSessionBridge;
pub use fetcher::PortalScheduleFetcher;
