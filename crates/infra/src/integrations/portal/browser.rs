//! WebDriver-backed session bridge
//!
//! Spawns a transient `chromedriver`, drives the portal login form through
//! it and captures the resulting cookie jar. The driver process is owned by a
//! guard that kills it on drop, so every exit path (success, error, or the
//! caller dropping the future at a deadline) tears it down.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use shiftsync_core::SessionBridge;
use shiftsync_domain::{BrowserConfig, Credentials, Result, Session, ShiftSyncError};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on waiting for `chromedriver` to listen, kept inside the
/// login deadline's grace so the form and page waits keep their full budget.
const DRIVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Logs into the portal with a scripted Chrome session.
pub struct WebDriverSessionBridge {
    login_url: String,
    browser: BrowserConfig,
}

impl WebDriverSessionBridge {
    pub fn new(login_url: impl Into<String>, browser: BrowserConfig) -> Self {
        Self { login_url: login_url.into(), browser }
    }

    /// Force a visible browser window regardless of configuration.
    pub fn headful(mut self) -> Self {
        self.browser.headless = false;
        self
    }

    fn webdriver_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.browser.webdriver_port)
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--window-size=1920,1080",
        ];
        if self.browser.headless {
            args.insert(0, "--headless=new");
        }

        let mut caps = Map::new();
        caps.insert("browserName".into(), json!("chrome"));
        caps.insert("goog:chromeOptions".into(), json!({ "args": args }));
        caps
    }

    async fn connect(&self) -> Result<Client> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        builder.connect(&self.webdriver_url()).await.map_err(|err| {
            ShiftSyncError::LoginEnvironment(format!("could not open a WebDriver session: {err}"))
        })
    }

    /// Fill and submit the login form, then capture cookies.
    async fn drive(
        &self,
        client: &Client,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Session> {
        client.goto(&self.login_url).await.map_err(|err| command_error("open login page", err))?;

        let username = client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Id(&self.browser.username_field_id))
            .await
            .map_err(|err| match err {
                CmdError::WaitTimeout => ShiftSyncError::LoginTimeout(format!(
                    "login form field '{}' did not appear within {}s",
                    self.browser.username_field_id,
                    timeout.as_secs()
                )),
                other => command_error("locate username field", other),
            })?;
        username
            .send_keys(&credentials.username)
            .await
            .map_err(|err| command_error("enter username", err))?;

        client
            .find(Locator::Id(&self.browser.password_field_id))
            .await
            .map_err(|err| command_error("locate password field", err))?
            .send_keys(&credentials.password)
            .await
            .map_err(|err| command_error("enter password", err))?;

        client
            .find(Locator::Id(&self.browser.submit_button_id))
            .await
            .map_err(|err| command_error("locate submit button", err))?
            .click()
            .await
            .map_err(|err| command_error("submit login form", err))?;
        debug!("Submitted login form");

        if !wait_until_ready(client, timeout).await {
            warn!(
                timeout_secs = timeout.as_secs(),
                "Post-login page never reported ready, capturing cookies anyway"
            );
        }
        tokio::time::sleep(self.browser.settle_delay()).await;

        let cookies =
            client.get_all_cookies().await.map_err(|err| command_error("read cookies", err))?;
        let session: Session = cookies
            .iter()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        if session.is_empty() {
            return Err(ShiftSyncError::Login("portal set no cookies after login".into()));
        }

        let missing = session.missing_essentials();
        if !missing.is_empty() {
            warn!(?missing, "Session is missing essential cookies");
        }
        info!(cookies = ?session.cookie_names().collect::<Vec<_>>(), "Captured portal session");

        Ok(session)
    }
}

#[async_trait]
impl SessionBridge for WebDriverSessionBridge {
    #[instrument(skip(self, credentials), fields(headless = self.browser.headless))]
    async fn login(&self, credentials: &Credentials, timeout: Duration) -> Result<Session> {
        let driver = DriverProcess::spawn(
            &self.browser.chromedriver_path,
            self.browser.webdriver_port,
            timeout.min(DRIVER_STARTUP_TIMEOUT),
        )
        .await?;
        let client = self.connect().await?;

        let outcome = self.drive(&client, credentials, timeout).await;

        if let Err(err) = client.close().await {
            warn!(error = %err, "Failed to close WebDriver session");
        }
        driver.shutdown().await;

        outcome
    }
}

/// Poll `document.readyState` until it is `complete` or `timeout` elapses.
async fn wait_until_ready(client: &Client, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match client.execute("return document.readyState", vec![]).await {
            Ok(Value::String(state)) if state == "complete" => return true,
            Ok(state) => debug!(?state, "Page not ready yet"),
            // Navigation in flight; the next poll usually succeeds.
            Err(err) => debug!(error = %err, "readyState check failed"),
        }

        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn command_error(action: &str, err: CmdError) -> ShiftSyncError {
    ShiftSyncError::Login(format!("failed to {action}: {err}"))
}

/// Running `chromedriver` child, killed when dropped.
struct DriverProcess {
    child: Child,
}

impl DriverProcess {
    /// Start the driver and wait until it accepts connections on `port`.
    async fn spawn(path: &str, port: u16, ready_within: Duration) -> Result<Self> {
        let child = Command::new(path)
            .arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                ShiftSyncError::LoginEnvironment(format!("could not start '{path}': {err}"))
            })?;

        let mut driver = Self { child };
        driver.wait_ready(port, ready_within).await?;
        debug!(port, "WebDriver is accepting connections");
        Ok(driver)
    }

    async fn wait_ready(&mut self, port: u16, ready_within: Duration) -> Result<()> {
        let deadline = Instant::now() + ready_within;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    return Err(ShiftSyncError::LoginEnvironment(format!(
                        "WebDriver exited during startup ({status})"
                    )))
                }
                Ok(None) => {}
                Err(err) => {
                    return Err(ShiftSyncError::LoginEnvironment(format!(
                        "could not poll WebDriver process: {err}"
                    )))
                }
            }

            if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ShiftSyncError::LoginEnvironment(format!(
                    "WebDriver did not listen on port {port} within {}s",
                    ready_within.as_secs()
                )));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn shutdown(mut self) {
        if let Err(err) = self.child.kill().await {
            debug!(error = %err, "WebDriver already stopped");
        }
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}
