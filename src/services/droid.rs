use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::{
    error::WebDriverResult, ChromeCapabilities, ChromiumLikeCapabilities, DesiredCapabilities,
    WebDriver,
};

/// Something that can load a url, let client-side scripts run for `wait`
/// and hand back the resulting markup.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, wait: Duration) -> WebDriverResult<String>;
}

/// Headless chrome driven over WebDriver. Every call gets its own session.
pub struct Droid {
    webdriver_url: String,
}

impl Droid {
    pub fn new(webdriver_url: String) -> Self {
        Droid { webdriver_url }
    }

    async fn new_driver(&self) -> WebDriverResult<WebDriver> {
        let caps = chrome_capabilities()?;

        WebDriver::new(&self.webdriver_url, caps).await
    }

    async fn load(driver: &WebDriver, url: &str, wait: Duration) -> WebDriverResult<String> {
        driver.goto(url).await?;
        // Results are injected by javascript, there is nothing reliable to wait on.
        tokio::time::sleep(wait).await;
        driver.source().await
    }
}

/// Headless chrome with the sandbox and /dev/shm usage turned off.
pub fn chrome_capabilities() -> WebDriverResult<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    caps.set_headless()?;
    caps.set_no_sandbox()?;
    caps.set_disable_dev_shm_usage()?;

    Ok(caps)
}

#[async_trait]
impl PageRenderer for Droid {
    async fn render(&self, url: &str, wait: Duration) -> WebDriverResult<String> {
        let driver = self.new_driver().await?;

        let page_source = Droid::load(&driver, url, wait).await;

        if let Err(e) = driver.quit().await {
            log::error!("Failed to quit webdriver session: {:?}", e);
        }

        page_source
    }
}
