//! Browser session abstraction and its WebDriver implementation

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, instrument};

use crate::error::Result;

/// One scoped browser session over an article page.
///
/// Sessions are exclusively owned per download attempt: acquired, used, and
/// released before the next attempt begins. Implementations must tolerate
/// `close` being called after any step.
#[async_trait]
pub trait ArticleSession: Send {
    /// Load the article page
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Find the download anchor by its accessible label and return its href.
    ///
    /// `Ok(None)` means the page exposes no such affordance.
    async fn locate_pdf_link(&mut self, label: &str) -> Result<Option<String>>;

    /// Click the download anchor, triggering an out-of-band file write
    async fn click_pdf_link(&mut self, label: &str) -> Result<()>;

    /// Release the session. Must be safe to call exactly once, success or not.
    async fn close(&mut self) -> Result<()>;
}

/// Factory for [`ArticleSession`]s, one per download attempt
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: ArticleSession;

    async fn open_session(&self) -> Result<Self::Session>;
}

/// WebDriver-backed provider spawning headless Chrome sessions that
/// auto-save PDFs into the working directory without a save-as prompt.
#[derive(Debug, Clone)]
pub struct WebDriverProvider {
    webdriver_url: String,
    download_dir: PathBuf,
}

impl WebDriverProvider {
    pub fn new(webdriver_url: impl Into<String>, download_dir: impl AsRef<Path>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            download_dir: download_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SessionProvider for WebDriverProvider {
    type Session = WebDriverSession;

    #[instrument(skip(self))]
    async fn open_session(&self) -> Result<WebDriverSession> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--headless=new")?;
        // Sandboxing off keeps the child process tree simple under
        // containerized chromedriver.
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_experimental_option(
            "prefs",
            serde_json::json!({
                "download.default_directory": self.download_dir.display().to_string(),
                "plugins.always_open_pdf_externally": true,
                "download.prompt_for_download": false,
                "download.directory_upgrade": true,
                "safebrowsing.enabled": true,
            }),
        )?;

        let driver = WebDriver::new(&self.webdriver_url, caps).await?;
        debug!("Browser session opened");
        Ok(WebDriverSession {
            driver: Some(driver),
        })
    }
}

/// A live WebDriver session over headless Chrome
pub struct WebDriverSession {
    driver: Option<WebDriver>,
}

impl WebDriverSession {
    fn driver(&self) -> &WebDriver {
        self.driver
            .as_ref()
            .expect("session used after close")
    }

    async fn find_link(&self, label: &str) -> Result<Option<WebElement>> {
        let xpath = format!("//a[@aria-label='{label}']");
        let mut elements = self.driver().find_all(By::XPath(xpath.as_str())).await?;
        if elements.is_empty() {
            Ok(None)
        } else {
            Ok(Some(elements.remove(0)))
        }
    }
}

#[async_trait]
impl ArticleSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.driver().goto(url).await?;
        Ok(())
    }

    async fn locate_pdf_link(&mut self, label: &str) -> Result<Option<String>> {
        match self.find_link(label).await? {
            Some(element) => Ok(element.attr("href").await?),
            None => Ok(None),
        }
    }

    async fn click_pdf_link(&mut self, label: &str) -> Result<()> {
        match self.find_link(label).await? {
            Some(element) => {
                element.click().await?;
                Ok(())
            }
            None => {
                let page = self.driver().current_url().await?;
                Err(crate::error::FetchError::PdfLinkMissing {
                    page: page.to_string(),
                })
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            driver.quit().await?;
            debug!("Browser session closed");
        }
        Ok(())
    }
}
