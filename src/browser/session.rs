use crate::audit::aggregate::PageLoadFault;
use crate::config::AuditConfig;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::{Duration, sleep, timeout};

/// Driver URLs tried when the configured one refuses the connection
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Connects to the WebDriver instance, falling back to common local ports
pub async fn connect(webdriver_url: &str) -> Result<Client, PageLoadFault> {
    let first_error = match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue; // Skip if it's the same as the one we already tried
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(PageLoadFault::Driver {
        url: webdriver_url.to_string(),
        message: first_error,
    })
}

/// Navigates to the configured URL and waits until the page counts as settled.
///
/// Only navigation can fail the run; banner dismissal, window sizing and
/// scrolling are best effort.
pub async fn load(client: &Client, config: &AuditConfig) -> Result<(), PageLoadFault> {
    if let Some((width, height)) = config.window_size {
        if let Err(e) = client.set_window_size(width, height).await {
            ::log::debug!("Could not resize window to {}x{}: {}", width, height, e);
        }
    }

    ::log::info!("Navigating to {}", config.url);
    let secs = config.page_load_timeout_secs;
    match timeout(Duration::from_secs(secs), client.goto(&config.url)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(navigation_fault(e, &config.url)),
        Err(_) => {
            ::log::error!("Timeout loading: {}", config.url);
            return Err(PageLoadFault::Timeout {
                url: config.url.clone(),
                secs,
            });
        }
    }

    sleep(Duration::from_millis(config.settle_ms)).await;
    dismiss_consent(client, &config.consent_selectors).await;
    scroll(client, config.scroll_passes).await;

    ::log::info!("Page settled: {}", config.url);
    Ok(())
}

/// Closes the session, logging rather than failing
pub async fn close(client: Client) {
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }
}

/// Clicks the first visible consent button, if any
async fn dismiss_consent(client: &Client, selectors: &[String]) {
    for selector in selectors {
        let buttons = match client.find_all(Locator::Css(selector)).await {
            Ok(buttons) => buttons,
            Err(e) => {
                ::log::debug!("Consent selector '{}' failed: {}", selector, e);
                continue;
            }
        };

        for button in buttons {
            if !button.is_displayed().await.unwrap_or(false) {
                continue;
            }
            match button.click().await {
                Ok(()) => {
                    ::log::info!("Dismissed consent banner via '{}'", selector);
                    sleep(Duration::from_millis(500)).await;
                    return;
                }
                Err(e) => ::log::debug!("Consent button '{}' not clickable: {}", selector, e),
            }
        }
    }
}

/// Scrolls to the bottom `passes` times so lazy images start loading
async fn scroll(client: &Client, passes: u32) {
    if passes == 0 {
        return;
    }

    for pass in 1..=passes {
        if let Err(e) = client
            .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await
        {
            ::log::debug!("Scroll pass {} failed: {}", pass, e);
            return;
        }
        sleep(Duration::from_millis(1000)).await;
    }

    if let Err(e) = client.execute("window.scrollTo(0, 0);", vec![]).await {
        ::log::debug!("Scroll back to top failed: {}", e);
    }
}

/// Maps a navigation error to a load fault, noting lost sessions
fn navigation_fault(error: fantoccini::error::CmdError, url: &str) -> PageLoadFault {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while accessing {}", url);
    } else {
        ::log::error!("Failed to access {}: {}", url, error);
    }
    PageLoadFault::Navigation {
        url: url.to_string(),
        message: error.to_string(),
    }
}
