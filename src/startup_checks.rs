use crate::Config;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Provider base URL is invalid: {0}")]
    InvalidProviderBaseUrl(String),

    #[error("Unknown display locale: {0}")]
    UnknownLocale(String),
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    match url::Url::parse(&config.provider.base_url) {
        Ok(base_url) if base_url.scheme() == "http" || base_url.scheme() == "https" => {
            info!("Provider endpoint root: {}", base_url);
        }
        Ok(base_url) => {
            error!(
                "Provider base URL has unsupported scheme '{}'",
                base_url.scheme()
            );
            errors.push(StartupCheckError::InvalidProviderBaseUrl(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }
        Err(e) => {
            error!("Provider base URL does not parse: {}", e);
            errors.push(StartupCheckError::InvalidProviderBaseUrl(e.to_string()));
        }
    }

    if config.provider.request_timeout_secs == 0 {
        warn!("Provider request timeout is 0; requests will never time out");
    }

    if chrono::Locale::try_from(config.viewer.locale.as_str()).is_err() {
        warn!(
            "Display locale '{}' is not known; date labels will use POSIX formatting",
            config.viewer.locale
        );
        errors.push(StartupCheckError::UnknownLocale(
            config.viewer.locale.clone(),
        ));
    } else {
        info!("Display locale: {}", config.viewer.locale);
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
