use tracing::debug;
use url::Url;

use crate::data::Settings;
use crate::error::PageError;

/// Source of page HTML. Calls are blocking and made one at a time.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, PageError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, PageError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(&settings.user_agent)
            .redirects(10);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Self { agent: builder.build() }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, PageError> {
        let parsed = Url::parse(url).map_err(|source| PageError::InvalidUrl { url: url.to_string(), source })?;
        debug!(%parsed, "fetching page");
        let resp = match self.agent.request_url("GET", &parsed).call() {
            Ok(resp) => resp,
            // Error pages are still HTML; only transport failures count against the link.
            Err(ureq::Error::Status(status, resp)) => {
                debug!(status, url, "non-success status, reading body anyway");
                resp
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(PageError::Transport { url: url.to_string(), message: t.to_string() })
            }
        };
        resp.into_string()
            .map_err(|source| PageError::Body { url: url.to_string(), source })
    }
}
