use std::path::PathBuf;
use thiserror::Error;

/// Hint printed under network-related fatal errors.
pub const CONNECTION_HINT: &str =
    "<< Having a bad Internet connection can also make this error to happen. Try again later. >>";

/// Failure to fetch or read a single workshop page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("failed to read page body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no app link found on {url}")]
    NoAppLink { url: String },
    #[error("no {kind} ID found for {url}")]
    MissingId { url: String, kind: &'static str },
}

/// Fatal outcomes of a run. Each one stops the run before or instead of producing a script.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("ERROR 3: SCMD List Manager should only be opened when called by SCMD Workshop Downloader")]
    NotLaunchedByDownloader { path: PathBuf },

    #[error("run configuration not found at {}", path.display())]
    MissingRunConfig { path: PathBuf },

    #[error("ERROR 2: All introduced links are wrong")]
    AllLinksInvalid { errors: usize },

    #[error("ERROR 1: The first link entered is incorrect: {reason}")]
    FirstLinkInvalid { reason: String },

    // The only signal the launcher gets is "program not found", which on Windows is what an
    // over-long command line looks like.
    #[error("ERROR 0: Too many elements tried to be downloaded. Close this Window and try again introducing less.")]
    TooManyElements { program: String },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("the download command line is empty or malformed")]
    MalformedCommand,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunError {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RunError::AllLinksInvalid { .. } | RunError::FirstLinkInvalid { .. } => Some(CONNECTION_HINT),
            _ => None,
        }
    }

    pub fn is_guard(&self) -> bool {
        matches!(self, RunError::NotLaunchedByDownloader { .. })
    }
}
