use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error};

/// Runtime settings. Built from the command line; the defaults match the layout the
/// downloader prepares next to the executable.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: PathBuf,
    pub download_path: PathBuf,
    pub scripts_dir: PathBuf,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/data.json"),
            download_path: PathBuf::from("./data/download.json"),
            scripts_dir: PathBuf::from("./generated scripts"),
            user_agent: concat!("scmd-list-manager/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Which steps a run performs.
///
/// | mode | batch | single link | write file | execute |
/// |------|-------|-------------|------------|---------|
/// | 0    |       | x           |            | x       |
/// | 1    | x     |             |            | x       |
/// | 2    |       | x           | x          |         |
/// | 3    | x     |             | x          |         |
/// | 4    |       | x           | x          | x       |
/// | 5    | x     |             | x          | x       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    SingleExecute,
    BatchExecute,
    SingleWrite,
    BatchWrite,
    SingleWriteExecute,
    BatchWriteExecute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMode(pub u8);

impl fmt::Display for InvalidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode must be between 0 and 5, got {}", self.0)
    }
}

impl std::error::Error for InvalidMode {}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Mode::SingleExecute,
            1 => Mode::BatchExecute,
            2 => Mode::SingleWrite,
            3 => Mode::BatchWrite,
            4 => Mode::SingleWriteExecute,
            5 => Mode::BatchWriteExecute,
            other => return Err(InvalidMode(other)),
        })
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        match mode {
            Mode::SingleExecute => 0,
            Mode::BatchExecute => 1,
            Mode::SingleWrite => 2,
            Mode::BatchWrite => 3,
            Mode::SingleWriteExecute => 4,
            Mode::BatchWriteExecute => 5,
        }
    }
}

impl Mode {
    pub fn is_batch(self) -> bool {
        matches!(self, Mode::BatchExecute | Mode::BatchWrite | Mode::BatchWriteExecute)
    }

    pub fn writes_file(self) -> bool {
        !matches!(self, Mode::SingleExecute | Mode::BatchExecute)
    }

    pub fn executes(self) -> bool {
        !matches!(self, Mode::SingleWrite | Mode::BatchWrite)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Contents of `data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub repeat: u32,
    pub mode: Mode,
    pub bscim: bool,
    #[serde(default)]
    pub expand_collections: bool,
}

/// Contents of `download.json`, written by the downloader before it launches us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub list: Vec<String>,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub datetime: Vec<String>,
}

/// Read a JSON document. A missing file or an empty/falsy document is `None`.
fn read_document(path: &Path) -> Result<Option<Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("ERROR: File at {} not found.", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!(path = %path.display(), "document is empty");
        return Ok(None);
    }
    let value: Value =
        serde_json::from_slice(&bytes).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(if is_blank(&value) { None } else { Some(value) })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn load_run_config(path: &Path) -> Result<Option<RunConfig>> {
    read_document(path)?
        .map(|value| serde_json::from_value(value).with_context(|| format!("invalid run configuration in {}", path.display())))
        .transpose()
}

pub fn load_download_request(path: &Path) -> Result<Option<DownloadRequest>> {
    read_document(path)?
        .map(|value| serde_json::from_value(value).with_context(|| format!("invalid download request in {}", path.display())))
        .transpose()
}

pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Mark the download request as consumed by replacing it with an empty JSON string.
pub fn clear_download_request(path: &Path) -> Result<()> {
    save_json("", path)
}
