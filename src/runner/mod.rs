use anyhow::Context;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::fetch::{HttpFetcher, PageFetcher};
use crate::core::model::IdPair;
use crate::core::{analyze, classify, script};
use crate::data::{self, DownloadRequest, Mode, RunConfig, Settings};
use crate::error::RunError;

pub mod launcher;
pub use launcher::{ProcessLauncher, ScriptLauncher};

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    pub command_line: String,
    pub directives: usize,
    pub script_path: Option<PathBuf>,
    pub launched: bool,
    /// Links classified successfully; single-link runs count their one link.
    pub classified: usize,
    pub errors: usize,
}

impl RunReport {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            command_line: String::new(),
            directives: 0,
            script_path: None,
            launched: false,
            classified: 0,
            errors: 0,
        }
    }
}

pub struct Runner<F, L> {
    settings: Settings,
    fetcher: F,
    launcher: L,
    mode_override: Option<Mode>,
}

impl Runner<HttpFetcher, ProcessLauncher> {
    pub fn from_settings(settings: Settings) -> Self {
        let fetcher = HttpFetcher::new(&settings);
        Self::new(settings, fetcher, ProcessLauncher)
    }
}

impl<F: PageFetcher, L: ScriptLauncher> Runner<F, L> {
    pub fn new(settings: Settings, fetcher: F, launcher: L) -> Self {
        Self { settings, fetcher, launcher, mode_override: None }
    }

    /// Use `mode` instead of the one in `data.json`.
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        self.mode_override = mode;
        self
    }

    /// Load both documents, run the configured mode and consume the download request.
    ///
    /// The request file is left alone when the guard or the run configuration fails;
    /// otherwise it is emptied whatever the outcome of the run.
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        let download_path = self.settings.download_path.clone();
        let request = data::load_download_request(&download_path)?
            .ok_or_else(|| RunError::NotLaunchedByDownloader { path: download_path.clone() })?;
        let config = data::load_run_config(&self.settings.data_path)?
            .ok_or_else(|| RunError::MissingRunConfig { path: self.settings.data_path.clone() })?;
        let mode = self.mode_override.unwrap_or(config.mode);
        info!(%mode, links = request.list.len(), repeat = config.repeat, bscim = config.bscim, "starting run");

        let outcome = self.dispatch(mode, &config, &request);

        match data::clear_download_request(&download_path) {
            Ok(()) => outcome,
            Err(e) if outcome.is_ok() => Err(e.into()),
            Err(e) => {
                warn!("could not clear {}: {:#}", download_path.display(), e);
                outcome
            }
        }
    }

    fn dispatch(&mut self, mode: Mode, config: &RunConfig, request: &DownloadRequest) -> Result<RunReport, RunError> {
        let mut report = RunReport::new(mode);
        let pairs = if mode.is_batch() {
            self.collect_batch(config, request, &mut report)?
        } else {
            self.collect_single(request, &mut report)?
        };

        let directives = script::generate_script(&pairs, config.repeat, config.bscim);
        report.directives = script::directive_count(&directives);
        report.command_line = format!("{}{}", request.script, directives);

        if mode.writes_file() {
            let path = write_script(&self.settings.scripts_dir, &report.command_line, request.datetime.first())?;
            report.script_path = Some(path);
        }
        if mode.executes() {
            self.launcher.launch(&report.command_line)?;
            report.launched = true;
        }
        Ok(report)
    }

    fn collect_batch(
        &self,
        config: &RunConfig,
        request: &DownloadRequest,
        report: &mut RunReport,
    ) -> Result<Vec<IdPair>, RunError> {
        let classification = classify::classify_links(&self.fetcher, &request.list);
        report.classified = classification.success;
        report.errors = classification.errors;
        if classification.success == 0 {
            return Err(RunError::AllLinksInvalid { errors: classification.errors });
        }

        let mut items = classification.items;
        if !classification.collections.is_empty() {
            if config.expand_collections {
                let (children, errors) =
                    classify::expand_collections(&self.fetcher, &classification.collections, &items);
                info!("{} item(s) found in {} collection(s)", children.len(), classification.collections.len());
                items.extend(children);
                report.errors += errors;
            } else {
                info!("{} collection link(s) skipped", classification.collections.len());
            }
        }

        let analysis = analyze::analyze_items(&self.fetcher, &items);
        report.errors += analysis.errors;
        Ok(analysis.pairs)
    }

    fn collect_single(&self, request: &DownloadRequest, report: &mut RunReport) -> Result<Vec<IdPair>, RunError> {
        info!("Analysing links... (Single-mode)");
        let first = request
            .list
            .first()
            .ok_or_else(|| RunError::FirstLinkInvalid { reason: "no link was given".into() })?;
        let pair = analyze::analyze_link(&self.fetcher, first)
            .map_err(|e| RunError::FirstLinkInvalid { reason: e.to_string() })?;
        report.classified = 1;
        Ok(vec![pair])
    }
}

/// Write `command_line` to `<dir>/script <datetime>.bat`, creating `dir` if needed.
///
/// Without a datetime from the downloader the local time is used.
pub fn write_script(dir: &Path, command_line: &str, datetime: Option<&String>) -> Result<PathBuf, RunError> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let stamp = match datetime {
        Some(stamp) => stamp.clone(),
        None => Local::now().format("%Y-%m-%d %H-%M-%S").to_string(),
    };
    let name = format!("script {}.bat", file_safe(&stamp));
    let path = dir.join(&name);
    fs::write(&path, command_line).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Script generated as: {}", name);
    Ok(path)
}

/// Replace characters that would leave `dir` or are invalid in Windows file names.
fn file_safe(stamp: &str) -> String {
    stamp
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}
