use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};

use scmd_list_manager::{Mode, RunError, Runner, Settings};

const BANNER: &str = "SCMD List Manager & SCMD Workshop Downloader made by Berdy Alexei";

#[derive(Parser, Debug)]
#[command(name = "scmd-list-manager", version)]
#[command(about = "Turn Steam Workshop links into a workshop download command line")]
struct Cli {
    /// Run configuration (repeat, mode, bscim)
    #[arg(long, value_name = "FILE", default_value = "./data/data.json")]
    data: PathBuf,

    /// Download request prepared by the workshop downloader
    #[arg(long, value_name = "FILE", default_value = "./data/download.json")]
    download: PathBuf,

    /// Where generated .bat scripts are written
    #[arg(long, value_name = "DIR", default_value = "./generated scripts")]
    scripts_dir: PathBuf,

    /// Override the mode from the run configuration
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    mode: Option<u8>,

    /// User agent sent with every page request
    #[arg(long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Exit right away instead of waiting for Enter after a launch error
    #[arg(long, default_value_t = false)]
    no_pause: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            data_path: self.data.clone(),
            download_path: self.download.clone(),
            scripts_dir: self.scripts_dir.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

fn wait_for_enter() {
    println!("\n\n### Press Enter to close this window ###\n\n");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn report_error(err: &RunError, pause: bool) {
    if err.is_guard() {
        eprintln!("{BANNER}\n{err}\n<<Open SCMD Workshop Downloader instead>>");
        if pause {
            wait_for_enter();
        }
        return;
    }
    eprintln!("{err}");
    if let Some(hint) = err.hint() {
        eprintln!("{hint}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = cli.mode.and_then(|m| Mode::try_from(m).ok());
    let mut runner = Runner::from_settings(cli.settings()).with_mode(mode);
    match runner.run() {
        Ok(report) => {
            info!(
                directives = report.directives,
                errors = report.errors,
                launched = report.launched,
                "run finished in mode {}",
                report.mode
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err, !cli.no_pause);
            ExitCode::FAILURE
        }
    }
}
