use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use scmd_list_manager::data::{load_download_request, save_json};
use scmd_list_manager::{
    directive, DownloadRequest, Mode, PageError, PageFetcher, RunError, Runner, ScriptLauncher, Settings,
};

const APP_ANCHOR: &str = r#"<a href="https://steamcommunity.com/app/{app}/workshop/">Workshop</a>"#;
const COLLECTION_ANCHOR: &str =
    r#"<a href="https://steamcommunity.com/workshop/browse/?section=collections&amp;appid=4000">Collections</a>"#;

/// Pages served from memory, so the suite never touches the network.
struct Pages(HashMap<String, String>);

impl Pages {
    fn new() -> Self {
        Pages(HashMap::new())
    }

    fn item(mut self, id: &str, app: &str) -> Self {
        self.0.insert(item_url(id), APP_ANCHOR.replace("{app}", app));
        self
    }

    fn collection(mut self, id: &str) -> Self {
        self.0.insert(item_url(id), format!("{}{}", APP_ANCHOR.replace("{app}", "4000"), COLLECTION_ANCHOR));
        self
    }
}

impl PageFetcher for Pages {
    fn fetch(&self, url: &str) -> Result<String, PageError> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| PageError::Transport { url: url.to_string(), message: "offline".into() })
    }
}

#[derive(Default)]
struct Launches(Vec<String>);

impl ScriptLauncher for Launches {
    fn launch(&mut self, command_line: &str) -> Result<(), RunError> {
        self.0.push(command_line.to_string());
        Ok(())
    }
}

fn item_url(id: &str) -> String {
    format!("https://steamcommunity.com/sharedfiles/filedetails/?id={id}")
}

fn prepare(root: &Path, repeat: u32, mode: u8, bscim: bool, links: Vec<String>) -> Settings {
    let settings = Settings {
        data_path: root.join("data.json"),
        download_path: root.join("download.json"),
        scripts_dir: root.join("generated scripts"),
        ..Settings::default()
    };
    save_json(&serde_json::json!({ "repeat": repeat, "mode": mode, "bscim": bscim }), &settings.data_path).unwrap();
    let request = DownloadRequest {
        list: links,
        script: "C:/steamcmd/steamcmd.exe +login anonymous".to_string(),
        datetime: vec!["2024-02-29 23-59-59".to_string()],
    };
    save_json(&request, &settings.download_path).unwrap();
    settings
}

#[test]
fn batch_mode_with_bscim_treatment() {
    let dir = tempdir().unwrap();
    let links = vec![item_url("100"), item_url("500"), item_url("200")];
    let settings = prepare(dir.path(), 2, 3, true, links);
    let pages = Pages::new().item("100", "10").collection("500").item("200", "20");
    let mut launches = Launches::default();

    let report = Runner::new(settings.clone(), &pages, &mut launches).run().unwrap();

    let expected_directives = [
        directive("10", "100"),
        directive("10", "100"),
        directive("10", "100"),
        directive("20", "200"),
        directive("10", "200"),
        directive("10", "200"),
    ]
    .concat();
    assert_eq!(report.mode, Mode::BatchWrite);
    assert_eq!(report.directives, 6);
    assert!(report.command_line.ends_with(&expected_directives));
    assert!(launches.0.is_empty());

    let written = fs::read_to_string(settings.scripts_dir.join("script 2024-02-29 23-59-59.bat")).unwrap();
    assert_eq!(written, report.command_line);
    assert!(load_download_request(&settings.download_path).unwrap().is_none());
}

#[test]
fn partial_failures_are_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let links = vec![item_url("1"), "https://steamcommunity.com/offline".to_string(), item_url("2")];
    let settings = prepare(dir.path(), 0, 1, false, links);
    let pages = Pages::new().item("1", "4000").item("2", "4000");
    let mut launches = Launches::default();

    let report = Runner::new(settings, &pages, &mut launches).run().unwrap();
    assert_eq!(report.classified, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.directives, 2);
    assert_eq!(launches.0.len(), 1);
}

#[test]
fn network_down_produces_nothing() {
    let dir = tempdir().unwrap();
    let settings = prepare(dir.path(), 0, 5, false, vec![item_url("1"), item_url("2")]);
    let mut launches = Launches::default();

    let err = Runner::new(settings.clone(), &Pages::new(), &mut launches).run().unwrap_err();
    assert!(matches!(err, RunError::AllLinksInvalid { .. }));
    assert!(err.hint().is_some());
    assert!(!settings.scripts_dir.exists());
    assert!(launches.0.is_empty());
}

#[test]
fn missing_download_request_is_the_guard() {
    let dir = tempdir().unwrap();
    let settings = prepare(dir.path(), 0, 0, false, vec![item_url("1")]);
    fs::remove_file(&settings.download_path).unwrap();
    let mut launches = Launches::default();

    let err = Runner::new(settings.clone(), &Pages::new().item("1", "4000"), &mut launches).run().unwrap_err();
    assert!(err.is_guard());
    assert!(!settings.download_path.exists());
    assert!(launches.0.is_empty());
}

#[test]
fn missing_run_config_keeps_request() {
    let dir = tempdir().unwrap();
    let settings = prepare(dir.path(), 0, 0, false, vec![item_url("1")]);
    fs::remove_file(&settings.data_path).unwrap();
    let mut launches = Launches::default();

    let err = Runner::new(settings.clone(), &Pages::new(), &mut launches).run().unwrap_err();
    assert!(matches!(err, RunError::MissingRunConfig { .. }));
    assert!(load_download_request(&settings.download_path).unwrap().is_some());
}
