use std::{path::PathBuf, sync::Arc};

use shortreel::ConfigStore;

fn write_config(path: &PathBuf, voice: &str) {
    let doc = serde_json::json!({
        "tts": { "voice": voice },
        "output": { "directory": "out" }
    });
    std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
}

#[test]
fn load_is_memoized_until_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    write_config(&path, "en-US-AriaNeural");

    let store = ConfigStore::new(vec![path.clone()]);
    let first = store.load();
    let second = store.load();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.tts.voice, "en-US-AriaNeural");

    // the file changes, but the memoized instance is still served
    write_config(&path, "en-US-GuyNeural");
    assert_eq!(store.load().tts.voice, "en-US-AriaNeural");

    // reload clears the memo and re-parses
    let reloaded = store.reload();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_eq!(reloaded.tts.voice, "en-US-GuyNeural");
}

#[test]
fn reset_alone_forces_a_fresh_parse_on_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    write_config(&path, "en-US-AriaNeural");

    let store = ConfigStore::new(vec![path.clone()]);
    store.load();
    write_config(&path, "en-US-JennyNeural");
    store.reset();
    assert_eq!(store.load().tts.voice, "en-US-JennyNeural");
}

#[test]
fn first_existing_candidate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let primary = dir.path().join("config.json");
    let secondary = dir.path().join("fallback.json");
    write_config(&primary, "en-US-EricNeural");
    write_config(&secondary, "en-US-RogerNeural");

    let store = ConfigStore::new(vec![missing, primary, secondary]);
    assert_eq!(store.load().tts.voice, "en-US-EricNeural");
}

#[test]
fn missing_files_yield_the_built_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(vec![dir.path().join("nowhere.json")]);
    let config = store.load();
    assert_eq!(config.tts.voice, "en-US-ChristopherNeural");
    assert_eq!(config.output.final_video, "short.mp4");
}

#[test]
fn unparsable_winning_candidate_yields_the_defaults_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("config.json");
    let healthy = dir.path().join("fallback.json");
    std::fs::write(&broken, "{ this is not json").unwrap();
    write_config(&healthy, "en-US-MichelleNeural");

    // the broken file is the first existing candidate, so it wins and its
    // parse failure substitutes the defaults; later candidates are not tried
    let store = ConfigStore::new(vec![broken, healthy]);
    let config = store.load();
    assert_eq!(config.tts.voice, "en-US-ChristopherNeural");
}
