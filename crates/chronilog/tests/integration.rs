//! Integration tests across config files, the registry, sinks and the
//! wizard.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use chronilog::config::{CONFIG_FILE_NAME, ConfigDocument, ConfigSource, SCHEMA, schema};
use chronilog::format::PlainFormatter;
use chronilog::prompt::LinePrompter;
use chronilog::sink::backup_path;
use chronilog::testing::TestConsole;
use chronilog::{Level, LoggerOptions, LoggerRegistry, Wizard, WizardOutcome};
use tempfile::TempDir;

fn registry_for(dir: &TempDir, config: &str) -> LoggerRegistry {
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, config).unwrap();
    LoggerRegistry::with_source(ConfigSource::File(path))
}

fn log_line_config(log_path: &Path, extra: &str) -> String {
    format!(
        "[logging]\nlog_path = \"{}\"\n{extra}",
        log_path.display().to_string().replace('\\', "\\\\")
    )
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_same_name_same_instance() {
    let dir = TempDir::new().unwrap();
    let registry = registry_for(&dir, &log_line_config(&dir.path().join("a.log"), ""));

    let first = registry.get_logger("svc").unwrap();
    let second = registry.get_logger("svc").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let opts = || LoggerOptions::new().use_cache(false);
    let one = registry.logger("svc", opts()).unwrap();
    let two = registry.logger("svc", opts()).unwrap();
    assert!(!Arc::ptr_eq(&one, &two));
}

#[test]
fn test_concurrent_first_requests_share_one_logger() {
    let dir = TempDir::new().unwrap();
    let registry = Arc::new(registry_for(
        &dir,
        &log_line_config(&dir.path().join("c.log"), ""),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_logger("shared").unwrap())
        })
        .collect();
    let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
    assert_eq!(registry.cached_count(), 1);
}

#[test]
fn test_file_config_drives_level_and_prefix() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("app.log");
    let registry = registry_for(
        &dir,
        &log_line_config(
            &log,
            "log_level = \"WARNING\"\nfilter_module_prefix = \"app.\"\ndisable_rich_format = true\n",
        ),
    );

    let app = registry.get_logger("app.core").unwrap();
    app.info("below level");
    app.warning("kept");
    registry.get_logger("vendor.lib").unwrap().critical("filtered");

    let text = fs::read_to_string(&log).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.trim_end().ends_with("[WARNING] app.core: kept"));
}

#[test]
fn test_lenient_load_of_malformed_file() {
    let dir = TempDir::new().unwrap();
    let registry = registry_for(&dir, "[logging\nlog_level = ");
    let config = registry.resolve(&LoggerOptions::new()).unwrap();
    assert_eq!(config.log_level, Level::Debug);
    assert_eq!(config.log_max_mb, 5);
}

// ============================================================================
// File sink behavior through loggers
// ============================================================================

#[test]
fn test_wipe_happens_once_per_registry() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("wipe.log");
    fs::write(&log, "stale line\n").unwrap();
    let registry = registry_for(&dir, &log_line_config(&log, "wipe_log_on_startup = true\n"));

    registry.get_logger("one").unwrap().info("first");
    // A second logger on the same file must not wipe it again.
    registry.get_logger("two").unwrap().info("second");
    registry
        .logger("three", LoggerOptions::new().use_cache(false))
        .unwrap()
        .info("third");

    let text = fs::read_to_string(&log).unwrap();
    assert!(!text.contains("stale line"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_rotation_through_logger() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("rot.log");
    let registry = registry_for(
        &dir,
        &log_line_config(&log, "log_max_mb = 1\nlog_backup_count = 2\n"),
    );
    let logger = registry.get_logger("bulk").unwrap();

    let payload = "x".repeat(64 * 1024);
    for _ in 0..40 {
        logger.info(payload.as_str());
    }

    assert!(backup_path(&log, 1).exists());
    assert!(backup_path(&log, 2).exists());
    assert!(!backup_path(&log, 3).exists());
    for path in [log.clone(), backup_path(&log, 1), backup_path(&log, 2)] {
        assert!(fs::metadata(&path).unwrap().len() < 1024 * 1024);
    }
    assert_eq!(logger.sink_errors(), 0);
}

#[test]
fn test_rotation_disabled_grows_single_file() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("grow.log");
    let registry = registry_for(
        &dir,
        &log_line_config(&log, "log_max_mb = 1\nenable_rotation = false\n"),
    );
    let logger = registry.get_logger("bulk").unwrap();
    let payload = "y".repeat(64 * 1024);
    for _ in 0..20 {
        logger.info(payload.as_str());
    }
    assert!(fs::metadata(&log).unwrap().len() > 1024 * 1024);
    assert!(!backup_path(&log, 1).exists());
}

#[test]
fn test_custom_file_formatter_is_plain() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("custom.log");
    let registry = registry_for(&dir, &log_line_config(&log, ""));
    let logger = registry
        .logger(
            "test_custom",
            LoggerOptions::new()
                .file_formatter(Arc::new(PlainFormatter::new()))
                .use_cache(false),
        )
        .unwrap();
    logger.info("✅ Custom formatter test");

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("[INFO] test_custom: ✅ Custom formatter test"));
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_json_file_lines() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("json.log");
    let registry = registry_for(&dir, &log_line_config(&log, "log_format = \"json\"\n"));
    let logger = registry.get_logger("api").unwrap();
    logger.log_with(Level::Success, "saved", [("id", 7)]);

    let text = fs::read_to_string(&log).unwrap();
    let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(value["level"], "SUCCESS");
    assert_eq!(value["logger"], "api");
    assert_eq!(value["message"], "saved");
    assert_eq!(value["extra"]["id"], "7");
}

// ============================================================================
// Wizard to loader round trip
// ============================================================================

fn scripted_wizard(
    answers: &str,
    target: &Path,
) -> (Wizard<LinePrompter<Cursor<Vec<u8>>, Vec<u8>>>, TestConsole) {
    let tc = TestConsole::new();
    let prompter = LinePrompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());
    (Wizard::new(prompter, tc.shared()).with_target(target), tc)
}

#[test]
fn test_wizard_output_loads_back() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(CONFIG_FILE_NAME);
    let (mut wizard, _tc) = scripted_wizard("audit.log\nERROR\n2\n1\ny\n", &target);
    let WizardOutcome::Written(path, doc) = wizard.run(false).unwrap() else {
        panic!("wizard did not write");
    };
    assert_eq!(path, target);

    let registry = LoggerRegistry::with_source(ConfigSource::File(path));
    let config = registry.resolve(&LoggerOptions::new()).unwrap();
    assert_eq!(config.log_level, Level::Error);
    assert_eq!(config.log_max_mb, 2);
    assert_eq!(config.log_backup_count, 1);
    assert!(config.enable_console);
    assert_eq!(doc.get(schema::LOG_PATH).unwrap().as_text(), Some("audit.log"));
}

#[test]
fn test_generated_file_has_every_key_once_in_order() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(CONFIG_FILE_NAME);
    let (mut wizard, _tc) = scripted_wizard("", &target);
    wizard.run(false).unwrap();

    let text = fs::read_to_string(&target).unwrap();
    let keys: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with('#') && l.contains(" = "))
        .filter_map(|l| l.split(" = ").next())
        .collect();
    let expected: Vec<&str> = SCHEMA.iter().map(|f| f.key).collect();
    assert_eq!(keys, expected);
    assert!(text.contains("enable_console = false\n"));
    assert!(text.contains("log_max_mb = 5\n"));
    assert!(text.contains("timestamp_format = \"%Y-%m-%d %H:%M:%S\"\n"));
}

#[test]
fn test_dry_run_then_declined_overwrite_leave_disk_alone() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(CONFIG_FILE_NAME);

    let (mut wizard, tc) = scripted_wizard("", &target);
    assert!(matches!(wizard.run(true).unwrap(), WizardOutcome::Previewed(_)));
    assert!(!target.exists());
    tc.assert_contains("log_max_mb = 5");

    let original = "[logging]\nlog_level = \"INFO\"\n";
    fs::write(&target, original).unwrap();
    let answers = format!("{}\n", "\n".repeat(SCHEMA.len()));
    let (mut wizard, _tc) = scripted_wizard(&answers, &target);
    assert_eq!(wizard.run(false).unwrap(), WizardOutcome::Aborted);
    assert_eq!(fs::read(&target).unwrap(), original.as_bytes());
}

#[test]
fn test_default_answers_match_default_document() {
    let dir = TempDir::new().unwrap();
    let (mut wizard, _tc) = scripted_wizard("", &dir.path().join(CONFIG_FILE_NAME));
    let doc = wizard.run(true).unwrap().into_document().unwrap();
    assert_eq!(doc, ConfigDocument::defaults());
}
