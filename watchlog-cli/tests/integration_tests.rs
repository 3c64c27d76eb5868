use std::fs::File;

use tempfile::NamedTempFile;
use watchlog_cli::{run, CliError, DumpConfig, OutputFormat};
use watchlog_core::{FileHeader, PayloadData, WatchError, WatchLogWriter};

fn write_log(tmp: &NamedTempFile) -> u64 {
    let header = FileHeader::new("watcher", "myvar3", 1234, 0xdead_beef);
    let file = File::create(tmp.path()).unwrap();
    let mut writer = WatchLogWriter::new(file, &header).unwrap();

    for i in 0..5u32 {
        writer
            .write_message(
                1_000 + u64::from(i) * 10,
                "j",
                i,
                &PayloadData::UInt32(vec![i, i * 2]),
                None,
            )
            .unwrap();
    }
    writer
        .write_message(
            2_000,
            "d",
            9,
            &PayloadData::Float64(vec![0.5]),
            Some(&[2_001]),
        )
        .unwrap();

    let total = writer.bytes_written();
    writer.finish().unwrap();
    total
}

fn config_for(
    tmp: &NamedTempFile,
    format: OutputFormat,
) -> DumpConfig {
    DumpConfig {
        input: tmp.path().to_path_buf(),
        format,
        ..DumpConfig::default()
    }
}

#[test]
fn test_text_dump_of_file() {
    let tmp = NamedTempFile::new().unwrap();
    let total = write_log(&tmp);

    let mut out = Vec::new();
    let stats = run(&config_for(&tmp, OutputFormat::Text), &mut out).unwrap();

    assert_eq!(stats.messages, 6);
    assert_eq!(stats.dense, 5);
    assert_eq!(stats.sparse, 1);
    assert_eq!(stats.bytes_consumed, total);

    let text = String::from_utf8(out).unwrap();
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("File "));
    assert!(first.ends_with("watcher, var_name: myvar3, pid: 1234, ptr: 0xdeadbeef"));
    assert_eq!(text.matches("DENSE offset:").count(), 5);
    assert_eq!(text.matches("SPARSE offset:").count(), 1);
    assert!(text.contains("timestamp: 1010(10) varId: 1, type_id: I(j)"));
    assert!(text.contains("\n0.5 \n2001 \n"));
}

#[test]
fn test_json_dump_of_file() {
    let tmp = NamedTempFile::new().unwrap();
    write_log(&tmp);

    let mut out = Vec::new();
    run(&config_for(&tmp, OutputFormat::Json), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(records.len(), 7);
    assert_eq!(records[0]["kind"], "header");
    assert_eq!(records[0]["pid"], 1234);
    assert!(records[1..].iter().all(|r| r["kind"] == "message"));
    assert_eq!(records[6]["type_id"], "d");
    assert_eq!(records[6]["timestamps"], serde_json::json!([2001]));
}

#[test]
fn test_partial_output_kept_on_truncation() {
    let tmp = NamedTempFile::new().unwrap();
    let total = write_log(&tmp);

    // Обрезаем последний байт: SPARSE-сообщение становится неполным
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(tmp.path())
        .unwrap();
    file.set_len(total - 1).unwrap();

    let mut out = Vec::new();
    let err = run(&config_for(&tmp, OutputFormat::Text), &mut out).unwrap_err();
    assert!(matches!(
        err,
        CliError::Watch(WatchError::TruncatedFrame { .. })
    ));

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("DENSE offset:").count(), 5);
    assert_eq!(text.matches("SPARSE offset:").count(), 0);
}

#[test]
fn test_missing_input_file() {
    let config = DumpConfig {
        input: "/nonexistent/watch.bin".into(),
        ..DumpConfig::default()
    };

    let err = run(&config, Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Watch(WatchError::Io(_))));
}
