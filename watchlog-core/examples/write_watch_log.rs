//! Пример: запись лога Watcher через WatchLogWriter
//!
//! Пишет заголовок, два DENSE-сообщения (одно с устаревшим кодом `j`) и
//! одно SPARSE-сообщение с поэлементными метками.

use std::fs::File;

use watchlog_core::{FileHeader, PayloadData, WatchLogWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "watchlog-core/myvar3.bin";

    let file = File::create(output_path)?;
    let header = FileHeader::new("watcher", "myvar3", std::process::id(), 0x0001_2000);
    let mut writer = WatchLogWriter::new(file, &header)?;

    let ramp: Vec<u32> = (0..16).collect();
    writer.write_message(0, "j", 0, &PayloadData::UInt32(ramp.clone()), None)?;
    writer.write_message(16, "I", 0, &PayloadData::UInt32(ramp), None)?;

    let levels = PayloadData::Float32(vec![0.0, 0.25, 0.5, 0.25]);
    writer.write_message(32, "f", 1, &levels, Some(&[32, 35, 41, 48]))?;

    println!("✓ Written {} messages to {output_path}", writer.message_count());
    println!("  Bytes : {}", writer.bytes_written());

    writer.finish()?;
    Ok(())
}
