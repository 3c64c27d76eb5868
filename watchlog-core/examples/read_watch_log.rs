//! Пример: чтение лога Watcher через StreamDecoder
//!
//! Демонстрирует:
//! - декодирование заголовка при создании декодера
//! - ленивую итерацию сообщений
//! - статистику прохода

use watchlog_core::{read_log_file, StreamDecoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = "watchlog-core/myvar3.bin";

    let buf = read_log_file(input_path)?;
    let mut decoder = StreamDecoder::new(&buf)?;

    println!("✓ Header: {}", decoder.header());

    for msg in &mut decoder {
        let msg = msg?;
        println!(
            "  [{}] {} ts={} var={} type={}({}) n={}",
            msg.offset,
            msg.mode,
            msg.timestamp,
            msg.var_id,
            msg.type_id,
            msg.source_type_id,
            msg.data.len()
        );
    }

    let stats = decoder.stats();
    println!("\n✓ Read complete");
    println!("  Messages : {} ({} dense, {} sparse)", stats.messages, stats.dense, stats.sparse);
    println!("  Elements : {}", stats.elements);
    println!("  Bytes    : {}", stats.bytes_consumed);

    Ok(())
}
