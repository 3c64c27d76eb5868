pub mod config;
pub mod error;
pub mod printer;
pub mod summary;

pub use config::*;
pub use error::*;
pub use printer::*;
pub use summary::*;

use std::io::{BufWriter, Write};

use log::info;
use watchlog_core::{decode_into, read_log_file, DecodeStats};

/// Читает файл из `config.input` и печатает его в `out` в выбранном формате.
///
/// Сообщения, напечатанные до ошибки декодирования, остаются в `out`.
pub fn run<W: Write>(
    config: &DumpConfig,
    out: W,
) -> CliResult<DecodeStats> {
    let buf = read_log_file(&config.input)?;
    info!("Reading {:?} ({} bytes)", config.input, buf.len());

    let mut out = BufWriter::new(out);
    let result = match config.format {
        OutputFormat::Text => {
            let mut sink = TextSink::new(
                &mut out,
                config.input.display().to_string(),
                config.element_limit(),
            );
            decode_into(&buf, &mut sink)
        }
        OutputFormat::Json => decode_into(&buf, &mut JsonSink::new(&mut out)),
    };

    // Частичный вывод сбрасываем и при ошибке
    out.flush()?;
    Ok(result?)
}
