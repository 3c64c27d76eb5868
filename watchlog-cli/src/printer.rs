use std::io::Write;

use serde::Serialize;
use watchlog_core::{MessageSink, SIZE_PREFIX_LEN};
use watchlog_types::{DataMessage, FileHeader, WatchResult};

/// Текстовый дамп: строка заголовка, затем на каждое сообщение строка
/// полей, строка элементов и (для SPARSE) строка меток.
///
/// Дельта метки времени считается здесь, а не в декодере: это состояние
/// представления.
pub struct TextSink<W: Write> {
    out: W,
    label: String,
    element_limit: Option<usize>,
    prev_timestamp: u64,
}

impl<W: Write> TextSink<W> {
    /// `label` попадает в строку заголовка. `element_limit` ограничивает
    /// число элементов в строке, `Some(0)` скрывает строки значений.
    pub fn new(
        out: W,
        label: String,
        element_limit: Option<usize>,
    ) -> Self {
        Self {
            out,
            label,
            element_limit,
            prev_timestamp: 0,
        }
    }

    fn write_values(
        &mut self,
        values: &[String],
    ) -> WatchResult<()> {
        let shown = self.element_limit.unwrap_or(values.len()).min(values.len());

        for v in &values[..shown] {
            write!(self.out, "{v} ")?;
        }
        if shown < values.len() {
            write!(self.out, "... (+{})", values.len() - shown)?;
        }
        writeln!(self.out)?;

        Ok(())
    }
}

impl<W: Write> MessageSink for TextSink<W> {
    fn header(
        &mut self,
        header: &FileHeader,
    ) -> WatchResult<()> {
        writeln!(self.out, "File {}: {header}", self.label)?;
        Ok(())
    }

    fn message(
        &mut self,
        msg: &DataMessage,
    ) -> WatchResult<()> {
        let delta = i128::from(msg.timestamp) - i128::from(self.prev_timestamp);
        self.prev_timestamp = msg.timestamp;

        // Смещение печатается по началу записи, без префикса длины
        writeln!(
            self.out,
            "{} offset: {} size: {}, timestamp: {}({delta}) varId: {}, type_id: {}({}), payloadSize: {}, payloadTimestampSize: {}",
            msg.mode,
            msg.offset + SIZE_PREFIX_LEN,
            msg.frame_len,
            msg.timestamp,
            msg.var_id,
            msg.type_id,
            msg.source_type_id,
            msg.payload_data_size,
            msg.payload_timestamp_size,
        )?;

        if self.element_limit == Some(0) {
            return Ok(());
        }

        self.write_values(&msg.data.to_strings())?;

        if !msg.timestamps.is_empty() {
            let ts: Vec<String> = msg.timestamps.iter().map(ToString::to_string).collect();
            self.write_values(&ts)?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonRecord<'a> {
    Header(&'a FileHeader),
    Message(&'a DataMessage),
}

/// JSON Lines: по одному объекту на строку, заголовок первым.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_record(
        &mut self,
        record: &JsonRecord<'_>,
    ) -> WatchResult<()> {
        serde_json::to_writer(&mut self.out, record).map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> MessageSink for JsonSink<W> {
    fn header(
        &mut self,
        header: &FileHeader,
    ) -> WatchResult<()> {
        self.write_record(&JsonRecord::Header(header))
    }

    fn message(
        &mut self,
        msg: &DataMessage,
    ) -> WatchResult<()> {
        self.write_record(&JsonRecord::Message(msg))
    }
}
