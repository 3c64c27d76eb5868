use std::io::{BufWriter, Write};

use flatbuffers::FlatBufferBuilder;
use watchlog_types::{FileHeader, PayloadData, WatchError, WatchResult};

use crate::{
    payload::{encode_elements, encode_timestamps},
    schema::{
        watcher::{self, DataMsgArgs, FileHeaderArgs},
        DATA_MSG_RECORD,
    },
    type_code::resolve_type_id,
};

/// Потоковый писатель логов Watcher.
///
/// Раскладка совпадает с тем, что пишет продюсер: size-prefixed запись
/// `FileHeader`, затем для каждого сообщения size-prefixed `DataMsg` и сразу
/// за ним сырые блоки данных и временных меток.
pub struct WatchLogWriter<W: Write> {
    writer: BufWriter<W>,
    fbb: FlatBufferBuilder<'static>,
    message_count: u64,
    bytes_written: u64,
}

impl<W: Write> WatchLogWriter<W> {
    /// Создаёт новый писатель, немедленно записывая заголовок в поток.
    pub fn new(
        inner: W,
        header: &FileHeader,
    ) -> WatchResult<Self> {
        let mut this = Self {
            writer: BufWriter::new(inner),
            fbb: FlatBufferBuilder::new(),
            message_count: 0,
            bytes_written: 0,
        };

        let what = this.fbb.create_string(&header.what);
        let var_name = this.fbb.create_string(&header.var_name);
        let root = watcher::FileHeader::create(
            &mut this.fbb,
            &FileHeaderArgs {
                what: Some(what),
                var_name: Some(var_name),
                pid: header.pid,
                ptr: header.ptr,
            },
        );
        this.fbb.finish_size_prefixed(root, None);
        this.flush_record()?;

        Ok(this)
    }

    /// Записывает одно сообщение.
    ///
    /// `type_code` пишется как есть (в том числе устаревший код), но обязан
    /// после трансляции описывать формат `data`. `timestamps` делает
    /// сообщение SPARSE; их число должно совпадать с числом элементов.
    pub fn write_message(
        &mut self,
        timestamp: u64,
        type_code: &str,
        var_id: u32,
        data: &PayloadData,
        timestamps: Option<&[u32]>,
    ) -> WatchResult<()> {
        let offset = self.bytes_written as usize;
        let (_, element) = resolve_type_id(type_code, offset)?;

        if element != data.element_type() {
            return Err(WatchError::malformed(
                offset,
                DATA_MSG_RECORD,
                format!(
                    "type_id {type_code:?} does not describe {:?} payload",
                    data.element_type()
                ),
            ));
        }

        let timestamps = timestamps.unwrap_or_default();
        if !timestamps.is_empty() && timestamps.len() != data.len() {
            return Err(WatchError::SizeMismatch {
                offset,
                what: "sparse timestamp count",
                expected: data.len(),
                found: timestamps.len(),
            });
        }

        self.write_raw(
            timestamp,
            type_code,
            var_id,
            &encode_elements(data),
            &encode_timestamps(timestamps),
        )
    }

    /// Записывает сообщение с произвольными блоками без проверок.
    ///
    /// Размеры в записи `DataMsg` берутся из длин `data` и `timestamps`.
    pub fn write_raw(
        &mut self,
        timestamp: u64,
        type_code: &str,
        var_id: u32,
        data: &[u8],
        timestamps: &[u8],
    ) -> WatchResult<()> {
        let offset = self.bytes_written as usize;
        let payload_data_size = block_size(data, offset, "payload_data_size")?;
        let payload_timestamp_size = block_size(timestamps, offset, "payload_timestamp_size")?;

        let type_id = self.fbb.create_string(type_code);
        let root = watcher::DataMsg::create(
            &mut self.fbb,
            &DataMsgArgs {
                timestamp,
                type_id: Some(type_id),
                var_id,
                payload_data_size,
                payload_timestamp_size,
            },
        );
        self.fbb.finish_size_prefixed(root, None);
        self.flush_record()?;

        self.writer.write_all(data)?;
        self.writer.write_all(timestamps)?;
        self.bytes_written += (data.len() + timestamps.len()) as u64;
        self.message_count += 1;

        Ok(())
    }

    /// Пишет готовую запись из билдера и сбрасывает его состояние.
    fn flush_record(&mut self) -> WatchResult<()> {
        let record = self.fbb.finished_data();
        self.writer.write_all(record)?;
        self.bytes_written += record.len() as u64;
        self.fbb.reset();
        Ok(())
    }

    /// Количество записанных сообщений.
    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Всего записано байт, включая заголовок.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Завершает запись и возвращает внутренний поток.
    pub fn finish(self) -> WatchResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| WatchError::Io(e.into_error()))
    }
}

fn block_size(
    block: &[u8],
    offset: usize,
    what: &'static str,
) -> WatchResult<u32> {
    u32::try_from(block.len()).map_err(|_| WatchError::SizeMismatch {
        offset,
        what,
        expected: u32::MAX as usize,
        found: block.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameReader, SIZE_PREFIX_LEN};

    fn header() -> FileHeader {
        FileHeader::new("watcher", "gain", 7, 0x7fff_0000_1234)
    }

    #[test]
    fn test_header_frame_is_size_prefixed() {
        let buf = WatchLogWriter::new(Vec::new(), &header())
            .unwrap()
            .finish()
            .unwrap();

        let frame = FrameReader::new(&buf).read_at(0).unwrap();
        assert_eq!(frame.next(), buf.len());
        assert_eq!(frame.len() + SIZE_PREFIX_LEN, buf.len());
    }

    #[test]
    fn test_payload_follows_record_inline() {
        let mut w = WatchLogWriter::new(Vec::new(), &header()).unwrap();
        let header_len = w.bytes_written() as usize;
        w.write_message(
            1,
            "H",
            0,
            &PayloadData::UInt16(vec![0x0102, 0x0304]),
            Some(&[5, 6]),
        )
        .unwrap();
        let total = w.bytes_written() as usize;
        let buf = w.finish().unwrap();

        assert_eq!(buf.len(), total);

        let frame = FrameReader::new(&buf).read_at(header_len).unwrap();
        let tail = &buf[frame.next()..];
        assert_eq!(tail, &[0x02, 0x01, 0x04, 0x03, 5, 0, 0, 0, 6, 0, 0, 0]);
    }

    #[test]
    fn test_counts() {
        let mut w = WatchLogWriter::new(Vec::new(), &header()).unwrap();
        w.write_raw(0, "B", 0, &[1, 2], &[]).unwrap();
        w.write_raw(1, "B", 0, &[3], &[]).unwrap();
        assert_eq!(w.message_count(), 2);
    }

    #[test]
    fn test_rejects_type_mismatch() {
        let mut w = WatchLogWriter::new(Vec::new(), &header()).unwrap();
        let err = w
            .write_message(0, "f", 0, &PayloadData::UInt32(vec![1]), None)
            .unwrap_err();
        assert!(matches!(err, WatchError::MalformedRecord { .. }));
        assert_eq!(w.message_count(), 0);
    }

    #[test]
    fn test_rejects_timestamp_count_mismatch() {
        let mut w = WatchLogWriter::new(Vec::new(), &header()).unwrap();
        let err = w
            .write_message(0, "I", 0, &PayloadData::UInt32(vec![1, 2]), Some(&[1]))
            .unwrap_err();
        assert!(matches!(err, WatchError::SizeMismatch { .. }));
    }

    #[test]
    fn test_legacy_code_written_verbatim() {
        let mut w = WatchLogWriter::new(Vec::new(), &header()).unwrap();
        w.write_message(0, "j", 0, &PayloadData::UInt32(vec![1]), None)
            .unwrap();
        let buf = w.finish().unwrap();

        let reader = FrameReader::new(&buf);
        let first = reader.read_at(0).unwrap();
        let frame = reader.read_at(first.next()).unwrap();
        let record = crate::schema::decode_data_msg(&frame).unwrap();
        assert_eq!(record.type_id, "j");
    }
}
