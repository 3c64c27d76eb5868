use std::path::Path;

use log::{debug, trace, warn};
use watchlog_types::{DataMessage, FileHeader, TimestampMode, WatchError, WatchResult};

use crate::{
    frame::FrameReader,
    payload::{decode_elements, decode_timestamps},
    schema::{decode_data_msg, decode_file_header},
    sink::MessageSink,
    type_code::resolve_type_id,
};

/// Статистика, накопленная [`StreamDecoder`] в процессе прохода.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Успешно декодированных сообщений.
    pub messages: u64,
    pub dense: u64,
    pub sparse: u64,
    /// Сумма длин payload по всем сообщениям.
    pub elements: u64,
    /// Байт от начала буфера до курсора (включая заголовок).
    pub bytes_consumed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
    Failed,
}

/// Потоковый декодер лога Watcher поверх буфера в памяти.
///
/// Заголовок декодируется в [`StreamDecoder::new`], сообщения — лениво, по
/// одному на каждый вызов [`Iterator::next`]. После первой ошибки итератор
/// больше ничего не возвращает: кадрированный поток без маркеров
/// синхронизации продолжить нельзя.
pub struct StreamDecoder<'a> {
    reader: FrameReader<'a>,
    header: FileHeader,
    cursor: usize,
    stats: DecodeStats,
    state: State,
}

impl<'a> StreamDecoder<'a> {
    /// Создаёт декодер, читая и декодируя заголовок из первого кадра.
    pub fn new(buf: &'a [u8]) -> WatchResult<Self> {
        let reader = FrameReader::new(buf);
        let frame = reader.read_at(0)?;
        let header = decode_file_header(&frame)?;

        debug!(
            "header: {header} ({} bytes), buffer {} bytes",
            frame.len(),
            buf.len()
        );

        Ok(Self {
            reader,
            header,
            cursor: frame.next(),
            stats: DecodeStats {
                bytes_consumed: frame.next() as u64,
                ..DecodeStats::default()
            },
            state: State::Running,
        })
    }

    /// Возвращает следующее сообщение или `None` в конце буфера.
    pub fn next_message(&mut self) -> Option<WatchResult<DataMessage>> {
        if self.state != State::Running {
            return None;
        }

        if self.cursor == self.reader.len() {
            self.state = State::Finished;
            debug!(
                "stream end at {}: {} messages ({} dense, {} sparse)",
                self.cursor, self.stats.messages, self.stats.dense, self.stats.sparse
            );
            return None;
        }

        match self.decode_at(self.cursor) {
            Ok(msg) => {
                self.cursor = msg.end_offset();
                self.stats.messages += 1;
                self.stats.elements += msg.data.len() as u64;
                self.stats.bytes_consumed = self.cursor as u64;
                match msg.mode {
                    TimestampMode::Dense => self.stats.dense += 1,
                    TimestampMode::Sparse => self.stats.sparse += 1,
                }
                Some(Ok(msg))
            }
            Err(e) => {
                self.state = State::Failed;
                warn!("decode stopped after {} messages: {e}", self.stats.messages);
                Some(Err(e))
            }
        }
    }

    /// Декодирует один блок `[кадр DataMsg][данные][метки]` с `offset`.
    fn decode_at(
        &self,
        offset: usize,
    ) -> WatchResult<DataMessage> {
        let frame = self.reader.read_at(offset)?;
        let record = decode_data_msg(&frame)?;
        let (source_type_id, element) = resolve_type_id(record.type_id, frame.start)?;

        let p0 = frame.next();
        let data_bytes = self
            .reader
            .take(p0, record.payload_data_size as usize)?;
        let p1 = p0 + data_bytes.len();
        let ts_bytes = self
            .reader
            .take(p1, record.payload_timestamp_size as usize)?;

        let data = decode_elements(element, data_bytes, p0)?;
        let timestamps = decode_timestamps(ts_bytes, p1)?;
        let mode = TimestampMode::from_timestamp_size(record.payload_timestamp_size);

        if mode == TimestampMode::Sparse && timestamps.len() != data.len() {
            return Err(WatchError::SizeMismatch {
                offset: p1,
                what: "sparse timestamp count",
                expected: data.len(),
                found: timestamps.len(),
            });
        }

        trace!(
            "{mode} offset: {offset} size: {}, timestamp: {} varId: {}, type_id: {}({source_type_id}), n: {}",
            frame.len(),
            record.timestamp,
            record.var_id,
            element.code(),
            data.len()
        );

        Ok(DataMessage {
            offset,
            frame_len: frame.len(),
            timestamp: record.timestamp,
            type_id: element.code(),
            source_type_id,
            var_id: record.var_id,
            payload_data_size: record.payload_data_size,
            payload_timestamp_size: record.payload_timestamp_size,
            mode,
            data,
            timestamps,
        })
    }

    /// Декодированный заголовок файла.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Текущее смещение: сумма размеров всех пройденных областей.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Накопленная статистика.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// `true`, если курсор дошёл ровно до конца буфера.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }
}

impl Iterator for StreamDecoder<'_> {
    type Item = WatchResult<DataMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_message()
    }
}

impl std::iter::FusedIterator for StreamDecoder<'_> {}

/// Прогоняет весь буфер через `sink`: сначала заголовок, затем сообщения.
///
/// Останавливается на первой ошибке декодера или sink'а.
pub fn decode_into<S: MessageSink + ?Sized>(
    buf: &[u8],
    sink: &mut S,
) -> WatchResult<DecodeStats> {
    let mut decoder = StreamDecoder::new(buf)?;
    sink.header(decoder.header())?;

    while let Some(msg) = decoder.next_message() {
        sink.message(&msg?)?;
    }

    Ok(decoder.stats().clone())
}

/// Convenience: декодирует весь буфер, собирая сообщения в вектор.
pub fn decode_all(buf: &[u8]) -> WatchResult<(FileHeader, Vec<DataMessage>)> {
    let decoder = StreamDecoder::new(buf)?;
    let header = decoder.header().clone();
    let messages = decoder.collect::<WatchResult<Vec<_>>>()?;

    Ok((header, messages))
}

/// Читает файл лога целиком (внешний шаг перед декодированием).
pub fn read_log_file<P: AsRef<Path>>(path: P) -> WatchResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}
