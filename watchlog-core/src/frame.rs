//! Кадрирование лога Watcher
//!
//! Кадр — это 4-байтовая длина (u32, little-endian), за которой следует
//! ровно столько байт записи. Блоки payload и временных меток кадров не
//! имеют: их размеры объявлены внутри предшествующей записи, и читаются они
//! через [`FrameReader::take`].

use byteorder::{ByteOrder, LittleEndian};
use watchlog_types::{WatchError, WatchResult};

/// Размер префикса длины кадра
pub const SIZE_PREFIX_LEN: usize = 4;

/// Один кадр, вырезанный из буфера без копирования.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Смещение префикса длины
    pub start: usize,
    /// Префикс + запись, `[start, next)`
    pub prefixed: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Байты записи без префикса.
    pub fn body(&self) -> &'a [u8] {
        &self.prefixed[SIZE_PREFIX_LEN..]
    }

    /// Длина записи, объявленная в префиксе.
    pub fn len(&self) -> usize {
        self.prefixed.len() - SIZE_PREFIX_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Смещение сразу за записью: `start + 4 + len`.
    pub fn next(&self) -> usize {
        self.start + self.prefixed.len()
    }
}

/// Читатель кадров поверх неизменяемого буфера.
#[derive(Debug, Clone, Copy)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Читает кадр, префикс которого начинается с `offset`.
    ///
    /// Возвращает [`WatchError::TruncatedFrame`], если до конца буфера
    /// меньше 4 байт или меньше объявленной длины записи.
    pub fn read_at(
        &self,
        offset: usize,
    ) -> WatchResult<Frame<'a>> {
        let prefix = self.take(offset, SIZE_PREFIX_LEN)?;
        let len = LittleEndian::read_u32(prefix) as usize;

        // Проверяем наличие тела, затем берём весь кадр одним срезом
        self.take(offset + SIZE_PREFIX_LEN, len)?;
        let prefixed = &self.buf[offset..offset + SIZE_PREFIX_LEN + len];

        Ok(Frame {
            start: offset,
            prefixed,
        })
    }

    /// Возвращает `len` байт, начиная с `offset`, либо
    /// [`WatchError::TruncatedFrame`] с фактически доступным остатком.
    pub fn take(
        &self,
        offset: usize,
        len: usize,
    ) -> WatchResult<&'a [u8]> {
        let available = self.buf.len().saturating_sub(offset);

        match offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => Ok(&self.buf[offset..end]),
            _ => Err(WatchError::truncated(offset, len, available)),
        }
    }
}
