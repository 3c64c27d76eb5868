use serde::Serialize;

use crate::PayloadData;

/// Режим временных меток сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimestampMode {
    /// Без поэлементных меток (`payload_timestamp_size == 0`)
    Dense,
    /// Одна u32-метка на каждый элемент payload
    Sparse,
}

impl TimestampMode {
    pub fn from_timestamp_size(size: u32) -> Self {
        if size == 0 {
            TimestampMode::Dense
        } else {
            TimestampMode::Sparse
        }
    }
}

impl std::fmt::Display for TimestampMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TimestampMode::Dense => write!(f, "DENSE"),
            TimestampMode::Sparse => write!(f, "SPARSE"),
        }
    }
}

/// Полностью собранное сообщение данных: поля записи `DataMsg`,
/// типизированный payload и (в SPARSE режиме) временные метки.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataMessage {
    /// Смещение кадра сообщения во входном буфере
    pub offset: usize,
    /// Длина записи `DataMsg` без 4-байтового префикса
    pub frame_len: usize,
    /// Метка времени первого элемента
    pub timestamp: u64,
    /// Канонический код типа (после трансляции)
    pub type_id: char,
    /// Код типа в том виде, в каком его записал продюсер
    pub source_type_id: char,
    /// Идентификатор логической переменной
    pub var_id: u32,
    pub payload_data_size: u32,
    pub payload_timestamp_size: u32,
    pub mode: TimestampMode,
    pub data: PayloadData,
    /// Пусто в DENSE режиме
    pub timestamps: Vec<u32>,
}

impl DataMessage {
    /// Сколько байт сообщение занимает в файле: префикс, запись, payload и
    /// метки.
    pub fn wire_len(&self) -> usize {
        4 + self.frame_len + self.payload_data_size as usize + self.payload_timestamp_size as usize
    }

    /// Смещение, с которого начинается следующий кадр.
    pub fn end_offset(&self) -> usize {
        self.offset + self.wire_len()
    }

    pub fn is_sparse(&self) -> bool {
        self.mode == TimestampMode::Sparse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_size() {
        assert_eq!(TimestampMode::from_timestamp_size(0), TimestampMode::Dense);
        assert_eq!(TimestampMode::from_timestamp_size(4), TimestampMode::Sparse);
        assert_eq!(TimestampMode::Sparse.to_string(), "SPARSE");
    }

    #[test]
    fn test_wire_len() {
        let msg = DataMessage {
            offset: 48,
            frame_len: 60,
            timestamp: 100,
            type_id: 'I',
            source_type_id: 'j',
            var_id: 0,
            payload_data_size: 8,
            payload_timestamp_size: 8,
            mode: TimestampMode::Sparse,
            data: PayloadData::UInt32(vec![7, 9]),
            timestamps: vec![100, 101],
        };

        assert_eq!(msg.wire_len(), 4 + 60 + 8 + 8);
        assert_eq!(msg.end_offset(), 48 + 80);
        assert!(msg.is_sparse());
    }
}
