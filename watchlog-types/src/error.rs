use thiserror::Error;

/// Результат для операций watchlog
pub type WatchResult<T> = std::result::Result<T, WatchError>;

/// Ошибки декодирования лога Watcher.
///
/// Все варианты, кроме [`WatchError::Io`], терминальны для текущего прохода
/// декодера: повторной синхронизации нет.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Буфер закончился раньше, чем заявленная длина (префикс, кадр,
    /// payload или блок временных меток)
    #[error("Truncated frame at offset {offset}: expected {expected} bytes, {available} available")]
    TruncatedFrame {
        offset: usize,
        expected: usize,
        available: usize,
    },

    /// Запись FlatBuffers не прошла верификацию или лишена обязательного поля
    #[error("Malformed {record} record at offset {offset}: {reason}")]
    MalformedRecord {
        offset: usize,
        record: &'static str,
        reason: String,
    },

    /// Код типа (после трансляции) не соответствует ни одному формату
    #[error("Unknown type code {code:?} at offset {offset}")]
    UnknownTypeCode { offset: usize, code: String },

    /// Размеры блоков не согласуются между собой
    #[error("Size mismatch at offset {offset}: {what}: expected {expected}, found {found}")]
    SizeMismatch {
        offset: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Удобные конструкторы
    pub fn truncated(
        offset: usize,
        expected: usize,
        available: usize,
    ) -> Self {
        Self::TruncatedFrame {
            offset,
            expected,
            available,
        }
    }

    pub fn malformed<S: Into<String>>(
        offset: usize,
        record: &'static str,
        reason: S,
    ) -> Self {
        Self::MalformedRecord {
            offset,
            record,
            reason: reason.into(),
        }
    }

    /// Смещение в байтах, на котором обнаружено нарушение.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::TruncatedFrame { offset, .. }
            | Self::MalformedRecord { offset, .. }
            | Self::UnknownTypeCode { offset, .. }
            | Self::SizeMismatch { offset, .. } => Some(*offset),
            Self::Io(_) => None,
        }
    }
}
