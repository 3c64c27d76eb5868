use watchlog_types::{DataMessage, FileHeader, WatchResult};

/// Потребитель результатов декодирования (печать, экспорт, агрегация).
///
/// Ошибка sink'а прерывает проход так же, как ошибка декодера.
pub trait MessageSink {
    /// Вызывается ровно один раз, до первого сообщения.
    fn header(
        &mut self,
        header: &FileHeader,
    ) -> WatchResult<()>;

    fn message(
        &mut self,
        msg: &DataMessage,
    ) -> WatchResult<()>;
}
