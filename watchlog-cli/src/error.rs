use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Ошибка декодирования лога
    #[error("Watch log error: {0}")]
    Watch(#[from] watchlog_types::WatchError),

    /// Ошибка вывода
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
