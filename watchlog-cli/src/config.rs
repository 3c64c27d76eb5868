use std::path::PathBuf;

use log::LevelFilter;

/// Формат вывода дампа.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Построчный текст в духе эталонного дампа.
    Text,
    /// JSON Lines: заголовок, затем по объекту на сообщение.
    Json,
}

/// Полная конфигурация одного запуска дампа.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Путь к .bin файлу лога
    pub input: PathBuf,
    /// Формат вывода
    pub format: OutputFormat,
    /// Печатать значения элементов и меток (только text)
    pub show_elements: bool,
    /// Не больше N элементов на сообщение (None = все)
    pub max_elements: Option<usize>,
    /// Только ошибки в логе
    pub quiet: bool,
    /// Отладочный лог декодера
    pub verbose: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl DumpConfig {
    /// Уровень логирования по флагам; `quiet` важнее `verbose`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Сколько элементов печатать: `Some(0)`, если элементы скрыты.
    pub fn element_limit(&self) -> Option<usize> {
        if self.show_elements {
            self.max_elements
        } else {
            Some(0)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat, DumpConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" | "jsonl" | "ndjson" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{s}'. Use: text, json")),
        }
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("watcher.bin"),
            format: OutputFormat::Text,
            show_elements: true,
            max_elements: None,
            quiet: false,
            verbose: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
