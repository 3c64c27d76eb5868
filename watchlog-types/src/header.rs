use serde::Serialize;

/// Заголовок лога Watcher (первый кадр файла)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Категория записи (у продюсера — `"watcher"`)
    pub what: String,
    /// Имя наблюдаемой переменной
    pub var_name: String,
    /// PID процесса-продюсера
    pub pid: u32,
    /// Адрес объекта-наблюдателя в памяти продюсера
    pub ptr: u64,
}

impl FileHeader {
    pub fn new<S: Into<String>, N: Into<String>>(
        what: S,
        var_name: N,
        pid: u32,
        ptr: u64,
    ) -> Self {
        FileHeader {
            what: what.into(),
            var_name: var_name.into(),
            pid,
            ptr,
        }
    }
}

impl std::fmt::Display for FileHeader {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}, var_name: {}, pid: {}, ptr: {:#010x}",
            self.what, self.var_name, self.pid, self.ptr
        )
    }
}
