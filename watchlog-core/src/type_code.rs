//! Трансляция устаревших кодов типа
//!
//! Продюсер пишет в `type_id` имя типа из `typeid(T).name()` (Itanium
//! mangling), а payload декодируется по каноническим кодам
//! [`ElementType`]. Таблица ниже задаёт соответствие явно; коды, которых в
//! ней нет, проходят без изменений.
//!
//! Манглированные коды, совпадающие с каноническими (`h`, `b`, `c`, `l`,
//! `m`), в таблицу не входят: угадать, кто их записал, нельзя.

use watchlog_types::{ElementType, WatchError, WatchResult};

/// Пары `(устаревший код, канонический код)`. Новые записи только
/// добавляются.
pub const LEGACY_TYPE_CODES: &[(char, char)] = &[
    ('j', 'I'), // unsigned int
    ('a', 'b'), // signed char
    ('s', 'h'), // short
    ('t', 'H'), // unsigned short
    ('x', 'q'), // long long
    ('y', 'Q'), // unsigned long long
];

/// Транслирует код по [`LEGACY_TYPE_CODES`].
pub fn translate_type_code(code: char) -> char {
    LEGACY_TYPE_CODES
        .iter()
        .find(|(legacy, _)| *legacy == code)
        .map_or(code, |&(_, canonical)| canonical)
}

/// Разбирает `type_id` записи: ровно один символ, транслированный и
/// отображённый на [`ElementType`].
///
/// Возвращает `(исходный код, формат элемента)`.
pub fn resolve_type_id(
    type_id: &str,
    offset: usize,
) -> WatchResult<(char, ElementType)> {
    let unknown = || WatchError::UnknownTypeCode {
        offset,
        code: type_id.to_owned(),
    };

    let mut chars = type_id.chars();
    let source = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(unknown()),
    };

    let element = ElementType::from_code(translate_type_code(source)).ok_or_else(unknown)?;

    Ok((source, element))
}
