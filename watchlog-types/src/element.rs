use serde::Serialize;

/// Формат одного элемента payload (канонический код типа)
///
/// Строчная буква кода означает знаковый тип, заглавная беззнаковый. Все значения хранятся в little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    /// `b` — i8
    Int8,
    /// `B` — u8
    UInt8,
    /// `h` — i16
    Int16,
    /// `H` — u16
    UInt16,
    /// `i` — i32
    Int32,
    /// `I` — u32
    UInt32,
    /// `q` — i64
    Int64,
    /// `Q` — u64
    UInt64,
    /// `f` — f32
    Float32,
    /// `d` — f64
    Float64,
}

impl ElementType {
    /// Все поддерживаемые форматы.
    pub const ALL: [ElementType; 10] = [
        ElementType::Int8,
        ElementType::UInt8,
        ElementType::Int16,
        ElementType::UInt16,
        ElementType::Int32,
        ElementType::UInt32,
        ElementType::Int64,
        ElementType::UInt64,
        ElementType::Float32,
        ElementType::Float64,
    ];

    /// Формат по каноническому коду. `l`/`L` не поддерживаются: их ширина
    /// зависит от платформы.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(ElementType::Int8),
            'B' => Some(ElementType::UInt8),
            'h' => Some(ElementType::Int16),
            'H' => Some(ElementType::UInt16),
            'i' => Some(ElementType::Int32),
            'I' => Some(ElementType::UInt32),
            'q' => Some(ElementType::Int64),
            'Q' => Some(ElementType::UInt64),
            'f' => Some(ElementType::Float32),
            'd' => Some(ElementType::Float64),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            ElementType::Int8 => 'b',
            ElementType::UInt8 => 'B',
            ElementType::Int16 => 'h',
            ElementType::UInt16 => 'H',
            ElementType::Int32 => 'i',
            ElementType::UInt32 => 'I',
            ElementType::Int64 => 'q',
            ElementType::UInt64 => 'Q',
            ElementType::Float32 => 'f',
            ElementType::Float64 => 'd',
        }
    }

    /// Размер одного элемента в байтах
    pub fn width(&self) -> usize {
        match self {
            ElementType::Int8 | ElementType::UInt8 => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => 8,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
