use serde::Serialize;

use crate::ElementType;

/// Типизированные элементы payload одного сообщения.
///
/// В JSON сериализуется как плоский массив чисел.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl PayloadData {
    /// Пустой payload заданного формата.
    pub fn empty(ty: ElementType) -> Self {
        match ty {
            ElementType::Int8 => PayloadData::Int8(Vec::new()),
            ElementType::UInt8 => PayloadData::UInt8(Vec::new()),
            ElementType::Int16 => PayloadData::Int16(Vec::new()),
            ElementType::UInt16 => PayloadData::UInt16(Vec::new()),
            ElementType::Int32 => PayloadData::Int32(Vec::new()),
            ElementType::UInt32 => PayloadData::UInt32(Vec::new()),
            ElementType::Int64 => PayloadData::Int64(Vec::new()),
            ElementType::UInt64 => PayloadData::UInt64(Vec::new()),
            ElementType::Float32 => PayloadData::Float32(Vec::new()),
            ElementType::Float64 => PayloadData::Float64(Vec::new()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            PayloadData::Int8(_) => ElementType::Int8,
            PayloadData::UInt8(_) => ElementType::UInt8,
            PayloadData::Int16(_) => ElementType::Int16,
            PayloadData::UInt16(_) => ElementType::UInt16,
            PayloadData::Int32(_) => ElementType::Int32,
            PayloadData::UInt32(_) => ElementType::UInt32,
            PayloadData::Int64(_) => ElementType::Int64,
            PayloadData::UInt64(_) => ElementType::UInt64,
            PayloadData::Float32(_) => ElementType::Float32,
            PayloadData::Float64(_) => ElementType::Float64,
        }
    }

    /// Количество элементов
    pub fn len(&self) -> usize {
        match self {
            PayloadData::Int8(v) => v.len(),
            PayloadData::UInt8(v) => v.len(),
            PayloadData::Int16(v) => v.len(),
            PayloadData::UInt16(v) => v.len(),
            PayloadData::Int32(v) => v.len(),
            PayloadData::UInt32(v) => v.len(),
            PayloadData::Int64(v) => v.len(),
            PayloadData::UInt64(v) => v.len(),
            PayloadData::Float32(v) => v.len(),
            PayloadData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Размер payload на проводе, в байтах.
    pub fn byte_len(&self) -> usize {
        self.len() * self.element_type().width()
    }

    /// Текстовое представление каждого элемента (для дампов).
    pub fn to_strings(&self) -> Vec<String> {
        fn render<T: ToString>(v: &[T]) -> Vec<String> {
            v.iter().map(ToString::to_string).collect()
        }

        match self {
            PayloadData::Int8(v) => render(v),
            PayloadData::UInt8(v) => render(v),
            PayloadData::Int16(v) => render(v),
            PayloadData::UInt16(v) => render(v),
            PayloadData::Int32(v) => render(v),
            PayloadData::UInt32(v) => render(v),
            PayloadData::Int64(v) => render(v),
            PayloadData::UInt64(v) => render(v),
            PayloadData::Float32(v) => render(v),
            PayloadData::Float64(v) => render(v),
        }
    }
}
