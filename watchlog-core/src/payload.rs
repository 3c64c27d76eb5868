//! Переинтерпретация блоков payload и временных меток (little-endian)

use byteorder::{ByteOrder, LittleEndian};
use watchlog_types::{ElementType, PayloadData, WatchError, WatchResult};

/// Ширина одной временной метки в блоке SPARSE, байт
pub const TIMESTAMP_WIDTH: usize = 4;

/// Разбирает блок данных как массив элементов `ty`.
///
/// `offset` это смещение блока во входном буфере, для ошибки.
pub fn decode_elements(
    ty: ElementType,
    bytes: &[u8],
    offset: usize,
) -> WatchResult<PayloadData> {
    let width = ty.width();
    if bytes.len() % width != 0 {
        return Err(WatchError::SizeMismatch {
            offset,
            what: "payload_data_size remainder modulo element width",
            expected: 0,
            found: bytes.len() % width,
        });
    }

    let n = bytes.len() / width;

    let data = match ty {
        ElementType::Int8 => PayloadData::Int8(bytes.iter().map(|&b| b as i8).collect()),
        ElementType::UInt8 => PayloadData::UInt8(bytes.to_vec()),
        ElementType::Int16 => {
            let mut out = vec![0i16; n];
            LittleEndian::read_i16_into(bytes, &mut out);
            PayloadData::Int16(out)
        }
        ElementType::UInt16 => {
            let mut out = vec![0u16; n];
            LittleEndian::read_u16_into(bytes, &mut out);
            PayloadData::UInt16(out)
        }
        ElementType::Int32 => {
            let mut out = vec![0i32; n];
            LittleEndian::read_i32_into(bytes, &mut out);
            PayloadData::Int32(out)
        }
        ElementType::UInt32 => {
            let mut out = vec![0u32; n];
            LittleEndian::read_u32_into(bytes, &mut out);
            PayloadData::UInt32(out)
        }
        ElementType::Int64 => {
            let mut out = vec![0i64; n];
            LittleEndian::read_i64_into(bytes, &mut out);
            PayloadData::Int64(out)
        }
        ElementType::UInt64 => {
            let mut out = vec![0u64; n];
            LittleEndian::read_u64_into(bytes, &mut out);
            PayloadData::UInt64(out)
        }
        ElementType::Float32 => {
            let mut out = vec![0f32; n];
            LittleEndian::read_f32_into(bytes, &mut out);
            PayloadData::Float32(out)
        }
        ElementType::Float64 => {
            let mut out = vec![0f64; n];
            LittleEndian::read_f64_into(bytes, &mut out);
            PayloadData::Float64(out)
        }
    };

    Ok(data)
}

/// Разбирает блок временных меток (всегда u32, независимо от `type_id`).
pub fn decode_timestamps(
    bytes: &[u8],
    offset: usize,
) -> WatchResult<Vec<u32>> {
    if bytes.len() % TIMESTAMP_WIDTH != 0 {
        return Err(WatchError::SizeMismatch {
            offset,
            what: "payload_timestamp_size remainder modulo 4",
            expected: 0,
            found: bytes.len() % TIMESTAMP_WIDTH,
        });
    }

    let mut out = vec![0u32; bytes.len() / TIMESTAMP_WIDTH];
    LittleEndian::read_u32_into(bytes, &mut out);
    Ok(out)
}

/// Сериализует элементы в little-endian байты.
pub fn encode_elements(data: &PayloadData) -> Vec<u8> {
    let mut out = vec![0u8; data.byte_len()];

    match data {
        PayloadData::Int8(v) => {
            for (dst, &x) in out.iter_mut().zip(v) {
                *dst = x as u8;
            }
        }
        PayloadData::UInt8(v) => out.copy_from_slice(v),
        PayloadData::Int16(v) => LittleEndian::write_i16_into(v, &mut out),
        PayloadData::UInt16(v) => LittleEndian::write_u16_into(v, &mut out),
        PayloadData::Int32(v) => LittleEndian::write_i32_into(v, &mut out),
        PayloadData::UInt32(v) => LittleEndian::write_u32_into(v, &mut out),
        PayloadData::Int64(v) => LittleEndian::write_i64_into(v, &mut out),
        PayloadData::UInt64(v) => LittleEndian::write_u64_into(v, &mut out),
        PayloadData::Float32(v) => LittleEndian::write_f32_into(v, &mut out),
        PayloadData::Float64(v) => LittleEndian::write_f64_into(v, &mut out),
    }

    out
}

pub fn encode_timestamps(timestamps: &[u32]) -> Vec<u8> {
    let mut out = vec![0u8; timestamps.len() * TIMESTAMP_WIDTH];
    LittleEndian::write_u32_into(timestamps, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_u32_le() {
        let bytes = [7, 0, 0, 0, 9, 0, 0, 0];
        let data = decode_elements(ElementType::UInt32, &bytes, 0).unwrap();
        assert_eq!(data, PayloadData::UInt32(vec![7, 9]));
    }

    #[test]
    fn test_decode_signed_reinterprets_bits() {
        let bytes = [0xff, 0xff, 0xfe, 0xff];
        let data = decode_elements(ElementType::Int16, &bytes, 0).unwrap();
        assert_eq!(data, PayloadData::Int16(vec![-1, -2]));

        let data = decode_elements(ElementType::Int8, &[0x80, 0x7f], 0).unwrap();
        assert_eq!(data, PayloadData::Int8(vec![-128, 127]));
    }

    #[test]
    fn test_decode_float() {
        let bytes = 1.5f32.to_le_bytes();
        let data = decode_elements(ElementType::Float32, &bytes, 0).unwrap();
        assert_eq!(data, PayloadData::Float32(vec![1.5]));
    }

    #[test]
    fn test_decode_empty_block() {
        let data = decode_elements(ElementType::Float64, &[], 0).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.element_type(), ElementType::Float64);
    }

    #[test]
    fn test_partial_element_is_size_mismatch() {
        let err = decode_elements(ElementType::UInt32, &[1, 2, 3, 4, 5, 6], 80).unwrap_err();
        assert!(matches!(
            err,
            WatchError::SizeMismatch {
                offset: 80,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_timestamps_must_be_whole_u32() {
        assert_eq!(decode_timestamps(&[1, 0, 0, 0], 0).unwrap(), vec![1]);
        assert!(decode_timestamps(&[1, 0, 0], 0).is_err());
    }

    #[test]
    fn test_encode_matches_decode() {
        let samples = [
            PayloadData::Int8(vec![-5, 0, 5]),
            PayloadData::UInt16(vec![0, 65_535]),
            PayloadData::Int64(vec![i64::MIN, 42]),
            PayloadData::Float64(vec![-0.25, 1e10]),
        ];

        for data in samples {
            let bytes = encode_elements(&data);
            assert_eq!(bytes.len(), data.byte_len());
            let back = decode_elements(data.element_type(), &bytes, 0).unwrap();
            assert_eq!(back, data);
        }
    }

    #[test]
    fn test_encode_timestamps_le() {
        assert_eq!(encode_timestamps(&[0x0102_0304]), vec![4, 3, 2, 1]);
    }
}
