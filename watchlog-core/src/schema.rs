//! Табличный слой записей лога (FlatBuffers)
//!
//! Модуль [`watcher`] повторяет то, что `flatc --rust` генерирует по
//! `schema/watcher.fbs`: типы-обёртки над `flatbuffers::Table`,
//! верификаторы и `create`-функции для сборки записей. Порядок полей (и,
//! значит, слоты vtable) должен совпадать со схемой продюсера.
//!
//! Записи верифицируются как size-prefixed буферы по всему кадру
//! `[start, next)`: выравнивание полей отсчитывается от начала префикса, как
//! его раскладывает билдер продюсера.

use watchlog_types::{FileHeader, WatchError, WatchResult};

use crate::frame::Frame;

pub const FILE_HEADER_RECORD: &str = "FileHeader";
pub const DATA_MSG_RECORD: &str = "DataMsg";

pub mod watcher {
    use flatbuffers::{
        FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Table, Verifiable, Verifier,
        VOffsetT, WIPOffset,
    };

    ////////////////////////////////////////////////////////////////////////////
    // FileHeader
    ////////////////////////////////////////////////////////////////////////////

    #[derive(Copy, Clone, PartialEq)]
    pub struct FileHeader<'a> {
        pub _tab: Table<'a>,
    }

    pub struct FileHeaderArgs<'a> {
        pub what: Option<WIPOffset<&'a str>>,
        pub var_name: Option<WIPOffset<&'a str>>,
        pub pid: u32,
        pub ptr: u64,
    }

    impl<'a> Follow<'a> for FileHeader<'a> {
        type Inner = FileHeader<'a>;

        #[inline]
        unsafe fn follow(
            buf: &'a [u8],
            loc: usize,
        ) -> Self::Inner {
            Self {
                _tab: Table::new(buf, loc),
            }
        }
    }

    impl<'a> FileHeader<'a> {
        pub const VT_WHAT: VOffsetT = 4;
        pub const VT_VAR_NAME: VOffsetT = 6;
        pub const VT_PID: VOffsetT = 8;
        pub const VT_PTR: VOffsetT = 10;

        pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
            fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
            args: &'args FileHeaderArgs<'args>,
        ) -> WIPOffset<FileHeader<'bldr>> {
            let start = fbb.start_table();
            fbb.push_slot::<u64>(Self::VT_PTR, args.ptr, 0);
            fbb.push_slot::<u32>(Self::VT_PID, args.pid, 0);
            if let Some(x) = args.var_name {
                fbb.push_slot_always::<WIPOffset<_>>(Self::VT_VAR_NAME, x);
            }
            if let Some(x) = args.what {
                fbb.push_slot_always::<WIPOffset<_>>(Self::VT_WHAT, x);
            }
            let o = fbb.end_table(start);
            WIPOffset::new(o.value())
        }

        // SAFETY (все аксессоры): таблица получена через
        // `flatbuffers::size_prefixed_root`, который её верифицировал.

        pub fn what(&self) -> Option<&'a str> {
            unsafe {
                self._tab
                    .get::<ForwardsUOffset<&str>>(Self::VT_WHAT, None)
            }
        }

        pub fn var_name(&self) -> Option<&'a str> {
            unsafe {
                self._tab
                    .get::<ForwardsUOffset<&str>>(Self::VT_VAR_NAME, None)
            }
        }

        pub fn pid(&self) -> u32 {
            unsafe { self._tab.get::<u32>(Self::VT_PID, Some(0)).unwrap_or(0) }
        }

        pub fn ptr(&self) -> u64 {
            unsafe { self._tab.get::<u64>(Self::VT_PTR, Some(0)).unwrap_or(0) }
        }
    }

    impl Verifiable for FileHeader<'_> {
        #[inline]
        fn run_verifier(
            v: &mut Verifier,
            pos: usize,
        ) -> Result<(), InvalidFlatbuffer> {
            v.visit_table(pos)?
                .visit_field::<ForwardsUOffset<&str>>("what", Self::VT_WHAT, false)?
                .visit_field::<ForwardsUOffset<&str>>("var_name", Self::VT_VAR_NAME, false)?
                .visit_field::<u32>("pid", Self::VT_PID, false)?
                .visit_field::<u64>("ptr", Self::VT_PTR, false)?
                .finish();
            Ok(())
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // DataMsg
    ////////////////////////////////////////////////////////////////////////////

    #[derive(Copy, Clone, PartialEq)]
    pub struct DataMsg<'a> {
        pub _tab: Table<'a>,
    }

    pub struct DataMsgArgs<'a> {
        pub timestamp: u64,
        pub type_id: Option<WIPOffset<&'a str>>,
        pub var_id: u32,
        pub payload_data_size: u32,
        pub payload_timestamp_size: u32,
    }

    impl<'a> Follow<'a> for DataMsg<'a> {
        type Inner = DataMsg<'a>;

        #[inline]
        unsafe fn follow(
            buf: &'a [u8],
            loc: usize,
        ) -> Self::Inner {
            Self {
                _tab: Table::new(buf, loc),
            }
        }
    }

    impl<'a> DataMsg<'a> {
        pub const VT_TIMESTAMP: VOffsetT = 4;
        pub const VT_TYPE_ID: VOffsetT = 6;
        pub const VT_VAR_ID: VOffsetT = 8;
        pub const VT_PAYLOAD_DATA_SIZE: VOffsetT = 10;
        pub const VT_PAYLOAD_TIMESTAMP_SIZE: VOffsetT = 12;

        pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
            fbb: &'mut_bldr mut FlatBufferBuilder<'bldr>,
            args: &'args DataMsgArgs<'args>,
        ) -> WIPOffset<DataMsg<'bldr>> {
            let start = fbb.start_table();
            fbb.push_slot::<u64>(Self::VT_TIMESTAMP, args.timestamp, 0);
            fbb.push_slot::<u32>(
                Self::VT_PAYLOAD_TIMESTAMP_SIZE,
                args.payload_timestamp_size,
                0,
            );
            fbb.push_slot::<u32>(Self::VT_PAYLOAD_DATA_SIZE, args.payload_data_size, 0);
            fbb.push_slot::<u32>(Self::VT_VAR_ID, args.var_id, 0);
            if let Some(x) = args.type_id {
                fbb.push_slot_always::<WIPOffset<_>>(Self::VT_TYPE_ID, x);
            }
            let o = fbb.end_table(start);
            WIPOffset::new(o.value())
        }

        pub fn timestamp(&self) -> u64 {
            unsafe {
                self._tab
                    .get::<u64>(Self::VT_TIMESTAMP, Some(0))
                    .unwrap_or(0)
            }
        }

        pub fn type_id(&self) -> Option<&'a str> {
            unsafe {
                self._tab
                    .get::<ForwardsUOffset<&str>>(Self::VT_TYPE_ID, None)
            }
        }

        pub fn var_id(&self) -> u32 {
            unsafe { self._tab.get::<u32>(Self::VT_VAR_ID, Some(0)).unwrap_or(0) }
        }

        pub fn payload_data_size(&self) -> u32 {
            unsafe {
                self._tab
                    .get::<u32>(Self::VT_PAYLOAD_DATA_SIZE, Some(0))
                    .unwrap_or(0)
            }
        }

        pub fn payload_timestamp_size(&self) -> u32 {
            unsafe {
                self._tab
                    .get::<u32>(Self::VT_PAYLOAD_TIMESTAMP_SIZE, Some(0))
                    .unwrap_or(0)
            }
        }
    }

    impl Verifiable for DataMsg<'_> {
        #[inline]
        fn run_verifier(
            v: &mut Verifier,
            pos: usize,
        ) -> Result<(), InvalidFlatbuffer> {
            v.visit_table(pos)?
                .visit_field::<u64>("timestamp", Self::VT_TIMESTAMP, false)?
                .visit_field::<ForwardsUOffset<&str>>("type_id", Self::VT_TYPE_ID, false)?
                .visit_field::<u32>("var_id", Self::VT_VAR_ID, false)?
                .visit_field::<u32>("payload_data_size", Self::VT_PAYLOAD_DATA_SIZE, false)?
                .visit_field::<u32>(
                    "payload_timestamp_size",
                    Self::VT_PAYLOAD_TIMESTAMP_SIZE,
                    false,
                )?
                .finish();
            Ok(())
        }
    }
}

/// Поля записи `DataMsg` до трансляции кода типа.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataMsgRecord<'a> {
    pub timestamp: u64,
    pub type_id: &'a str,
    pub var_id: u32,
    pub payload_data_size: u32,
    pub payload_timestamp_size: u32,
}

/// Декодирует кадр как запись `FileHeader`.
///
/// Отсутствующие строковые поля читаются как пустые строки.
pub fn decode_file_header(frame: &Frame<'_>) -> WatchResult<FileHeader> {
    let table = flatbuffers::size_prefixed_root::<watcher::FileHeader>(frame.prefixed)
        .map_err(|e| WatchError::malformed(frame.start, FILE_HEADER_RECORD, e.to_string()))?;

    Ok(FileHeader {
        what: table.what().unwrap_or_default().to_owned(),
        var_name: table.var_name().unwrap_or_default().to_owned(),
        pid: table.pid(),
        ptr: table.ptr(),
    })
}

/// Декодирует кадр как запись `DataMsg`.
///
/// Отсутствующий `type_id` даёт [`WatchError::MalformedRecord`].
pub fn decode_data_msg<'a>(frame: &Frame<'a>) -> WatchResult<DataMsgRecord<'a>> {
    let table = flatbuffers::size_prefixed_root::<watcher::DataMsg>(frame.prefixed)
        .map_err(|e| WatchError::malformed(frame.start, DATA_MSG_RECORD, e.to_string()))?;

    let type_id = table
        .type_id()
        .ok_or_else(|| WatchError::malformed(frame.start, DATA_MSG_RECORD, "missing type_id"))?;

    Ok(DataMsgRecord {
        timestamp: table.timestamp(),
        type_id,
        var_id: table.var_id(),
        payload_data_size: table.payload_data_size(),
        payload_timestamp_size: table.payload_timestamp_size(),
    })
}

#[cfg(test)]
mod tests {
    use flatbuffers::FlatBufferBuilder;

    use super::{watcher::*, *};
    use crate::frame::FrameReader;

    fn header_bytes() -> Vec<u8> {
        let mut fbb = FlatBufferBuilder::new();
        let what = fbb.create_string("watcher");
        let var_name = fbb.create_string("myvar3");
        let root = watcher::FileHeader::create(
            &mut fbb,
            &FileHeaderArgs {
                what: Some(what),
                var_name: Some(var_name),
                pid: 1234,
                ptr: 0xdead_beef,
            },
        );
        fbb.finish_size_prefixed(root, None);
        fbb.finished_data().to_vec()
    }

    fn data_msg_bytes(type_id: Option<&str>) -> Vec<u8> {
        let mut fbb = FlatBufferBuilder::new();
        let type_id = type_id.map(|t| fbb.create_string(t));
        let root = DataMsg::create(
            &mut fbb,
            &DataMsgArgs {
                timestamp: 44_100,
                type_id,
                var_id: 3,
                payload_data_size: 16,
                payload_timestamp_size: 16,
            },
        );
        fbb.finish_size_prefixed(root, None);
        fbb.finished_data().to_vec()
    }

    #[test]
    fn test_decode_file_header() {
        let buf = header_bytes();
        let frame = FrameReader::new(&buf).read_at(0).unwrap();
        let header = decode_file_header(&frame).unwrap();

        assert_eq!(header.what, "watcher");
        assert_eq!(header.var_name, "myvar3");
        assert_eq!(header.pid, 1234);
        assert_eq!(header.ptr, 0xdead_beef);
        assert_eq!(frame.next(), buf.len());
    }

    #[test]
    fn test_decode_data_msg() {
        let buf = data_msg_bytes(Some("f"));
        let frame = FrameReader::new(&buf).read_at(0).unwrap();
        let record = decode_data_msg(&frame).unwrap();

        assert_eq!(record.timestamp, 44_100);
        assert_eq!(record.type_id, "f");
        assert_eq!(record.var_id, 3);
        assert_eq!(record.payload_data_size, 16);
        assert_eq!(record.payload_timestamp_size, 16);
    }

    #[test]
    fn test_missing_type_id_is_malformed() {
        let buf = data_msg_bytes(None);
        let frame = FrameReader::new(&buf).read_at(0).unwrap();
        let err = decode_data_msg(&frame).unwrap_err();

        assert!(matches!(
            err,
            WatchError::MalformedRecord {
                record: DATA_MSG_RECORD,
                ..
            }
        ));
    }

    #[test]
    fn test_garbage_frame_is_malformed() {
        // Корневое смещение указывает далеко за пределы записи
        let mut buf = 8u32.to_le_bytes().to_vec();
        buf.extend_from_slice(&[0xff, 0xff, 0x00, 0x00, 0, 0, 0, 0]);

        let frame = FrameReader::new(&buf).read_at(0).unwrap();
        let err = decode_file_header(&frame).unwrap_err();

        assert!(matches!(err, WatchError::MalformedRecord { offset: 0, .. }));
    }
}
