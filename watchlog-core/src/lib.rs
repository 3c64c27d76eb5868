//! Декодер лога Watcher
//!
//! Лог — поток size-prefixed записей FlatBuffers: заголовок `FileHeader`,
//! затем записи `DataMsg`, за каждой из которых без префикса идут блоки
//! payload и временных меток. Размеры этих блоков объявлены внутри
//! предшествующей записи.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use watchlog_core::{read_log_file, StreamDecoder};
//!
//! let buf = read_log_file("myvar3.bin")?;
//! let mut decoder = StreamDecoder::new(&buf)?;
//! println!("{}", decoder.header());
//!
//! for msg in &mut decoder {
//!     let msg = msg?;
//!     println!("{} {} n={}", msg.mode, msg.timestamp, msg.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decoder;
pub mod frame;
pub mod payload;
pub mod schema;
pub mod sink;
pub mod type_code;
pub mod writer;

pub use decoder::*;
pub use frame::{Frame, FrameReader, SIZE_PREFIX_LEN};
pub use sink::*;
pub use type_code::{translate_type_code, LEGACY_TYPE_CODES};
pub use writer::*;

pub use watchlog_types::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
