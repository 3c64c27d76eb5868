pub mod element;
pub mod error;
pub mod header;
pub mod message;
pub mod payload;

pub use element::*;
pub use error::*;
pub use header::*;
pub use message::*;
pub use payload::*;
