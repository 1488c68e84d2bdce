//! Overview (OVER/XOVER) data: format negotiation, line decoding and
//! streamed responses

mod date;
mod format;
mod header;
mod stream;

pub use date::{date_layouts, parse_date};
pub use format::{DEFAULT_FIELDS, FieldDescriptor, FieldKind, OverviewFormat};
pub use header::Header;
pub use stream::{ERROR_QUEUE_CAPACITY, HEADER_QUEUE_CAPACITY, OverviewStream};
