#![doc = include_str!("../README.md")]

mod client;
/// NNTP command builders and response parsers
pub mod commands;
mod config;
mod error;
/// Schema-driven overview (XOVER) decoding
pub mod overview;
mod response;

pub use client::{AsyncStream, NntpClient};
pub use commands::{NewsgroupDetail, NewsgroupOverview, NewsgroupStatus};
pub use config::ServerConfig;
pub use error::{NntpError, Result};
pub use overview::{
    DEFAULT_FIELDS, FieldDescriptor, FieldKind, Header, OverviewFormat, OverviewStream,
    parse_date as parse_overview_date,
};
pub use response::{NntpResponse, codes};
