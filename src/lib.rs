//! Parser for free-form SOTA activation logs.
//!
//! A log is a sequence of activation blocks. Each block opens with a header line naming the
//! callsign, date and summit, followed by contact lines whose fields may be left out and are
//! then carried over from the contact before.

pub mod assign;
pub mod classify;
pub mod contest;
pub mod csv_out;
pub mod errors;
pub mod header;
pub mod json_out;
pub mod model;
pub mod patterns;
pub mod resolve;
pub mod section;
pub mod token;

pub use errors::{AppError, LineError, LogError, LogErrorKind};
pub use model::{Activation, ContactRecord, Frequency, Log, Mode, TimeOfDay};
pub use resolve::resolve_line;
pub use section::{LogParser, parse_file, parse_reader, parse_str};
