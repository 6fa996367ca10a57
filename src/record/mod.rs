mod codec;
mod event_record;

pub use event_record::{EventRecord, PayloadError};
