pub mod records;
mod store;

pub use records::{MalformedRecord, RecordError};
pub use store::{LoadReport, Loaded, Store, StoreError, Unloaded, CONFIG_FILE};
