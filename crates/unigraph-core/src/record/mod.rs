//! Input records: XML parsing and typed entry extraction.

pub mod entry;
pub mod xml;

pub use entry::{Citation, DbReference, Entry, GeneName, Reference};
pub use xml::{load_entry, parse_document, select_entry, Value};
