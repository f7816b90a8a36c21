//! Built-in container formats

pub mod dat_fast;

pub use dat_fast::DatFastHandler;

use crate::handler::ArchiveHandler;

/// Every built-in handler, in no particular order
pub fn builtin_handlers() -> Vec<Box<dyn ArchiveHandler>> {
    vec![Box::new(DatFastHandler)]
}
