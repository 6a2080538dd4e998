pub mod scheme_service;
pub mod stamps;

pub use scheme_service::{SchemeError, SchemeService};
pub use stamps::{StampSource, SystemStamps};
