pub mod scheme;

pub use scheme::{DeleteSummary, Scheme, SchemeDocument, SchemeId, SchemeUpdate, Srno};
