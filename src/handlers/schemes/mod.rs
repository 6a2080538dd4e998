pub mod bulk;
pub mod collection;
pub mod record;
pub mod search;

// Re-export handler functions for use in routing
pub use collection::get as collection_get;
pub use collection::post as collection_post;
pub use collection::put as collection_put;

pub use record::get as record_get;
pub use record::delete as record_delete;

pub use search::get as search_get;

pub use bulk::delete_by_name;
pub use bulk::delete_by_names;
pub use bulk::bulk_delete;
