pub mod json_hash_store;
pub mod site_writer;
pub mod traits;

pub use json_hash_store::{content_digest, JsonHashStore};
pub use site_writer::SiteWriter;
pub use traits::HashStore;
