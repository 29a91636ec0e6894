pub mod json_file;
pub mod memory;
pub mod record;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::Store;

use uuid::Uuid;

/// Globally unique job identifier
pub fn new_job_id() -> String {
    format!("JOB_{}", Uuid::new_v4().simple())
}

/// Globally unique match identifier
pub fn new_match_id() -> String {
    format!("MATCH_{}", Uuid::new_v4().simple())
}
