// Markshelf services
// Backend contract and its implementations, the stateless view pipeline, and settings.

pub mod backend;
pub mod facet_counter;
pub mod filter_pipeline;
#[cfg(feature = "http")]
pub mod http_backend;
pub mod memory_backend;
pub mod settings_engine;
pub mod sqlite_backend;
pub mod tag_palette;
