//! stepscout_engine: filesystem scanning and the catalog-owning engine for
//! StepScout hosts. All I/O lives here; the algorithms stay in
//! `stepscout_core`.

pub mod engine;
pub mod error;
pub mod file_source;
pub mod settings;

pub use engine::Engine;
pub use error::{Result, ScanError};
pub use file_source::FileSource;
pub use settings::Settings;
