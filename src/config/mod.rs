pub mod loader;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError, CONFIG_ENV};
pub use schema::{
    BlockDefinition, InputSection, ParseSection, Settings, ValidationError, ValidationIssue,
};
