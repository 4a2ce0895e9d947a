pub mod api_key;
pub mod config;
pub mod logger;
pub mod pstorage_toml;

pub use api_key::resolve_api_key;
pub use config::*;
pub use logger::{Colors, setup_logging};
pub use pstorage_toml::{PstorageToml, apply_file_to_opts, load_pstorage_toml};
