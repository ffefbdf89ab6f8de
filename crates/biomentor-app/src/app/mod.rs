pub mod setup;
pub mod repl;
pub mod web_server;

pub use setup::{setup_from_cli, AppConfig};
pub use repl::run_repl_mode;
pub use web_server::run_web_server;
