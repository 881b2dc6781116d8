pub mod model_info;
pub mod repl;
pub mod setup;

pub use model_info::show_model_info;
pub use repl::{run_repl_mode, run_turn, UserInput};
pub use setup::setup_from_cli;
