pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CheckOutcome, apply_bind_override, load_config, render_config_summary, run_check,
};
