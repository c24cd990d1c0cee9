//! Interactive configuration wizard using cliclack (Charm-style inline prompts)
//!
//! Only compiled with the `tui` feature.

mod prompts;

pub use prompts::run;
