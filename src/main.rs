//! rangelog binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match rangelog::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            rangelog::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
