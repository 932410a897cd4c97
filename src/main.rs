use std::process::ExitCode;

fn main() -> ExitCode {
    match production_notebook_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("production-notebook: {}", e);
            ExitCode::FAILURE
        }
    }
}
