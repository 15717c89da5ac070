use std::process::ExitCode;

fn main() -> ExitCode {
    match contact_book::run_app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
