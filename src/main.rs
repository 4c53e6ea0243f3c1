use log::error;
use sales_report::layout::Layout;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    match sales_report::build_reports(Layout::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Report generation aborted: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
