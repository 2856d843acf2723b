use std::process::ExitCode;

fn main() -> ExitCode {
    cloudpick_cli::run()
}
