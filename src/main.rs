use ssm_env::status::ExitStatus;
use ssm_env::{core, signals};

/// Entry point - installs the Ctrl+C handler and calls core::run()
fn main() -> ExitStatus {
    signals::install();

    let args: Vec<String> = std::env::args().collect();
    let status = core::run(args);

    if signals::was_interrupted() {
        return ExitStatus::Interrupted;
    }

    status
}
