//! Process entry point. All behavior lives in [`zena_fleet::supervisor`];
//! this binary only hands control to it and forwards its exit code.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    zena_fleet::supervisor::run().await
}
