use std::process::ExitCode;

use jarfetch_lib::{global_settings, init_logging, resolve_jar_artifact};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let mut print_settings = false;
    let mut coordinates = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--settings" => print_settings = true,
            _ => coordinates.push(arg),
        }
    }

    if print_settings {
        let snapshot = match global_settings().await {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to load maven settings: {}", e);
                return ExitCode::FAILURE;
            }
        };
        match serde_json::to_string_pretty(snapshot.as_ref()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to render settings: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if coordinates.is_empty() && !print_settings {
        eprintln!("usage: jarfetch [--settings] <group:artifact:version[:classifier]>...");
        return ExitCode::FAILURE;
    }

    let mut status = ExitCode::SUCCESS;
    for coordinate in &coordinates {
        match resolve_jar_artifact(coordinate).await {
            Ok(Some(path)) => println!("{} -> {}", coordinate, path.display()),
            Ok(None) => println!("{} -> not found", coordinate),
            Err(e) => {
                error!("{}: {}", coordinate, e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
