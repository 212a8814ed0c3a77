//! pods-rome - prebuild installed pods into xcframeworks.
//!
//! This binary is the post-install hook entry point: it reads the install
//! context snapshot, builds and merges every pod, and collects the results.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging; RUST_LOG overrides the default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match pods_rome::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
