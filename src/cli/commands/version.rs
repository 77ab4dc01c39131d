//! Version information display.
//!
//! Prints version and build metadata in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Print version and build information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version}");
            println!("built: {}", built_info::BUILT_TIME_UTC);
            println!("rustc: {}", built_info::RUSTC_VERSION);
        }
        OutputFormat::Json => {
            let body = serde_json::json!({
                "name": name,
                "version": version,
                "built": built_info::BUILT_TIME_UTC,
                "rustc": built_info::RUSTC_VERSION,
            });
            println!("{body}");
        }
    }
}
