// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::process::exit;

use clap::Parser;
use subid_check::{cli::Args, custom_panic_hook_ignore_sigpipe, logs};
use tracing::{debug, error, trace};

fn main() {
    custom_panic_hook_ignore_sigpipe();
    let args = Args::parse();
    if let Err(e) = logs::init(args.verbose, args.quiet, args.message_format) {
        eprintln!("Could not initialize logs: {e:#}");
        exit(2);
    }
    debug!(
        "Running {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    trace!("Arguments:\n{:#?}", args);

    match subid_check::run(&args).and_then(|r| r.print(args.message_format).map(|_| r)) {
        Ok(report) if report.is_success() => (),
        // At least one check failed
        Ok(_) => exit(1),
        Err(e) => {
            // Use `{:#}` formatter to get the error chain
            error!("{:#}", e);
            exit(2);
        }
    }
}
