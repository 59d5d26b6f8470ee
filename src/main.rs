//! Stencil's application entry point.
//! Parses arguments, wires process signals to cancellation and runs the
//! generation pipeline.

use std::io::{self, IsTerminal};

use stencil::{
    cli::get_args,
    config::load_plan,
    error::{default_error_handler, Result},
    generate::Generator,
    hooks::CancellationToken,
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Failed to install signal handler: {err}");
    }

    if let Err(err) = run(args, cancel) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the flags and resolves the settings
/// 2. Reads the generation plan from a file or stdin
/// 3. Loads templates, generates files and runs commands
fn run(args: stencil::cli::Args, cancel: CancellationToken) -> Result<()> {
    let settings = args.settings(io::stdin().is_terminal())?;
    let plan = load_plan(&settings.config)?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    Generator::new(&settings, cancel).run(&plan, &mut stdout)
}
