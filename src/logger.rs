/// Initialises the `env_logger` backend. Output goes to stderr so it never
/// mixes with files rendered to stdout.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .target(env_logger::Target::Stderr)
        .init();
}
