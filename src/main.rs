fn main() {
    #[cfg(feature = "cli")]
    deltasig::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("deltasig: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
