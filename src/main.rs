fn main() {
    #[cfg(feature = "cli")]
    beamfile::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("beamfile: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
