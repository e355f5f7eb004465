fn main() {
    ghtrack_pipeline::cli::run();
}
