fn main() {
    jsonx::cli::run();
}
