fn main() {
    if let Err(error) = tagpick_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
