fn main() {
    if let Err(e) = marine_debris_lib::run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
