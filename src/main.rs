fn main() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    binapi::app::logging::init();
    if let Err(err) = binapi::app::cli::run() {
        eprintln!("error: {}", err.message);
        std::process::exit(1);
    }
}
