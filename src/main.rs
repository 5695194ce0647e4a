fn main() {
    if let Err(err) = evcc_log_report::app::run() {
        eprintln!("application failed: {err}");
        std::process::exit(1);
    }
}
