fn main() {
    if let Err(err) = sheet_sqlite::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
