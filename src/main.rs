use borgbahm::cli::{self, EXIT_USAGE};

fn main() {
    match cli::run() {
        Ok(result) => std::process::exit(result.exit_code()),
        Err(err) => {
            eprintln!("borgbahm: {:#}", err);
            std::process::exit(EXIT_USAGE);
        }
    }
}
