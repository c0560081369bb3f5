//! tput-compare CLI entry point.

fn main() {
    tput_compare_cli::init_logging();

    let code = tput_compare_cli::execute(std::env::args_os(), &mut std::io::stdout());
    std::process::exit(code);
}
