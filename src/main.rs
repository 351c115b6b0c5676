use clap::Parser;
use timeline::cli::commands::Cli;
use timeline::cli::handlers;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = timeline::tui::run(cli.file.as_deref(), cli.config.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            timeline::logging::init_cli();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
