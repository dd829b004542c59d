use clap::Parser;
use contact_cli::{run_cli, Cli, Outcome};

fn main() {
    let cli = Cli::parse();
    match run_cli(cli) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Failed { .. }) => std::process::exit(1),
        Err(err) => {
            eprintln!("contact: {err:#}");
            std::process::exit(2);
        }
    }
}
