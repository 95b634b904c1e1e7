use clap::Parser;
use cryptovault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            force,
            with_samples,
            ref out,
        } => cryptovault::cli::commands::init::execute(&cli, force, with_samples, out.as_deref()),
        Commands::List => cryptovault::cli::commands::list::execute(&cli),
        Commands::Add {
            ref site,
            ref login,
        } => cryptovault::cli::commands::add::execute(&cli, site, login),
        Commands::Delete { ref id, force } => {
            cryptovault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Reveal { ref id } => cryptovault::cli::commands::reveal::execute(&cli, id),
        Commands::Open => cryptovault::cli::commands::open::execute(&cli),
        Commands::Status => cryptovault::cli::commands::status::execute(&cli),
        Commands::Version => cryptovault::cli::commands::version::execute(),
        Commands::Completions { shell } => cryptovault::cli::commands::completions::execute(shell),
        Commands::Audit { last, ref since } => {
            cryptovault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
    };

    if let Err(e) = result {
        cryptovault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
