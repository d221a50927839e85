use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Create and publish a new GitHub repository with starter scaffolding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a repository on GitHub and push the local directory to it
    Create {
        #[command(flatten)]
        args: commands::create::CreateArgs,
    },

    /// Check that git and the GitHub CLI are ready to use
    Doctor {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List available gitignore templates
    Templates,

    /// Write the starter project layout into the current directory
    Scaffold {
        /// Project name used in the README (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Skip the .editorconfig file
        #[arg(long)]
        no_editorconfig: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create { args } => {
            let exit_code = commands::create::execute(args)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Doctor { json } => {
            let exit_code = commands::doctor::execute(json)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Templates => {
            commands::templates::execute()?;
        }
        Commands::Scaffold {
            name,
            no_editorconfig,
        } => {
            commands::scaffold::execute(name, no_editorconfig)?;
        }
    }

    Ok(())
}
