//! Site language commands.

use clap::Subcommand;
use uupdl::lang::LanguageRegistry;

use crate::error::CliError;

/// Lang subcommands.
#[derive(Debug, Subcommand)]
pub enum LangCommands {
    /// List supported site languages and their browser mappings
    List,

    /// Pick the site language for an Accept-Language header
    Resolve {
        /// Header value, e.g. "de-DE,de;q=0.9,en;q=0.8"
        accept_language: String,
    },
}

/// Run a lang subcommand.
pub fn run(command: LangCommands) -> Result<(), CliError> {
    let registry = LanguageRegistry::global();

    match command {
        LangCommands::List => {
            for tag in registry.supported_languages() {
                let auto = if registry.site_language_for(tag).is_some() {
                    " (auto)"
                } else {
                    ""
                };
                println!("{}{}", tag, auto);
            }
        }
        LangCommands::Resolve { accept_language } => {
            match registry.preferred_site_language(&accept_language) {
                Some(tag) => println!("{}", tag),
                None => println!("(site default)"),
            }
        }
    }

    Ok(())
}
