//! Templates command - list available gitignore templates.
//!
//! Shows the provider-hosted template names merged with the curated
//! local set, the same pool the create command accepts.

use anyhow::Result;
use std::collections::BTreeSet;

use reposmith::forge::{ForgeClient, GitHubCli};
use reposmith::scaffold::gitignore;

pub fn execute() -> Result<()> {
    let mut names: BTreeSet<String> = gitignore::CURATED_TEMPLATES
        .iter()
        .map(|name| name.to_string())
        .collect();

    let forge = GitHubCli;
    match forge.gitignore_templates() {
        Ok(remote) => names.extend(remote),
        Err(e) => eprintln!("⚠️  Could not fetch provider templates: {:#}", e),
    }

    for name in names {
        println!("{}", name);
    }

    Ok(())
}
