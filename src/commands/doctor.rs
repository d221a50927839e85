//! Doctor command - check the environment is ready for repository
//! creation.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::Command;

use reposmith::forge::{ForgeClient, GitHubCli};

#[derive(Serialize)]
struct ToolStatus {
    available: bool,
    version: Option<String>,
    path: Option<String>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String, // "healthy", "warning", "critical"
    git: ToolStatus,
    gh: ToolStatus,
    authenticated: bool,
    user: Option<String>,
    recommendations: Vec<String>,
}

pub fn execute(json_output: bool) -> Result<i32> {
    if !json_output {
        println!("🏥 Checking environment...\n");
    }

    let git = probe_tool("git");
    let gh = probe_tool("gh");

    let forge = GitHubCli;
    let authenticated = gh.available && forge.is_authenticated().unwrap_or(false);
    let user = if authenticated {
        forge.current_user().ok()
    } else {
        None
    };

    let mut recommendations = Vec::new();
    if !git.available {
        recommendations.push("Install git: https://git-scm.com/downloads".to_string());
    }
    if !gh.available {
        recommendations.push("Install the GitHub CLI: https://cli.github.com".to_string());
    }
    if gh.available && !authenticated {
        recommendations.push("Authenticate: gh auth login".to_string());
    }

    let status = if !git.available || !gh.available {
        "critical"
    } else if !authenticated {
        "warning"
    } else {
        "healthy"
    };

    let health = HealthCheck {
        status: status.to_string(),
        git,
        gh,
        authenticated,
        user,
        recommendations,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        display_health_check(&health);
    }

    let exit_code = match health.status.as_str() {
        "healthy" => 0,
        "warning" => 2,
        _ => 3,
    };

    Ok(exit_code)
}

fn probe_tool(name: &str) -> ToolStatus {
    match which::which(name) {
        Ok(path) => {
            let version = Command::new(name)
                .arg("--version")
                .output()
                .ok()
                .filter(|output| output.status.success())
                .map(|output| {
                    String::from_utf8_lossy(&output.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string()
                });
            ToolStatus {
                available: true,
                version,
                path: Some(path.display().to_string()),
            }
        }
        Err(_) => ToolStatus {
            available: false,
            version: None,
            path: None,
        },
    }
}

fn display_health_check(health: &HealthCheck) {
    for (name, tool) in [("git", &health.git), ("gh", &health.gh)] {
        if tool.available {
            println!(
                "  {} {}: {}",
                "✓".green(),
                name,
                tool.version.as_deref().unwrap_or("found")
            );
        } else {
            println!("  {} {}: NOT FOUND", "✗".red(), name);
        }
    }

    if health.authenticated {
        println!(
            "  {} authenticated as {}",
            "✓".green(),
            health.user.as_deref().unwrap_or("unknown")
        );
    } else {
        println!("  {} not authenticated", "✗".red());
    }

    if !health.recommendations.is_empty() {
        println!("\nRecommendations:");
        for (i, recommendation) in health.recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, recommendation);
        }
    }
}
