//! CLI command handling
//!
//! Sends CLI commands to the daemon and formats output.

use colored::Colorize;
use serde_json::Value;

use crate::commands::Commands;
use crate::common::{config::Config, Result};
use crate::rpc::{About, Action, ActionResult, Client, Target};

/// Build a client from the `--socket` flag, the config file, or the default socket
pub fn connect(socket: Option<String>) -> Result<Client> {
    let config = Config::load()?;
    let client = match config.resolve_endpoint(socket) {
        Some(endpoint) => Client::new(&endpoint)?,
        None => Client::default(),
    };
    tracing::debug!("Using gonit endpoint {}", client.endpoint());
    Ok(client)
}

/// Dispatch a CLI command
pub async fn dispatch(client: &Client, command: Commands, is_group: bool) -> Result<()> {
    match command {
        Commands::Start { name } => run_named(client, Action::Start, &name, is_group).await,
        Commands::Stop { name } => run_named(client, Action::Stop, &name, is_group).await,
        Commands::Restart { name } => run_named(client, Action::Restart, &name, is_group).await,
        Commands::Monitor { name } => run_named(client, Action::Monitor, &name, is_group).await,
        Commands::Unmonitor { name } => run_named(client, Action::Unmonitor, &name, is_group).await,
        Commands::Status { name } => {
            let name = name.as_deref().unwrap_or("all");
            run_named(client, Action::Status, name, is_group).await
        }

        Commands::About => {
            let about: About = client.about().await?;
            print_about(&about);
            Ok(())
        }

        Commands::Reload => {
            let result = client.reload().await?;
            print_value(&result);
            println!("Reload requested");
            Ok(())
        }

        Commands::Quit => {
            let result = client.quit().await?;
            print_value(&result);
            println!("Shutdown requested");
            Ok(())
        }

        Commands::Call { method, params, raw } => {
            let result = client.call(&method, call_params(&params, raw)).await?;
            print_value(&result);
            Ok(())
        }
    }
}

async fn run_named(client: &Client, action: Action, name: &str, is_group: bool) -> Result<()> {
    run_action(client, action, &Target::from_cli(name, is_group)).await
}

async fn run_action(client: &Client, action: Action, target: &Target) -> Result<()> {
    let result = client.run(action, target).await?;

    if action == Action::Status {
        print_value(&result);
        return Ok(());
    }

    match serde_json::from_value::<ActionResult>(result.clone()) {
        Ok(outcome) => print_action_result(action, target, &outcome),
        Err(_) => print_value(&result),
    }
    Ok(())
}

/// Interpret a command-line parameter as JSON, falling back to a plain string
///
/// Anything that is valid JSON keeps its JSON type, so `42` is a number and
/// `true` a boolean.
pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parameters for `call`; with `raw` every parameter is sent as a string
pub fn call_params(params: &[String], raw: bool) -> Vec<Value> {
    if raw {
        params.iter().map(|p| Value::String(p.clone())).collect()
    } else {
        params.iter().map(|p| parse_param(p)).collect()
    }
}

/// One-line summary of an action's outcome
pub fn format_action_result(action: Action, target: &Target, outcome: &ActionResult) -> String {
    format!(
        "{} {}: {} total, {} errors",
        action, target, outcome.total, outcome.errors
    )
}

fn print_action_result(action: Action, target: &Target, outcome: &ActionResult) {
    let line = format_action_result(action, target, outcome);
    if outcome.is_success() {
        println!("{} {}", "✓".green(), line);
    } else {
        println!("{} {}", "✗".red(), line.red());
    }
}

fn print_about(about: &About) {
    println!("{} {}", "gonit".bold(), about.version);
    if !about.id.is_empty() {
        println!("  id:          {}", about.id);
    }
    println!("  incarnation: {}", about.incarnation);
}

fn print_value(value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => println!("{}", s),
        other => match serde_json::to_string_pretty(other) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", other),
        },
    }
}
