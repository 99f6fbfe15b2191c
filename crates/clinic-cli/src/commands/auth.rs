//! Session commands: login, logout, status, registration.

use crate::console::Console;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use chrono::Local;
use clinic_auth::{Registration, SessionState};
use serde_json::json;
use std::io::{self, Write};

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub async fn login(console: &Console, username: Option<String>, format: &OutputFormat) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    if username.is_empty() {
        bail!("Username is required");
    }

    // Read password without echo
    let password = rpassword::prompt_password("Password: ")?;

    let session = console.auth.login(&username, &password).await?;
    output::print_success(&format!("Logged in as {}", session.subject), format);
    Ok(())
}

pub fn logout(console: &Console, format: &OutputFormat) -> Result<()> {
    console.auth.logout()?;
    output::print_success("Logged out", format);
    Ok(())
}

pub async fn status(console: &Console, format: &OutputFormat) -> Result<()> {
    let state = console.auth.bootstrap().await?;
    let session = state.session();

    match format {
        OutputFormat::Json => output::print_json(&json!({
            "authenticated": session.is_some(),
            "subject": session.map(|s| s.subject.as_str()),
            "roles": session.map(|s| s.roles.iter().collect::<Vec<_>>()).unwrap_or_default(),
            "expiresAt": session.map(|s| s.expires_at.to_rfc3339()),
        })),
        OutputFormat::Text => match &state {
            SessionState::Authenticated(session) => {
                output::print_heading("Session");
                output::print_row("User", &session.subject);
                let roles: Vec<&str> = session.roles.iter().map(String::as_str).collect();
                output::print_row("Roles", &roles.join(", "));
                output::print_row(
                    "Expires",
                    &session
                        .expires_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                );
            }
            _ => println!("Not logged in"),
        },
    }
    Ok(())
}

pub struct RegisterArgs {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialization: i64,
}

pub async fn register(console: &Console, args: RegisterArgs, format: &OutputFormat) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;

    let registration = Registration {
        username: args.username,
        password,
        confirm_password: Some(confirm),
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        specialization_id: Some(args.specialization),
    };

    let reply = console.auth.register(&registration).await?;
    let message = if reply.trim().is_empty() {
        format!("Account {} created", registration.username)
    } else {
        reply
    };
    output::print_success(&message, format);
    Ok(())
}

pub async fn specializations(console: &Console, format: &OutputFormat) -> Result<()> {
    let items = console.auth.specializations().await?;
    match format {
        OutputFormat::Json => output::print_json(&items),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|s| vec![s.id.to_string(), s.name.clone()])
                .collect();
            println!("{}", output::render_table(&["Id", "Name"], &rows));
        }
    }
    Ok(())
}
