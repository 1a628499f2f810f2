use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::api::AuthApi;
use crate::cli::config::{api_client, open_session};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::PanelConfig;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information")]
    Whoami,
}

fn prompt_password(username: &str) -> anyhow::Result<String> {
    eprint!("Password for {}: ", username);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn handle(cmd: AuthCommands, config: &PanelConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = open_session(config, &config.session.login_path)?;
    let client = api_client(config, session.clone())?;
    let auth = AuthApi::new(&client);

    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&username)?,
            };
            let user = auth.login(&username, &password).await.context("login failed")?;
            output_success(
                &output_format,
                &format!("Signed in as {}", user.identity().display_label()),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            auth.logout().await?;
            output_success(&output_format, "Signed out", None)
        }
        AuthCommands::Status => {
            let authenticated = session.is_authenticated();
            let identity = session.identity();
            let message = if authenticated {
                format!("Signed in as {}", identity.display_label())
            } else {
                "Not signed in".to_string()
            };
            output_success(
                &output_format,
                &message,
                Some(json!({ "authenticated": authenticated, "user": identity })),
            )
        }
        AuthCommands::Whoami => {
            let user = auth.me().await.context("failed to fetch current user")?;
            output_success(
                &output_format,
                &format!("{} ({}) role={}", user.identity().display_label(), user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
    }
}
