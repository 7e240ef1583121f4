//! Tessera CLI - Command line interface.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{header::WWW_AUTHENTICATE, Client, StatusCode};
use serde::{Deserialize, Serialize};

use tessera_crypto::{password::hash_password, random::generate_secret_for, SignatureAlgorithm};

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera CLI - Manage secrets and credentials, fetch tokens")]
#[command(version)]
struct Cli {
    /// Tessera server address
    #[arg(long, default_value = "http://localhost:8080", env = "TESSERA_ADDR")]
    addr: String,

    /// Bearer token for protected resources
    #[arg(long, env = "TESSERA_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signing secret of the length an algorithm requires
    Keygen {
        /// Signature algorithm (HS256, HS384, HS512)
        #[arg(long, default_value = "HS256")]
        algorithm: SignatureAlgorithm,
    },
    /// Print a password file line, reading the password from stdin
    HashPassword {
        /// Username
        user: String,
    },
    /// Log in and print the issued token, reading the password from stdin
    Login {
        /// Username
        #[arg(long)]
        user: String,
        /// Login location
        #[arg(long, default_value = "/login")]
        path: String,
    },
    /// Fetch a protected resource
    Get {
        /// Resource path
        path: String,
    },
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct LoginForm<'a> {
    user: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// HTTP Client
// ============================================================================

struct TesseraClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TesseraClient {
    fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn login(&self, path: &str, user: &str, password: &str) -> Result<LoginResponse> {
        let resp = self
            .client
            .post(self.url(path))
            .form(&LoginForm { user, password })
            .send()
            .await
            .context("Failed to connect to server")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error: ErrorResponse = resp.json().await.unwrap_or(ErrorResponse {
                error: "Unknown error".into(),
            });
            bail!("Login failed ({}): {}", status, error.error);
        }

        resp.json().await.context("Failed to parse response")
    }

    async fn get(&self, path: &str) -> Result<String> {
        let token = self
            .token
            .as_ref()
            .context("Authentication token required. Set TESSERA_TOKEN or use --token")?;

        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to connect to server")?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            let challenge = resp
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("none")
                .to_string();
            bail!("Access refused ({}): {}", status, challenge);
        }
        if !status.is_success() {
            bail!("Request failed: {}", status);
        }

        resp.text().await.context("Failed to read response")
    }
}

// ============================================================================
// Command Handlers
// ============================================================================

fn read_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}

fn cmd_keygen(algorithm: SignatureAlgorithm) -> Result<()> {
    let secret = generate_secret_for(algorithm);
    println!("{}", secret.as_str());
    Ok(())
}

fn cmd_hash_password(user: &str) -> Result<()> {
    if user.is_empty() || user.contains(':') {
        bail!("Username must be non-empty and must not contain ':'");
    }
    let password = read_password()?;
    let hash = hash_password(&password).context("Failed to hash password")?;
    println!("{}:{}", user, hash);
    Ok(())
}

async fn cmd_login(client: &TesseraClient, path: &str, user: &str) -> Result<()> {
    let password = read_password()?;
    let result = client.login(path, user, &password).await?;
    println!("{}", result.token);
    Ok(())
}

async fn cmd_get(client: &TesseraClient, path: &str) -> Result<()> {
    let body = client.get(path).await?;
    print!("{}", body);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { algorithm } => cmd_keygen(algorithm),
        Commands::HashPassword { user } => cmd_hash_password(&user),
        Commands::Login { user, path } => {
            let client = TesseraClient::new(&cli.addr, cli.token)?;
            cmd_login(&client, &path, &user).await
        },
        Commands::Get { path } => {
            let client = TesseraClient::new(&cli.addr, cli.token)?;
            cmd_get(&client, &path).await
        },
    }
}
