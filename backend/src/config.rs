use clap::Parser;
use std::path::PathBuf;

/// Certificate record store and public verification API.
#[derive(Debug, Parser)]
#[command(name = "backend", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "CERT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CERT_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file, created when missing.
    #[arg(long, env = "CERT_DATABASE", default_value = "certificates.sqlite")]
    pub database: PathBuf,

    /// Directory where uploaded certificate images are stored.
    #[arg(long, env = "CERT_UPLOADS", default_value = "uploads")]
    pub uploads: PathBuf,
}
