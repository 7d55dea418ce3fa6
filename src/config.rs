use clap::Parser;
use std::path::PathBuf;

/// Web server configuration
///
/// Every option can be given on the command line or through its environment
/// variable; the command line wins.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "syntax-web", version, about = "Survey syntax generator web server")]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "SYNTAX_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SYNTAX_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory of static files served for paths not handled by the API
    #[arg(long, env = "SYNTAX_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "SYNTAX_UPLOAD_LIMIT_MB", default_value_t = 20)]
    pub upload_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_dir: None,
            upload_limit_mb: 20,
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind the listener to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_mb.saturating_mul(1024 * 1024)
    }
}
