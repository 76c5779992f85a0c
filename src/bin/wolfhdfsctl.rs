//! WolfHdfsCtl - Command line client for a WolfHDFS endpoint
//!
//! Usage:
//!   wolfhdfsctl ls /dir            - List a directory
//!   wolfhdfsctl stat /file         - Show entry status
//!   wolfhdfsctl cat /file          - Print file content
//!   wolfhdfsctl put /file --text x - Create (or append to) a file

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use wolfhdfs::api::{BooleanResponse, RemoteExceptionResponse};
use wolfhdfs::store::{Entry, FileStatusResponse, FileStatusesResponse};
use wolfhdfs::WolfHdfsConfig;

/// WolfHDFS Control Tool
#[derive(Parser)]
#[command(name = "wolfhdfsctl")]
#[command(about = "Talk to a WolfHDFS (WebHDFS) endpoint", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "wolfhdfs.toml")]
    config: PathBuf,

    /// Endpoint to connect to, e.g. http://127.0.0.1:50070 (overrides config)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// User name sent as `user.name`
    #[arg(short, long, default_value = "webuser")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls { path: String },
    /// Show the status of an entry
    Stat { path: String },
    /// Print a file's content
    Cat { path: String },
    /// Create a directory
    Mkdir { path: String },
    /// Write a file from a local file or inline text
    Put {
        path: String,
        /// Local file to upload
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Inline content
        #[arg(short, long)]
        text: Option<String>,
        /// Append instead of create
        #[arg(long)]
        append: bool,
        /// Fail if the file already exists
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Rename an entry
    Mv { source: String, destination: String },
    /// Delete an entry
    Rm {
        path: String,
        /// Delete every direct child of the path
        #[arg(short, long)]
        recursive: bool,
    },
    /// Change the permission string
    Chmod { permission: String, path: String },
    /// Change owner and group
    Chown {
        owner: String,
        path: String,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Create a symlink at `link` pointing at `target`
    Ln { target: String, link: String },
}

/// Thin WebHDFS client
struct Client {
    http: reqwest::Client,
    base: String,
    user: String,
}

impl Client {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        op: &str,
        params: &[(&str, &str)],
    ) -> reqwest::RequestBuilder {
        let mut query: Vec<(&str, &str)> = vec![("op", op), ("user.name", self.user.as_str())];
        query.extend_from_slice(params);
        self.http.request(method, self.url(path)).query(&query)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> anyhow::Result<reqwest::Response> {
        let response = builder.send().await.context("request failed")?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        match response.json::<RemoteExceptionResponse>().await {
            Ok(err) => bail!(
                "{} ({}): {}",
                err.remote_exception.exception,
                status,
                err.remote_exception.message
            ),
            Err(_) => bail!("API error: {}", status),
        }
    }

    async fn mutate(&self, method: reqwest::Method, path: &str, op: &str, params: &[(&str, &str)]) -> anyhow::Result<()> {
        let response = self.send(self.request(method, path, op, params)).await?;
        let result: BooleanResponse = response.json().await?;
        if !result.boolean {
            bail!("{} on {} returned false", op, path);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let endpoint = match &cli.endpoint {
        Some(e) => e.trim_end_matches('/').to_string(),
        None => endpoint_from_config(&cli.config),
    };
    let prefix = WolfHdfsConfig::from_file(&cli.config)
        .map(|c| c.path_prefix().to_string())
        .unwrap_or_else(|_| "/webhdfs/v1".to_string());

    let client = Client {
        http: reqwest::Client::new(),
        base: format!("{}{}", endpoint, prefix.trim_end_matches('/')),
        user: cli.user.clone(),
    };

    if let Err(e) = run(&client, cli.command).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Derive a client endpoint from the server's bind address
fn endpoint_from_config(path: &Path) -> String {
    match WolfHdfsConfig::from_file(path) {
        Ok(config) => {
            let addr = config.server.bind_address;
            if let Some(port) = addr.strip_prefix("0.0.0.0:") {
                format!("http://127.0.0.1:{}", port)
            } else {
                format!("http://{}", addr)
            }
        }
        Err(_) => "http://127.0.0.1:50070".to_string(),
    }
}

async fn run(client: &Client, command: Commands) -> anyhow::Result<()> {
    use reqwest::Method;

    match command {
        Commands::Ls { path } => {
            let response = client.send(client.request(Method::GET, &path, "LISTSTATUS", &[])).await?;
            let listing: FileStatusesResponse = response.json().await?;
            let mut entries = listing.file_statuses.file_status;
            entries.sort_by(|a, b| a.path_suffix.cmp(&b.path_suffix));

            println!("{:<10} {:<6} {:<12} {:<12} {:>10}  NAME", "TYPE", "PERM", "OWNER", "GROUP", "LENGTH");
            println!("{}", "-".repeat(70));
            for entry in &entries {
                print_entry_row(entry);
            }
            println!("{} entries", entries.len());
        }
        Commands::Stat { path } => {
            let response = client.send(client.request(Method::GET, &path, "GETFILESTATUS", &[])).await?;
            let status: FileStatusResponse = response.json().await?;
            let entry = status.file_status;

            println!("Path:         {}", path);
            println!("Type:         {:?}", entry.entry_type);
            println!("Owner:        {}:{}", entry.owner, entry.group);
            println!("Permission:   {}", entry.permission);
            println!("Length:       {}", entry.length);
            println!("Replication:  {}", entry.replication_factor);
            println!("Block size:   {}", entry.block_size);
            println!("Modified:     {}", format_millis(entry.modification_time));
            println!("Accessed:     {}", format_millis(entry.access_time));
        }
        Commands::Cat { path } => {
            let response = client.send(client.request(Method::GET, &path, "OPEN", &[])).await?;
            let bytes = response.bytes().await?;
            print!("{}", String::from_utf8_lossy(&bytes));
        }
        Commands::Mkdir { path } => {
            client.mutate(Method::PUT, &path, "MKDIRS", &[]).await?;
            println!("Created {}", path);
        }
        Commands::Put { path, file, text, append, no_overwrite } => {
            let body = match (file, text) {
                (Some(file), _) => tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("reading {:?}", file))?,
                (None, Some(text)) => text.into_bytes(),
                (None, None) => bail!("either --file or --text is required"),
            };

            let (method, op, params): (Method, &str, Vec<(&str, &str)>) = if append {
                (Method::POST, "APPEND", vec![])
            } else if no_overwrite {
                (Method::PUT, "CREATE", vec![("overwrite", "false")])
            } else {
                (Method::PUT, "CREATE", vec![])
            };

            let size = body.len();
            client.send(client.request(method, &path, op, &params).body(body)).await?;
            println!("Wrote {} bytes to {}", size, path);
        }
        Commands::Mv { source, destination } => {
            client.mutate(Method::PUT, &source, "RENAME", &[("destination", destination.as_str())]).await?;
            println!("Renamed {} to {}", source, destination);
        }
        Commands::Rm { path, recursive } => {
            let recursive = if recursive { "true" } else { "false" };
            client.mutate(Method::DELETE, &path, "DELETE", &[("recursive", recursive)]).await?;
            println!("Deleted {}", path);
        }
        Commands::Chmod { permission, path } => {
            client.mutate(Method::PUT, &path, "SETPERMISSION", &[("permission", permission.as_str())]).await?;
            println!("Set permission of {} to {}", path, permission);
        }
        Commands::Chown { owner, path, group } => {
            let mut params = vec![("owner", owner.as_str())];
            if let Some(group) = group.as_deref() {
                params.push(("group", group));
            }
            client.mutate(Method::PUT, &path, "SETOWNER", &params).await?;
            println!("Set owner of {} to {}", path, owner);
        }
        Commands::Ln { target, link } => {
            client.mutate(Method::PUT, &target, "CREATESYMLINK", &[("destination", link.as_str())]).await?;
            println!("Linked {} -> {}", link, target);
        }
    }

    Ok(())
}

fn print_entry_row(entry: &Entry) {
    let kind = if entry.is_dir() { "DIRECTORY" } else { "FILE" };
    println!(
        "{:<10} {:<6} {:<12} {:<12} {:>10}  {}",
        kind, entry.permission, entry.owner, entry.group, entry.length, entry.path_suffix
    );
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
