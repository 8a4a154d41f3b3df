//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use demeter_core::DemeterClient;

use crate::cli::{BackendArgs, OutputFormat};
use crate::config::{Config, resolve_backend_url, resolve_timeout};

/// Clap's default for `--timeout`.
pub const DEFAULT_TIMEOUT_ARG: u64 = 10;

/// Build a client from command arguments and config.
pub fn connect(backend: &BackendArgs, config: &Config) -> Result<DemeterClient> {
    let url = resolve_backend_url(backend.url.clone(), config);
    let timeout = resolve_timeout(backend.timeout, config, DEFAULT_TIMEOUT_ARG);
    client_for(&url, timeout)
}

/// Build a client for an explicit URL.
pub fn client_for(url: &str, timeout: Duration) -> Result<DemeterClient> {
    DemeterClient::with_timeout(url, timeout)
        .with_context(|| format!("Invalid backend URL '{}'", url))
}

/// `--json` wins over `--format`.
pub fn effective_format(format: OutputFormat, json: bool) -> OutputFormat {
    if json { OutputFormat::Json } else { format }
}

/// Write to the output file if given, otherwise stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append to the output file if given, otherwise stdout.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_format() {
        assert_eq!(effective_format(OutputFormat::Csv, true), OutputFormat::Json);
        assert_eq!(effective_format(OutputFormat::Csv, false), OutputFormat::Csv);
    }

    #[test]
    fn test_client_for_rejects_bad_url() {
        assert!(client_for("localhost:5000", Duration::from_secs(1)).is_err());
        let client = client_for("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_connect_uses_config_url() {
        let config = Config {
            backend_url: "http://pi.local:5000".to_string(),
            ..Default::default()
        };
        let args = BackendArgs {
            url: None,
            timeout: DEFAULT_TIMEOUT_ARG,
        };
        let client = connect(&args, &config).unwrap();
        assert_eq!(client.base_url(), "http://pi.local:5000");
    }

    #[test]
    fn test_write_and_append_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_output(Some(&path), "a\n").unwrap();
        append_output(Some(&path), "b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
        write_output(Some(&path), "c\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "c\n");
    }
}
