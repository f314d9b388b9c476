use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub udp_host: String,
    pub udp_port: u16,
    pub base_dir: PathBuf,
    pub storage_path: PathBuf,
    pub datagram_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            udp_host: "localhost".to_string(),
            udp_port: 5000,
            base_dir: PathBuf::from("."),
            storage_path: PathBuf::from("storage/data.json"),
            datagram_buffer_size: 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_host = env::var("HTTP_HOST").unwrap_or(defaults.http_host);
        let http_port = parse_var("HTTP_PORT").unwrap_or(defaults.http_port);
        let udp_host = env::var("UDP_HOST").unwrap_or(defaults.udp_host);
        let udp_port = parse_var("UDP_PORT").unwrap_or(defaults.udp_port);
        let base_dir = env::var("BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.base_dir);
        let storage_path = env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);
        let datagram_buffer_size =
            parse_var("DATAGRAM_BUFFER_SIZE").unwrap_or(defaults.datagram_buffer_size);

        let cfg = Self {
            http_host,
            http_port,
            udp_host,
            udp_port,
            base_dir,
            storage_path,
            datagram_buffer_size,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !self.base_dir.is_dir() {
            return Err(anyhow!(
                "BASE_DIR {} is not a directory",
                self.base_dir.display()
            ));
        }
        if self.datagram_buffer_size == 0 {
            return Err(anyhow!("DATAGRAM_BUFFER_SIZE must be greater than 0"));
        }
        Ok(())
    }

    /// Address the datagram receiver binds to and the relay sends to.
    pub fn udp_addr(&self) -> String {
        format!("{}:{}", self.udp_host, self.udp_port)
    }

    /// Record store location; relative paths hang off `base_dir`.
    pub fn storage_file(&self) -> PathBuf {
        self.base_dir.join(&self.storage_path)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}
