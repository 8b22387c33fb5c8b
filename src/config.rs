//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;

/// planet-wishlist — browse planets and keep a wishlist of favorites.
#[derive(Parser, Debug)]
#[command(name = "planet-wishlist", version)]
pub struct Args {
    /// Root of the planet API (the list lives at `{api_url}/planets/`).
    #[arg(long, default_value = "https://swapi.dev/api", env = "PLANETS_API_URL")]
    pub api_url: String,

    /// Directory holding the persisted wishlist.
    #[arg(long, env = "PLANETS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file.  Defaults to `planet-wishlist.log` inside the data directory.
    #[arg(long, env = "PLANETS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

impl Args {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from("dev", "swapi", "planet-wishlist")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".planet-wishlist"))
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("planet-wishlist.log"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["planet-wishlist"]).unwrap();
        // The env var may be set on a developer machine.
        if std::env::var_os("PLANETS_API_URL").is_none() {
            assert_eq!(args.api_url, "https://swapi.dev/api");
        }
        assert_eq!(args.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn explicit_paths_win() {
        let args = Args::try_parse_from([
            "planet-wishlist",
            "--data-dir",
            "/tmp/pw",
            "--timeout-secs",
            "3",
        ])
        .unwrap();
        assert_eq!(args.data_dir(), PathBuf::from("/tmp/pw"));
        assert_eq!(args.log_file(), PathBuf::from("/tmp/pw/planet-wishlist.log"));
        assert_eq!(args.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn log_file_override() {
        let args = Args::try_parse_from([
            "planet-wishlist",
            "--data-dir",
            "/tmp/pw",
            "--log-file",
            "/tmp/other.log",
        ])
        .unwrap();
        assert_eq!(args.log_file(), PathBuf::from("/tmp/other.log"));
    }
}
