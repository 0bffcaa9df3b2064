// Configuration module entry point
// Layers defaults, an optional TOML file, STATICY_* environment variables and
// command-line flags into one immutable Config

mod cli;
mod types;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::logger::LogFormat;

pub use cli::Cli;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

pub const DEFAULT_DOCROOT: &str = "./static";
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] ::config::ConfigError),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("cannot resolve document root {path:?}: {source}")]
    Docroot { path: PathBuf, source: io::Error },
}

impl Config {
    /// Load configuration, highest precedence last:
    /// defaults, `--config` file, `STATICY_*` environment, command-line flags
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load_with_env(cli, environment())
    }

    fn load_with_env(cli: &Cli, env: ::config::Environment) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .set_default("server.docroot", DEFAULT_DOCROOT)?
            .set_default("server.listen", DEFAULT_LISTEN)?
            .set_default("server.indexing", false)?
            .set_default("http.keep_alive", true)?
            .set_default("logging.format", "default")?;

        // Always TOML, whatever the extension
        if let Some(ref path) = cli.config {
            builder = builder.add_source(
                ::config::File::from(path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }

        let settings = builder
            .add_source(env)
            .set_override_option(
                "server.docroot",
                cli.docroot
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("server.listen", cli.listen.clone())?
            .set_override_option("server.indexing", cli.indexing)?
            .set_override_option(
                "server.workers",
                cli.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .set_override_option("logging.format", cli.log_format.clone())?
            .set_override_option(
                "logging.file",
                cli.log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.resolve()
    }

    /// Validate and make the document root absolute
    fn resolve(mut self) -> Result<Self, ConfigError> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::Empty("server.listen"));
        }
        if self.server.docroot.as_os_str().is_empty() {
            return Err(ConfigError::Empty("server.docroot"));
        }
        if self.server.workers == Some(0) {
            return Err(ConfigError::Zero("server.workers"));
        }

        self.server.docroot = std::path::absolute(&self.server.docroot).map_err(|source| {
            ConfigError::Docroot {
                path: self.server.docroot.clone(),
                source,
            }
        })?;
        Ok(self)
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::from(self.logging.format.as_str())
    }
}

/// `STATICY_SERVER__LISTEN` sets `server.listen`
fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix("STATICY")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load(&Cli::default()).unwrap();
        assert_eq!(cfg.server.listen, DEFAULT_LISTEN);
        assert!(!cfg.server.indexing);
        assert!(cfg.server.docroot.is_absolute());
        assert!(cfg.server.docroot.ends_with("static"));
        assert!(cfg.http.keep_alive);
        assert_eq!(cfg.log_format(), LogFormat::Default);
        assert!(cfg.logging.file.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli {
            docroot: Some(PathBuf::from("/srv/www")),
            listen: Some("127.0.0.1:9000".to_string()),
            indexing: Some(true),
            workers: Some(2),
            log_format: Some("json".to_string()),
            ..Cli::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.server.docroot, PathBuf::from("/srv/www"));
        assert_eq!(cfg.server.listen, "127.0.0.1:9000");
        assert!(cfg.server.indexing);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_file_then_cli_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("staticy.toml");
        std::fs::write(
            &path,
            "[server]\nlisten = \"127.0.0.1:7000\"\nindexing = true\n\n[http]\nkeep_alive = false\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:7000");
        assert!(cfg.server.indexing);
        assert!(!cfg.http.keep_alive);

        let cli = Cli {
            config: Some(path),
            listen: Some("127.0.0.1:7001".to_string()),
            indexing: Some(false),
            ..Cli::default()
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:7001");
        assert!(!cfg.server.indexing);
    }

    #[test]
    fn test_config_file_is_toml_whatever_its_name() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["staticy.conf", "staticy"] {
            let path = tmp.path().join(name);
            std::fs::write(&path, "[server]\nlisten = \"127.0.0.1:7000\"\n").unwrap();
            let cli = Cli {
                config: Some(path),
                ..Cli::default()
            };
            let cfg = Config::load(&cli).unwrap();
            assert_eq!(cfg.server.listen, "127.0.0.1:7000");
        }
    }

    #[test]
    fn test_environment_between_file_and_cli() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("staticy.toml");
        std::fs::write(
            &path,
            "[server]\nlisten = \"127.0.0.1:7000\"\nindexing = false\nworkers = 1\n",
        )
        .unwrap();

        // Injected map instead of the process environment, so parallel tests
        // never see these keys
        let env = || {
            let vars = [
                ("STATICY_SERVER__LISTEN", "127.0.0.1:7100"),
                ("STATICY_SERVER__INDEXING", "true"),
                ("STATICY_SERVER__WORKERS", "3"),
                ("OTHER_SERVER__LISTEN", "127.0.0.1:1"),
            ];
            environment().source(Some(
                vars.into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ))
        };

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let cfg = Config::load_with_env(&cli, env()).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:7100");
        assert!(cfg.server.indexing);
        assert_eq!(cfg.server.workers, Some(3));

        let cli = Cli {
            config: Some(path),
            listen: Some("127.0.0.1:7200".to_string()),
            indexing: Some(false),
            ..Cli::default()
        };
        let cfg = Config::load_with_env(&cli, env()).unwrap();
        assert_eq!(cfg.server.listen, "127.0.0.1:7200");
        assert!(!cfg.server.indexing);
        assert_eq!(cfg.server.workers, Some(3));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = Cli {
            workers: Some(0),
            ..Cli::default()
        };
        assert!(matches!(
            Config::load(&cli),
            Err(ConfigError::Zero("server.workers"))
        ));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Cli::default()
        };
        assert!(matches!(Config::load(&cli), Err(ConfigError::Source(_))));
    }

    #[test]
    fn test_empty_listen_rejected() {
        let cli = Cli {
            listen: Some("  ".to_string()),
            ..Cli::default()
        };
        assert!(matches!(
            Config::load(&cli),
            Err(ConfigError::Empty("server.listen"))
        ));
    }

    #[test]
    fn test_cli_parses_go_style_flags() {
        use clap::Parser;

        let cli = Cli::parse_from(["staticy", "--indexing", "--listen", ":8080"]);
        assert_eq!(cli.indexing, Some(true));
        assert_eq!(cli.listen.as_deref(), Some(":8080"));

        let cli = Cli::parse_from(["staticy", "--indexing=false"]);
        assert_eq!(cli.indexing, Some(false));

        let cli = Cli::parse_from(["staticy"]);
        assert_eq!(cli.indexing, None);
    }
}
