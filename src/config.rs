use std::env;
use std::path::PathBuf;

use dotenv::dotenv;

use crate::cli::command::Cli;

pub const STORE_PATH_ENV: &str = "CONTACTS_FILE";
pub const LOG_ENV: &str = "CONTACT_BOOK_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "debug";

/// Loads `.env` from the working directory, if present, without overriding
/// variables that are already set.
pub fn load_dotenv() {
    dotenv().ok();
}

/// Runtime settings resolved from flags and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            store_path: cli.file.clone(),
            log_filter: resolve_log_filter(
                env::var(LOG_ENV).ok(),
                env::var("RUST_LOG").ok(),
                cli.verbose,
            ),
        }
    }
}

/// `CONTACT_BOOK_LOG` wins over `RUST_LOG`; `--verbose` only changes the
/// default when neither is set.
pub fn resolve_log_filter(own: Option<String>, rust_log: Option<String>, verbose: bool) -> String {
    own.or(rust_log)
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_LOG_FILTER.to_string()
            } else {
                DEFAULT_LOG_FILTER.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn log_filter_precedence() {
        assert_eq!(resolve_log_filter(None, None, false), "warn");
        assert_eq!(resolve_log_filter(None, None, true), "debug");
        assert_eq!(
            resolve_log_filter(None, Some("info".to_string()), true),
            "info"
        );
        assert_eq!(
            resolve_log_filter(Some("trace".to_string()), Some("info".to_string()), false),
            "trace"
        );
        assert_eq!(resolve_log_filter(Some(" ".to_string()), None, false), "warn");
    }

    #[test]
    fn store_path_comes_from_flag() {
        let cli = Cli::parse_from(["contact-book", "--file", "/tmp/book.json", "view"]);

        assert_eq!(
            Settings::from_cli(&cli).store_path,
            PathBuf::from("/tmp/book.json")
        );
    }
}
