use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use headlines::app::{App, AppEvent};
use headlines::config::{Config, API_KEY_ENV};
use headlines::keybindings::KeybindingRegistry;
use headlines::news::{Category, NewsClient};
use headlines::session::Session;
use headlines::theme::ThemeVariant;
use headlines::ui;

/// Get the config directory path (~/.config/headlines/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("headlines");
    Ok(config_dir)
}

/// Limit a directory to owner-only access (0700). No-op off unix.
fn restrict_permissions(dir: &std::path::Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(dir)?.permissions();
        perms.set_mode(0o700);
        std::fs::set_permissions(dir, perms)?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

/// Send tracing output to a log file when RUST_LOG is set.
///
/// The terminal belongs to the TUI, so nothing is written to stderr.
fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let log_path = config_dir.join("headlines.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "headlines", about = "Top news headlines in the terminal")]
struct Args {
    /// Initial category (general, business, entertainment, health, science, sports, technology)
    #[arg(long, default_value = "general")]
    category: Category,

    /// Initial search query
    #[arg(long, default_value = "")]
    query: String,

    /// Config file (default: ~/.config/headlines/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme, overrides the config file
    #[arg(long, value_parser = ["dark", "light"])]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    init_logging(&config_dir)?;

    // The config file may hold the API key
    if let Err(e) = restrict_permissions(&config_dir) {
        tracing::warn!(
            path = %config_dir.display(),
            error = %e,
            "Failed to restrict config directory to owner-only access"
        );
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let api_key = match config.resolve_api_key(std::env::var(API_KEY_ENV).ok()) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Get a key at https://newsapi.org and run:");
            eprintln!("  export {}=<your key>", API_KEY_ENV);
            std::process::exit(1);
        }
    };

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = ThemeVariant::from_str_name(theme_name).unwrap_or_else(|| {
        tracing::warn!(theme = %theme_name, "Unknown theme, using light");
        ThemeVariant::Light
    });

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    let client = NewsClient::new(config.news_settings(api_key))
        .context("Failed to create news API client")?;
    let session = Session::new(args.category, &args.query, theme.is_dark());
    let mut app = App::new(session, client, keybindings);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx)
        .await
        .context("Terminal UI failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_restrict_permissions_sets_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = std::env::temp_dir().join(format!("headlines_perms_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        restrict_permissions(&dir).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn test_restrict_permissions_missing_dir_errors() {
        let dir = std::env::temp_dir().join("headlines_perms_test_missing/nested");
        if cfg!(unix) {
            assert!(restrict_permissions(&dir).is_err());
        }
    }
}
