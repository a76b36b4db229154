use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::HttpSettings;
use crate::router::{self, Route};
use crate::screens::ScreenSettings;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RENDER_FPS: u32 = 30;

/// Pinboard - terminal client for a pin collection backend
///
/// Browse your boards, inspect and move pins, and identify new ones from a photo.
/// Configuration priority: CLI args > Environment variables > Config file > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "pinboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pin collection terminal client", long_about = None)]
pub struct CliArgs {
    /// Start screen as a deep link (e.g. pinboard://v1/board/wishlist)
    pub route: Option<String>,

    /// TOML file with any of the settings below
    #[arg(long, env = "PINBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Collection backend base URL
    #[arg(long, env = "PINBOARD_API_URL")]
    pub api_base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "PINBOARD_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Per-request timeout in milliseconds (1000-120000); unset uses the transport default
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Photo upload timeout in milliseconds (1000-120000)
    #[arg(long, env = "UPLOAD_TIMEOUT_MS")]
    pub upload_timeout_ms: Option<u64>,

    /// Retry attempts for list, detail and move requests (0-5)
    #[arg(long, env = "API_RETRIES")]
    pub api_retries: Option<u8>,

    /// Image file used as the camera; without it camera access is denied
    #[arg(long, env = "CAPTURE_PATH")]
    pub capture_path: Option<PathBuf>,

    /// Refuse moving pins between boards
    #[arg(long, env = "DISABLE_MOVE")]
    pub disable_move: Option<bool>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Use the seeded in-memory collection instead of the backend
    #[arg(long, env = "PINBOARD_DEMO")]
    pub demo: Option<bool>,

    /// Print the three board previews as JSON and exit
    #[arg(long)]
    pub snapshot: bool,
}

/// Settings accepted from the `--config` file
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub upload_timeout_ms: Option<u64>,
    pub api_retries: Option<u8>,
    pub capture_path: Option<PathBuf>,
    pub disable_move: Option<bool>,
    pub render_fps: Option<u32>,
    pub demo: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| anyhow!("invalid config file: {e}"))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| path.display().to_string())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub upload_timeout_ms: u64,
    pub api_retries: u8,
    pub capture_path: Option<PathBuf>,
    pub move_enabled: bool,
    pub render_fps: u32,
    pub demo: bool,
    pub snapshot: bool,
    pub start_route: Route,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args, environment variables and the config file
pub fn load() -> Result<Config> {
    resolve(CliArgs::parse())
}

/// Same as [`load`] with an explicit argument list (first item is the binary name)
pub fn load_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = CliArgs::try_parse_from(args)?;
    resolve(args)
}

/// Merge parsed arguments over the config file and defaults.
/// clap has already folded the environment into `args`.
pub fn resolve(args: CliArgs) -> Result<Config> {
    let file = match &args.config {
        Some(path) => FileConfig::read(path)?,
        None => FileConfig::default(),
    };

    let api_base_url = args
        .api_base_url
        .or(file.api_base_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_url(&api_base_url, "PINBOARD_API_URL")?;

    let request_timeout_ms = args
        .request_timeout_ms
        .or(file.request_timeout_ms)
        .map(|ms| validate_in_range(ms, 1000, 120_000, "REQUEST_TIMEOUT_MS"))
        .transpose()?;

    let upload_timeout_ms = args
        .upload_timeout_ms
        .or(file.upload_timeout_ms)
        .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_MS);
    let upload_timeout_ms = validate_in_range(upload_timeout_ms, 1000, 120_000, "UPLOAD_TIMEOUT_MS")?;

    let api_retries = args.api_retries.or(file.api_retries).unwrap_or(0);
    let api_retries = validate_in_range(api_retries, 0, 5, "API_RETRIES")?;

    let render_fps = args.render_fps.or(file.render_fps).unwrap_or(DEFAULT_RENDER_FPS);
    let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

    let start_route = match args.route.as_deref() {
        None => Route::Onboarding,
        Some(link) => router::parse(link).ok_or_else(|| anyhow!("unknown deep link '{link}'"))?,
    };

    // Blank tokens come from `PINBOARD_AUTH_TOKEN=` in .env files
    let auth_token = args
        .auth_token
        .or(file.auth_token)
        .filter(|t| !t.trim().is_empty());

    Ok(Config {
        api_base_url,
        auth_token,
        request_timeout_ms,
        upload_timeout_ms,
        api_retries,
        capture_path: args.capture_path.or(file.capture_path),
        move_enabled: !args.disable_move.or(file.disable_move).unwrap_or(false),
        render_fps,
        demo: args.demo.or(file.demo).unwrap_or(false),
        snapshot: args.snapshot,
        start_route,
    })
}

impl Config {
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            base_url: self.api_base_url.clone(),
            auth_token: self.auth_token.clone(),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            retries: self.api_retries,
        }
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            move_enabled: self.move_enabled,
            upload_timeout: Duration::from_millis(self.upload_timeout_ms),
        }
    }

    pub fn print_summary(&self) {
        log::info!("Pinboard Configuration:");
        if self.demo {
            log::info!("  Backend: in-memory demo collection");
        } else {
            log::info!("  API URL: {}", self.api_base_url);
            match self.request_timeout_ms {
                Some(ms) => log::info!("  Request Timeout: {ms}ms"),
                None => log::info!("  Request Timeout: transport default"),
            }
            log::info!("  Retries: {}", self.api_retries);
            if self.auth_token.is_some() {
                log::info!("  Auth: Configured");
            }
        }
        log::info!("  Upload Timeout: {}ms", self.upload_timeout_ms);
        match &self.capture_path {
            Some(p) => log::info!("  Capture Source: {}", p.display()),
            None => log::info!("  Capture Source: none (camera denied)"),
        }
        log::info!("  Move Between Boards: {}", self.move_enabled);
        log::info!("  Render FPS: {}", self.render_fps);
        log::info!("  Start Screen: {}", self.start_route.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoardKind;

    #[test]
    fn test_defaults() {
        let cfg = resolve(CliArgs::default()).unwrap();
        assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
        assert_eq!(cfg.request_timeout_ms, None);
        assert_eq!(cfg.upload_timeout_ms, 30_000);
        assert_eq!(cfg.api_retries, 0);
        assert!(cfg.move_enabled);
        assert!(!cfg.demo);
        assert_eq!(cfg.start_route, Route::Onboarding);
        assert_eq!(cfg.http_settings().request_timeout, None);
        assert_eq!(cfg.screen_settings().upload_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_ranges_are_enforced() {
        let args = CliArgs { render_fps: Some(0), ..Default::default() };
        assert!(resolve(args).is_err());

        let args = CliArgs { api_retries: Some(9), ..Default::default() };
        let err = resolve(args).unwrap_err().to_string();
        assert!(err.contains("API_RETRIES"), "{err}");

        let args = CliArgs { request_timeout_ms: Some(10), ..Default::default() };
        assert!(resolve(args).is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let args = CliArgs { api_base_url: Some("ftp://pins".into()), ..Default::default() };
        assert!(resolve(args).is_err());
    }

    #[test]
    fn test_start_route_from_link() {
        let args = CliArgs {
            route: Some("pinboard://v1/board/trading".into()),
            ..Default::default()
        };
        assert_eq!(resolve(args).unwrap().start_route, Route::Board(BoardKind::Trading));

        let args = CliArgs { route: Some("pinboard://v9/nowhere".into()), ..Default::default() };
        assert!(resolve(args).is_err());
    }

    #[test]
    fn test_file_config_parse() {
        let file = FileConfig::parse(
            r#"
            api_base_url = "https://pins.example.com"
            request_timeout_ms = 5000
            disable_move = true
            "#,
        )
        .unwrap();
        assert_eq!(file.api_base_url.as_deref(), Some("https://pins.example.com"));
        assert_eq!(file.request_timeout_ms, Some(5000));
        assert_eq!(file.disable_move, Some(true));

        assert!(FileConfig::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let path = std::env::temp_dir().join(format!("pinboard-cfg-{}.toml", std::process::id()));
        std::fs::write(&path, "api_base_url = \"https://file.example\"\napi_retries = 2\n").unwrap();

        let args = CliArgs {
            config: Some(path.clone()),
            api_base_url: Some("https://cli.example".into()),
            ..Default::default()
        };
        let cfg = resolve(args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(cfg.api_base_url, "https://cli.example");
        assert_eq!(cfg.api_retries, 2);
    }

    #[test]
    fn test_load_from_args() {
        let cfg = load_from(["pinboard", "--snapshot", "--render-fps", "60", "pinboard://v1/scan"]).unwrap();
        assert!(cfg.snapshot);
        assert_eq!(cfg.render_fps, 60);
        assert_eq!(cfg.start_route, Route::Scanning);

        assert!(load_from(["pinboard", "--api-retries", "many"]).is_err());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let args = CliArgs { auth_token: Some("  ".into()), ..Default::default() };
        assert_eq!(resolve(args).unwrap().auth_token, None);
    }
}
