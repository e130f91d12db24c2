use std::fmt::Display;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::export::document::Pagination;
use crate::export::ExportSettings;

/// Application configuration loaded from environment variables.
/// Every setting has a default; a value that is present but invalid fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub rust_log: String,
    pub preview_settle: Duration,
    pub export_settle: Duration,
    pub raster_scale: f32,
    pub pagination: Pagination,
    pub jpeg_quality: u8,
    pub surface_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raster_scale: f32 = parse_or(&get, "EXPORT_RASTER_SCALE", 2.0)?;
        if !(raster_scale.is_finite() && raster_scale > 0.0 && raster_scale <= 8.0) {
            return Err(anyhow!("EXPORT_RASTER_SCALE must be in (0, 8], got {raster_scale}"));
        }
        let jpeg_quality: u8 = parse_or(&get, "EXPORT_JPEG_QUALITY", 92)?;
        if !(1..=100).contains(&jpeg_quality) {
            return Err(anyhow!("EXPORT_JPEG_QUALITY must be in 1..=100, got {jpeg_quality}"));
        }

        Ok(Config {
            bind_addr: parse_or(&get, "BIND_ADDR", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            preview_settle: Duration::from_millis(parse_or(&get, "PREVIEW_SETTLE_MS", 100)?),
            export_settle: Duration::from_millis(parse_or(&get, "EXPORT_SETTLE_MS", 500)?),
            raster_scale,
            pagination: parse_or(&get, "EXPORT_PAGINATION", Pagination::Single)?,
            jpeg_quality,
            surface_dir: get("EXPORT_SURFACE_DIR").filter(|v| !v.trim().is_empty()).map(PathBuf::from),
        })
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            settle: self.export_settle,
            raster_scale: self.raster_scale,
            surface_root: self.surface_dir.clone(),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.preview_settle, Duration::from_millis(100));
        assert_eq!(cfg.export_settle, Duration::from_millis(500));
        assert_eq!(cfg.raster_scale, 2.0);
        assert_eq!(cfg.pagination, Pagination::Single);
        assert_eq!(cfg.jpeg_quality, 92);
        assert!(cfg.surface_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[("PORT", "9000"), ("EXPORT_PAGINATION", "a4"), ("EXPORT_SETTLE_MS", "0")]).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.pagination, Pagination::A4);
        assert!(cfg.export_settings().settle.is_zero());
    }

    #[test]
    fn test_invalid_values_fail_with_key_in_message() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
        assert!(config(&[("EXPORT_PAGINATION", "letter")]).is_err());
        assert!(config(&[("EXPORT_RASTER_SCALE", "0")]).is_err());
        assert!(config(&[("EXPORT_JPEG_QUALITY", "0")]).is_err());
    }
}
