use serde::Deserialize;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use tracing::debug;
use crate::error::{Error, Result};

pub const DEFAULT_SPREADSHEET_NAME: &str = "WB products";
pub const DEFAULT_CATALOG_URL: &str = "https://content-api.wildberries.ru/content/v2/get/cards/list";
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub wb_api_token: String,
    #[serde(default)]
    pub google_credentials_file: String,
    pub spreadsheet_name: String,
    pub catalog_url: String,
    pub page_size: u32,
    pub min_target: u32,
    pub sheets_api_url: String,
    pub drive_api_url: String,
}

impl Settings {
    /// Loads `.env`, then `config/default.*` if present, then the process environment.
    pub fn new() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::default());

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .set_default("spreadsheet_name", DEFAULT_SPREADSHEET_NAME)?
            .set_default("catalog_url", DEFAULT_CATALOG_URL)?
            .set_default("page_size", i64::from(MAX_PAGE_SIZE))?
            .set_default("min_target", 100_i64)?
            .set_default("sheets_api_url", DEFAULT_SHEETS_API_URL)?
            .set_default("drive_api_url", DEFAULT_DRIVE_API_URL)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;

        debug!(
            spreadsheet_name = %settings.spreadsheet_name,
            catalog_url = %settings.catalog_url,
            page_size = settings.page_size,
            min_target = settings.min_target,
            "Loaded settings"
        );

        Ok(settings)
    }

    /// Fails if any required value is blank or the page size is outside `1..=100`.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("WB_API_TOKEN", &self.wb_api_token),
            ("GOOGLE_CREDENTIALS_FILE", &self.google_credentials_file),
            ("SPREADSHEET_NAME", &self.spreadsheet_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::Configuration(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        Ok(())
    }
}
