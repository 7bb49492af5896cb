use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::render::{
    DocumentStyle, Rgb, DEFAULT_ADDRESS_LINE, DEFAULT_BANK_DETAILS, DEFAULT_COMPANY_NAME,
    DEFAULT_CONTACT_LINE,
};

/// Configuration for the application
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Directory that generated invoice files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_company_address")]
    pub company_address: String,

    #[serde(default = "default_company_contact")]
    pub company_contact: String,

    #[serde(default = "default_bank_details")]
    pub bank_details: String,

    /// Hex color such as `#2E86C1`
    #[serde(default)]
    pub brand_color: Option<String>,

    #[serde(default)]
    pub logo_path: Option<PathBuf>,
}

fn default_database_url() -> String {
    "sqlite://invoices.db".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("invoices")
}

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

fn default_company_address() -> String {
    DEFAULT_ADDRESS_LINE.to_string()
}

fn default_company_contact() -> String {
    DEFAULT_CONTACT_LINE.to_string()
}

fn default_bank_details() -> String {
    DEFAULT_BANK_DETAILS.to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>().context("invalid configuration in environment")?;

        Ok(config)
    }

    /// Build a config from explicit key/value pairs, as if they were the environment
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(pairs).context("invalid configuration")?;
        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// The style every rendered invoice uses
    pub fn document_style(&self) -> Result<DocumentStyle> {
        let mut style = DocumentStyle::new()
            .with_company_name(self.company_name.as_str())
            .with_address_line(self.company_address.as_str())
            .with_contact_line(self.company_contact.as_str())
            .with_bank_details(self.bank_details.as_str());

        if let Some(color) = self.brand_color.as_deref() {
            let color: Rgb = color
                .parse()
                .with_context(|| format!("BRAND_COLOR {color:?} is not a #RRGGBB color"))?;
            style = style.with_brand_color(color);
        }
        if let Some(path) = &self.logo_path {
            style = style.with_logo(path.clone());
        }

        Ok(style)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}
