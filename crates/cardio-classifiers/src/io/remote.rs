//! Remote dataset download by repository name.
use std::io::{Cursor, Read};

use anyhow::{anyhow, Context, Result};

use crate::error::PipelineError;
use crate::io::credentials::{CredentialProvider, KaggleCredentials};
use crate::io::csv_reader::read_table;
use crate::io::DatasetSource;
use crate::table::Table;

pub const KAGGLE_API_URL: &str = "https://www.kaggle.com/api/v1";

/// A Kaggle dataset identified as `owner/name`. The download is a zip
/// archive; its first `.csv` entry becomes the table.
pub struct KaggleSource {
    dataset: String,
    api_url: String,
    credentials: Box<dyn CredentialProvider>,
}

impl KaggleSource {
    pub fn new(dataset: impl Into<String>, credentials: Box<dyn CredentialProvider>) -> Self {
        KaggleSource {
            dataset: dataset.into(),
            api_url: KAGGLE_API_URL.to_string(),
            credentials,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn validate_name(&self) -> Result<()> {
        match self.dataset.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(())
            }
            _ => Err(anyhow!(
                "dataset name must look like 'owner/dataset', got '{}'",
                self.dataset
            )),
        }
    }

    fn download(&self, creds: &KaggleCredentials) -> Result<Vec<u8>> {
        let url = format!(
            "{}/datasets/download/{}",
            self.api_url.trim_end_matches('/'),
            self.dataset
        );
        log::debug!("Requesting {}", url);
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("cardio-classifiers/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let response = client
            .get(&url)
            .basic_auth(&creds.username, Some(&creds.key))
            .send()
            .context("Download request failed")?
            .error_for_status()
            .context("Download rejected")?;
        let bytes = response.bytes().context("Failed to read download body")?;
        Ok(bytes.to_vec())
    }
}

/// Pull the first `.csv` entry out of a zip archive. A body that is not a
/// zip archive is returned unchanged and treated as CSV.
pub fn extract_first_csv(bytes: Vec<u8>) -> Result<(String, Vec<u8>)> {
    if !bytes.starts_with(b"PK") {
        return Ok(("download.csv".to_string(), bytes));
    }
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("Invalid zip archive")?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).context("Failed to read zip entry")?;
        let name = entry.name().to_string();
        if !entry.is_dir() && name.to_lowercase().ends_with(".csv") {
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .with_context(|| format!("Failed to extract {}", name))?;
            return Ok((name, content));
        }
    }
    Err(anyhow!("No CSV file found in the dataset archive"))
}

impl DatasetSource for KaggleSource {
    fn describe(&self) -> String {
        format!("kaggle dataset {}", self.dataset)
    }

    fn fetch(&self) -> crate::error::Result<Table> {
        let creds = self.credentials.credentials()?;
        log::info!(
            "Downloading {} using {}",
            self.describe(),
            self.credentials.describe()
        );
        self.validate_name()
            .and_then(|_| self.download(&creds))
            .and_then(extract_first_csv)
            .and_then(|(name, content)| {
                log::info!("Reading {} from archive", name);
                read_table(content.as_slice(), b',')
            })
            .map_err(|e| PipelineError::acquisition(self.describe(), format!("{:#}", e)))
    }
}
