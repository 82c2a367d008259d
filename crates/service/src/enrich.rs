//! Name enrichment
//!
//! Fills an empty `gender` from genderize.io and an empty `country` from
//! nationalize.io before a contact is stored. The storage layer never calls
//! this; the add handler does, outside the access lock.

use async_trait::async_trait;
use configs::EnrichmentConfig;
use models::Contact;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("enrichment request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ContactEnricher: Send + Sync {
    /// Fill whichever of `gender` / `country` is empty.
    async fn fill_missing(&self, contact: &mut Contact) -> Result<(), EnrichError>;
}

/// Leaves contacts untouched.
pub struct NoopEnricher;

#[async_trait]
impl ContactEnricher for NoopEnricher {
    async fn fill_missing(&self, _contact: &mut Contact) -> Result<(), EnrichError> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct Genderize {
    gender: Option<String>,
}

#[derive(Deserialize)]
struct CountryProbability {
    country_id: String,
    probability: f64,
}

#[derive(Deserialize)]
struct Nationalize {
    #[serde(default)]
    country: Vec<CountryProbability>,
}

/// genderize.io / nationalize.io client.
pub struct NameEnricher {
    client: Client,
    genderize_url: String,
    nationalize_url: String,
}

impl NameEnricher {
    pub fn new(cfg: &EnrichmentConfig) -> Self {
        Self::with_client(Client::new(), &cfg.genderize_url, &cfg.nationalize_url)
    }

    pub fn with_client(client: Client, genderize_url: &str, nationalize_url: &str) -> Self {
        Self { client, genderize_url: genderize_url.to_string(), nationalize_url: nationalize_url.to_string() }
    }

    async fn gender_of(&self, name: &str) -> Result<String, EnrichError> {
        let body: Genderize = self
            .client
            .get(&self.genderize_url)
            .query(&[("name", name)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.gender.unwrap_or_default())
    }

    /// Country with the highest probability, or empty when none is known.
    async fn country_of(&self, name: &str) -> Result<String, EnrichError> {
        let body: Nationalize = self
            .client
            .get(&self.nationalize_url)
            .query(&[("name", name)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let best = body
            .country
            .into_iter()
            .filter(|c| c.probability > 0.0)
            .max_by(|a, b| a.probability.total_cmp(&b.probability));
        Ok(best.map(|c| c.country_id).unwrap_or_default())
    }
}

#[async_trait]
impl ContactEnricher for NameEnricher {
    async fn fill_missing(&self, contact: &mut Contact) -> Result<(), EnrichError> {
        if contact.gender.is_empty() {
            contact.gender = self.gender_of(&contact.name).await?;
            debug!(name = %contact.name, gender = %contact.gender, "gender inferred");
        }
        if contact.country.is_empty() {
            contact.country = self.country_of(&contact.name).await?;
            debug!(name = %contact.name, country = %contact.country, "country inferred");
        }
        Ok(())
    }
}

/// Enricher selected by configuration.
pub fn build_enricher(cfg: &EnrichmentConfig) -> Box<dyn ContactEnricher> {
    if cfg.enabled {
        Box::new(NameEnricher::new(cfg))
    } else {
        Box::new(NoopEnricher)
    }
}
