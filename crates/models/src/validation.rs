use once_cell::sync::Lazy;
use regex::Regex;

use crate::contact::{Contact, EditContact};
use crate::errors::ModelError;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+7\d{10}$").expect("static phone regex"));
static COUNTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("static country regex"));

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.chars().count() < 4 {
        return Err(ModelError::Validation("name must have at least 4 characters".into()));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if !PHONE_RE.is_match(phone) {
        return Err(ModelError::Validation("phone number must be in \"+7xxxxxxxxxx\" format".into()));
    }
    Ok(())
}

/// Empty gender is allowed; it is filled in by enrichment before insertion.
pub fn validate_gender(gender: &str) -> Result<(), ModelError> {
    match gender {
        "" | "male" | "female" => Ok(()),
        _ => Err(ModelError::Validation("gender must be either \"male\" or \"female\"".into())),
    }
}

pub fn validate_country(country: &str) -> Result<(), ModelError> {
    if country.is_empty() || COUNTRY_RE.is_match(country) {
        return Ok(());
    }
    Err(ModelError::Validation("country code must consist of two uppercase letters".into()))
}

impl Contact {
    /// Validate a record about to be added.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_phone(&self.phone)?;
        validate_gender(&self.gender)?;
        validate_country(&self.country)?;
        Ok(())
    }
}

impl EditContact {
    /// Validate only the fields the patch sets.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.trim().is_empty() {
            return Err(ModelError::Validation("id is required".into()));
        }
        if !self.name.is_empty() {
            validate_name(&self.name)?;
        }
        if !self.phone.is_empty() {
            validate_phone(&self.phone)?;
        }
        validate_gender(&self.gender)?;
        validate_country(&self.country)?;
        Ok(())
    }
}
