//! Editable descriptive fields shared by beats, soundkits and albums.

use beatmarket_core::catalog::{validate_credit, validate_description, validate_title};
use beatmarket_core::error::CoreError;
use serde::Deserialize;

/// Partial title/description/credits update. Absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct DetailsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub co_prod: Option<String>,
    pub prod_by: Option<String>,
}

impl DetailsRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(co_prod) = &self.co_prod {
            validate_credit("co_prod", co_prod)?;
        }
        if let Some(prod_by) = &self.prod_by {
            validate_credit("prod_by", prod_by)?;
        }
        Ok(())
    }
}
