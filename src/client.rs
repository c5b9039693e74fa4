// Copyright 2025 Cowboy AI, LLC.

//! Client contact fields and the form validity oracle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Contact details captured on the payment step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// Company, when ordering for one
    #[serde(default)]
    pub company: Option<String>,
}

/// A client form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientField {
    /// Name field
    Name,
    /// Email field
    Email,
    /// Phone field
    Phone,
    /// Company field
    Company,
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientField::Name => "name",
            ClientField::Email => "email",
            ClientField::Phone => "phone",
            ClientField::Company => "company",
        })
    }
}

/// Form validity oracle consulted before submission
pub trait ClientInfoValidator: Send + Sync {
    /// Fields that are missing or malformed
    fn invalid_fields(&self, info: &ClientInfo) -> Vec<ClientField>;

    /// Whether the form may be submitted
    fn is_valid(&self, info: &ClientInfo) -> bool {
        self.invalid_fields(info).is_empty()
    }
}

/// Required fields filled and email shaped like `local@domain.tld`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsValidator {
    /// Also require the company field
    pub require_company: bool,
}

impl ClientInfoValidator for RequiredFieldsValidator {
    fn invalid_fields(&self, info: &ClientInfo) -> Vec<ClientField> {
        let mut invalid = Vec::new();
        if info.name.trim().is_empty() {
            invalid.push(ClientField::Name);
        }
        if !is_valid_email(&info.email) {
            invalid.push(ClientField::Email);
        }
        if info.phone.trim().is_empty() {
            invalid.push(ClientField::Phone);
        }
        let company_blank = info.company.as_deref().map_or(true, |c| c.trim().is_empty());
        if self.require_company && company_blank {
            invalid.push(ClientField::Company);
        }
        invalid
    }
}

/// `[^\s@]+@[^\s@]+\.[^\s@]+`, matched over the whole trimmed value
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // at least one dot with non-empty text on both sides
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}
