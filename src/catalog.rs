// Copyright 2025 Cowboy AI, LLC.

//! Service catalog
//!
//! Read-only lookup of purchasable services, partitioned by shoe category.
//! The catalog is built once from the two injected lists and never mutated.

use crate::errors::IntakeResult;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Shoe category a service belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    /// Men's shoes
    #[serde(rename = "HOMME", alias = "MEN")]
    Men,
    /// Women's shoes
    #[serde(rename = "FEMME", alias = "WOMEN")]
    Women,
}

impl Category {
    /// Both categories in display order
    pub const ALL: [Category; 2] = [Category::Men, Category::Women];

    /// Wire code used by the order API
    pub fn code(&self) -> &'static str {
        match self {
            Category::Men => "HOMME",
            Category::Women => "FEMME",
        }
    }

    /// Label shown to the customer
    pub fn label(&self) -> &'static str {
        match self {
            Category::Men => "Homme",
            Category::Women => "Femme",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOMME" | "MEN" => Ok(Category::Men),
            "FEMME" | "WOMEN" => Ok(Category::Women),
            other => Err(format!("unknown category `{other}`")),
        }
    }
}

/// A purchasable service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Catalog id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Optional long description
    pub description: Option<String>,
    /// Unit price in euros
    pub price: Decimal,
    /// Category the service is offered for
    pub category: Category,
    /// Whether selecting this service asks the customer for a note
    /// (quote-on-request work)
    pub requires_note: bool,
}

/// One injected catalog item, as the page template provides it
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    /// Catalog id
    pub id: i64,
    /// Display name
    pub nom: String,
    /// Optional long description
    #[serde(default)]
    pub description: Option<String>,
    /// Price, as a JSON number or string
    pub prix: Decimal,
    /// Explicit quote-on-request flag
    #[serde(default, alias = "sur_devis")]
    pub requires_note: bool,
}

impl ServiceEntry {
    fn into_service(self, category: Category) -> Service {
        Service {
            id: self.id,
            name: self.nom,
            description: self.description.filter(|d| !d.trim().is_empty()),
            price: self.prix,
            category,
            requires_note: self.requires_note,
        }
    }
}

/// The two externally injected lists; either may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSource {
    /// Men's services
    #[serde(default, alias = "prestationsHomme", alias = "HOMME")]
    pub men: Option<Vec<ServiceEntry>>,
    /// Women's services
    #[serde(default, alias = "prestationsFemme", alias = "FEMME")]
    pub women: Option<Vec<ServiceEntry>>,
}

/// Read-only service catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    men: Vec<Service>,
    women: Vec<Service>,
    // id -> (category, index into that category's list)
    index: HashMap<i64, (Category, usize)>,
}

impl Catalog {
    /// Build a catalog from the injected lists
    ///
    /// A missing list is not an error: that category simply offers nothing.
    pub fn from_source(source: CatalogSource) -> Self {
        if source.men.is_none() || source.women.is_none() {
            warn!(
                men = source.men.is_some(),
                women = source.women.is_some(),
                "service lists missing from catalog source, using empty lists"
            );
        }
        Self::new(
            source.men.unwrap_or_default(),
            source.women.unwrap_or_default(),
        )
    }

    /// Build a catalog from the two lists
    pub fn new(men: Vec<ServiceEntry>, women: Vec<ServiceEntry>) -> Self {
        let mut catalog = Catalog::default();
        for (category, entries) in [(Category::Men, men), (Category::Women, women)] {
            for entry in entries {
                catalog.insert(entry.into_service(category));
            }
        }
        catalog
    }

    /// Build a catalog directly from services (category taken from each)
    pub fn from_services(services: impl IntoIterator<Item = Service>) -> Self {
        let mut catalog = Catalog::default();
        for service in services {
            catalog.insert(service);
        }
        catalog
    }

    /// Parse a catalog source from JSON
    pub fn from_json_str(json: &str) -> IntakeResult<Self> {
        let source: CatalogSource = serde_json::from_str(json)?;
        Ok(Self::from_source(source))
    }

    /// Read a catalog source JSON file
    pub fn from_json_file(path: &Path) -> IntakeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            crate::IntakeError::CatalogUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Self::from_json_str(&json)
    }

    fn insert(&mut self, service: Service) {
        if self.index.contains_key(&service.id) {
            warn!(service_id = service.id, "duplicate catalog id ignored");
            return;
        }
        let list = match service.category {
            Category::Men => &mut self.men,
            Category::Women => &mut self.women,
        };
        self.index
            .insert(service.id, (service.category, list.len()));
        list.push(service);
    }

    /// Look up a service by id, across both categories
    pub fn lookup(&self, id: i64) -> Option<&Service> {
        let (category, idx) = *self.index.get(&id)?;
        self.services_for(category).get(idx)
    }

    /// Services offered for a category, in source order
    pub fn services_for(&self, category: Category) -> &[Service] {
        match category {
            Category::Men => &self.men,
            Category::Women => &self.women,
        }
    }

    /// Whether `id` is offered for `category`
    pub fn offers(&self, category: Category, id: i64) -> bool {
        matches!(self.index.get(&id), Some((c, _)) if *c == category)
    }

    /// Whether selecting `id` requires a note; unknown ids do not
    pub fn requires_note(&self, id: i64) -> bool {
        self.lookup(id).is_some_and(|s| s.requires_note)
    }

    /// True when neither category offers anything
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
