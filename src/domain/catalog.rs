use serde::{Deserialize, Serialize};

/// A category offered to the user, with the expense types it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, types: &[&str]) -> Self {
        Self {
            name: name.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The fixed set of categories a deployment accepts.
/// An empty catalog accepts any category and any type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<CategorySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogViolation {
    UnknownCategory,
    UnknownExpenseType,
}

impl Catalog {
    pub fn new(categories: Vec<CategorySpec>) -> Self {
        Self { categories }
    }

    /// Accept every category.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[CategorySpec] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Check a category/type pair. A category with no listed types accepts any type.
    pub fn check(&self, category: &str, expense_type: Option<&str>) -> Result<(), CatalogViolation> {
        if self.is_open() {
            return Ok(());
        }
        let spec = self
            .get(category)
            .ok_or(CatalogViolation::UnknownCategory)?;
        match expense_type {
            Some(t) if !spec.types.is_empty() && !spec.types.iter().any(|known| known == t) => {
                Err(CatalogViolation::UnknownExpenseType)
            }
            _ => Ok(()),
        }
    }
}

/// Categories and types offered out of the box.
pub fn default_catalog() -> Catalog {
    Catalog::new(vec![
        CategorySpec::new("Food", &["Breakfast", "Lunch", "Dinner"]),
        CategorySpec::new("Transport", &["Car Petrol", "Cab"]),
        CategorySpec::new("Entertainment", &["Movie Ticket", "Games"]),
        CategorySpec::new("Shopping", &["New Clothes", "Accessories"]),
        CategorySpec::new("Personal Care", &["Haircut"]),
        CategorySpec::new("Utilities", &["Electricity", "Water", "Rent"]),
        CategorySpec::new("Fitness", &["Gym Membership"]),
        CategorySpec::new("Subscriptions", &["OTT Subscription"]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_accepts_known_pairs() {
        let catalog = default_catalog();
        assert_eq!(catalog.categories().len(), 8);
        assert_eq!(catalog.check("Food", Some("Lunch")), Ok(()));
        assert_eq!(catalog.check("Food", None), Ok(()));
    }

    #[test]
    fn test_default_catalog_rejects_unknown() {
        let catalog = default_catalog();
        assert_eq!(
            catalog.check("Travel", None),
            Err(CatalogViolation::UnknownCategory)
        );
        assert_eq!(
            catalog.check("Food", Some("Cab")),
            Err(CatalogViolation::UnknownExpenseType)
        );
    }

    #[test]
    fn test_open_catalog_accepts_anything() {
        let catalog = Catalog::open();
        assert!(catalog.is_open());
        assert_eq!(catalog.check("Anything", Some("Whatever")), Ok(()));
    }

    #[test]
    fn test_category_without_types_accepts_any_type() {
        let catalog = Catalog::new(vec![CategorySpec::new("Misc", &[])]);
        assert_eq!(catalog.check("Misc", Some("Daily")), Ok(()));
    }
}
