use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::position::GeoPoint;
use crate::store::{Entity, Id, Ordering, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum Category {
    #[strum(serialize = "Animal Hospital")]
    Hospital,
    Grooming,
    #[strum(serialize = "Dog Cafe")]
    Cafe,
    #[strum(serialize = "Pet Shop")]
    PetShop,
    #[strum(serialize = "Pet Hotel")]
    Hotel,
}

impl Category {
    pub fn icon(self) -> &'static str {
        match self {
            Category::Hospital => "🏥",
            Category::Grooming => "✂️",
            Category::Cafe => "☕",
            Category::PetShop => "🛒",
            Category::Hotel => "🏨",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: Id,
    pub name: String,
    pub category: Category,
    pub address: String,
    pub phone: String,
    pub rating: f64,
    pub distance_km: f64,
    pub position: GeoPoint,
    pub hours: String,
    pub is_favorite: bool,
}

impl Entity for Facility {
    const KIND: &'static str = "facility";

    fn id(&self) -> Id {
        self.id
    }

    fn assign_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Search box plus optional category chip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityFilter {
    pub query: String,
    pub category: Option<Category>,
}

impl FacilityFilter {
    pub fn matches(&self, facility: &Facility) -> bool {
        let category_ok = self.category.map_or(true, |c| facility.category == c);
        let query = self.query.trim().to_lowercase();
        category_ok && facility.name.to_lowercase().contains(&query)
    }

    /// Step the category chip through `categories`, then back to "all"
    pub fn cycle_category(&mut self, categories: &[Category]) {
        self.category = match self.category {
            None => categories.first().copied(),
            Some(current) => categories
                .iter()
                .position(|c| *c == current)
                .and_then(|idx| categories.get(idx + 1))
                .copied(),
        };
    }
}

/// Nearby facilities in the order they were listed
#[derive(Debug, Clone)]
pub struct FacilityDirectory {
    facilities: Repository<Facility>,
}

impl FacilityDirectory {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self {
            facilities: Repository::seeded(Ordering::InsertionOrder, facilities),
        }
    }

    pub fn list(&self) -> &[Facility] {
        self.facilities.list()
    }

    pub fn get(&self, id: Id) -> Option<&Facility> {
        self.facilities.get(id)
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<Category> {
        self.facilities.iter().map(|f| f.category).unique().collect()
    }

    pub fn filter(&self, filter: &FacilityFilter) -> Vec<&Facility> {
        self.facilities.iter().filter(|f| filter.matches(f)).collect()
    }

    pub fn favorites(&self) -> Vec<&Facility> {
        self.facilities.iter().filter(|f| f.is_favorite).collect()
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, id: Id) -> Result<bool, StoreError> {
        self.facilities.toggle(id, |f| &mut f.is_favorite)
    }
}
