//! Fixed catalog of chaos event templates.

use thiserror::Error;

use crate::{EventRecord, Tier};

const STANDARD_RECORDS: [EventRecord; 24] = [
    EventRecord::new(
        "All traffic lights turned purple for 3 seconds",
        "Tokyo, Japan",
        Tier::Mild,
    ),
    EventRecord::new(
        "Every cat in the city meowed simultaneously",
        "Paris, France",
        Tier::Mild,
    ),
    EventRecord::new(
        "All elevators played elevator music backwards",
        "New York, USA",
        Tier::Mild,
    ),
    EventRecord::new(
        "Street lamps flickered in perfect synchronization",
        "London, UK",
        Tier::Mild,
    ),
    EventRecord::new(
        "All pigeons started walking in circles",
        "Rome, Italy",
        Tier::Mild,
    ),
    EventRecord::new(
        "Every doorbell rang the same tune",
        "Berlin, Germany",
        Tier::Mild,
    ),
    EventRecord::new(
        "All digital clocks displayed rainbow colors",
        "Seoul, South Korea",
        Tier::Mild,
    ),
    EventRecord::new(
        "Street performers switched acts mid-performance",
        "Barcelona, Spain",
        Tier::Mild,
    ),
    EventRecord::new(
        "All fountains started flowing upwards",
        "Dubai, UAE",
        Tier::Moderate,
    ),
    EventRecord::new(
        "Every phone played the same ringtone",
        "Mumbai, India",
        Tier::Moderate,
    ),
    EventRecord::new(
        "All statues turned their heads 90 degrees",
        "Athens, Greece",
        Tier::Moderate,
    ),
    EventRecord::new(
        "Street art came to life for 10 seconds",
        "São Paulo, Brazil",
        Tier::Moderate,
    ),
    EventRecord::new(
        "All car horns harmonized into a symphony",
        "Cairo, Egypt",
        Tier::Moderate,
    ),
    EventRecord::new(
        "Every escalator reversed direction",
        "Singapore",
        Tier::Moderate,
    ),
    EventRecord::new(
        "All weather vanes spun like pinwheels",
        "Amsterdam, Netherlands",
        Tier::Moderate,
    ),
    EventRecord::new(
        "Street musicians played in perfect harmony",
        "Nashville, USA",
        Tier::Moderate,
    ),
    EventRecord::new(
        "The aurora borealis appeared over the equator",
        "Quito, Ecuador",
        Tier::Intense,
    ),
    EventRecord::new(
        "All mirrors showed reflections from other cities",
        "Venice, Italy",
        Tier::Intense,
    ),
    EventRecord::new(
        "Gravity decreased by 10% for 30 seconds",
        "Sydney, Australia",
        Tier::Intense,
    ),
    EventRecord::new(
        "All shadows danced independently",
        "Marrakech, Morocco",
        Tier::Intense,
    ),
    EventRecord::new(
        "Time moved backwards for exactly one minute",
        "Reykjavik, Iceland",
        Tier::Intense,
    ),
    EventRecord::new(
        "All buildings swayed gently like trees",
        "Hong Kong",
        Tier::Intense,
    ),
    EventRecord::new(
        "The sky turned into a kaleidoscope",
        "Rio de Janeiro, Brazil",
        Tier::Intense,
    ),
    EventRecord::new(
        "All water turned temporarily luminescent",
        "Stockholm, Sweden",
        Tier::Intense,
    ),
];

/// Reasons a catalog may be rejected during construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog contains no records at all.
    #[error("catalog must contain at least one record")]
    Empty,
    /// Nothing would be selectable at the lowest intensity.
    #[error("catalog must contain at least one mild record")]
    NoMildRecord,
}

/// Ordered, read-only sequence of chaos event templates.
///
/// A catalog always holds at least one [`Tier::Mild`] record, so every
/// intensity level has a non-empty eligible subset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<EventRecord>,
}

impl Catalog {
    /// Validates and wraps the provided records.
    pub fn new(records: Vec<EventRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }
        if !records.iter().any(|record| record.tier() == Tier::Mild) {
            return Err(CatalogError::NoMildRecord);
        }
        Ok(Self { records })
    }

    /// The curated catalog shipped with the widget.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            records: STANDARD_RECORDS.to_vec(),
        }
    }

    /// Records in catalog order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Iterator over the records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Number of records in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; catalogs are validated to be non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records tagged with the provided tier.
    #[must_use]
    pub fn count_of(&self, tier: Tier) -> usize {
        self.records.iter().filter(|record| record.tier() == tier).count()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
