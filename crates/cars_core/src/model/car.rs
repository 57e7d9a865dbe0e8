//! Car entity.
//!
//! # Invariants
//! - `id` is `None` until the row exists and has been read back.
//! - Attribute values map 1:1 onto the `car` table columns.

use super::Identifiable;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned integer key of a `car` row.
pub type CarId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CarId>,
    pub manufacturer: String,
    pub model: String,
    pub year: i32,
}

impl Car {
    /// Creates a transient car that has not been persisted.
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            id: None,
            manufacturer: manufacturer.into(),
            model: model.into(),
            year,
        }
    }

    /// Creates a car carrying a known store identifier.
    ///
    /// Used by row mapping, where identity already exists in the store.
    pub fn with_id(
        id: CarId,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(manufacturer, model, year)
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns whether both cars carry the same attributes, ignoring identity.
    pub fn same_attributes(&self, other: &Car) -> bool {
        self.manufacturer == other.manufacturer
            && self.model == other.model
            && self.year == other.year
    }
}

impl Identifiable<CarId> for Car {
    fn id(&self) -> Option<&CarId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: CarId) {
        self.id = Some(id);
    }
}

impl Display for Car {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id} "),
            None => write!(f, "#- "),
        }?;
        write!(f, "{} {} ({})", self.manufacturer, self.model, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::{Car, Identifiable};

    #[test]
    fn new_car_is_transient() {
        let car = Car::new("Ford", "Focus", 2015);
        assert!(!car.is_persisted());
        assert_eq!(Identifiable::id(&car), None);
    }

    #[test]
    fn set_id_marks_car_persisted() {
        let mut car = Car::new("Ford", "Focus", 2015);
        car.set_id(7);
        assert!(car.is_persisted());
        assert_eq!(car, Car::with_id(7, "Ford", "Focus", 2015));
        assert_eq!(car.to_string(), "#7 Ford Focus (2015)");
    }

    #[test]
    fn same_attributes_ignores_identity() {
        let stored = Car::with_id(3, "Dacia", "Logan", 2012);
        assert!(stored.same_attributes(&Car::new("Dacia", "Logan", 2012)));
        assert!(!stored.same_attributes(&Car::new("Dacia", "Logan", 2013)));
    }

    #[test]
    fn transient_car_serializes_without_id() {
        let json = serde_json::to_value(Car::new("Ford", "Focus", 2015)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"manufacturer": "Ford", "model": "Focus", "year": 2015})
        );

        let parsed: Car = serde_json::from_str(
            r#"{"id": 4, "manufacturer": "Ford", "model": "Focus", "year": 2015}"#,
        )
        .unwrap();
        assert_eq!(parsed, Car::with_id(4, "Ford", "Focus", 2015));
    }
}
