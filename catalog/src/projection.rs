//! Field Projections
//!
//! Restricts what an entity exposes over the API. Each projectable entity
//! declares a static field list; [`project`] walks that list in order and
//! never emits anything outside it.

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

use crate::models::{Book, User};

pub const BOOK_FIELDS: &[&str] = &["name", "isbn", "genre", "copies_sold", "avg_rating"];
pub const USER_FIELDS: &[&str] = &["username", "email"];

pub trait Projectable {
    const FIELDS: &'static [&'static str];

    /// Value of a declared field, `None` for names the entity doesn't expose
    fn field(&self, name: &str) -> Option<Value>;
}

impl Projectable for Book {
    const FIELDS: &'static [&'static str] = BOOK_FIELDS;

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "name" => Value::from(self.name.as_str()),
            "isbn" => Value::from(self.isbn.as_str()),
            "genre" => Value::from(self.genre.as_str()),
            "copies_sold" => Value::from(self.copies_sold),
            "avg_rating" => Value::from(self.avg_rating),
            _ => return None,
        };
        Some(value)
    }
}

impl Projectable for User {
    const FIELDS: &'static [&'static str] = USER_FIELDS;

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "username" => Value::from(self.username.as_str()),
            "email" => Value::from(self.email.as_deref()),
            _ => return None,
        };
        Some(value)
    }
}

/// Ordered field/value pairs, serialized as a JSON object in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Projection(Vec<(&'static str, Value)>);

impl Projection {
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(key, _)| *key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub fn project<T: Projectable>(entity: &T) -> Projection {
    Projection(
        T::FIELDS
            .iter()
            .filter_map(|&name| entity.field(name).map(|value| (name, value)))
            .collect(),
    )
}

pub fn project_all<T: Projectable>(entities: &[T]) -> Vec<Projection> {
    entities.iter().map(project).collect()
}
