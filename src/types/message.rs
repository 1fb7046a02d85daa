use crate::types::FieldValue;
use std::collections::HashMap;
use std::sync::Arc;

/// One decoded instance of a log message type
///
/// Field names are declared once per type by the log's format records and shared
/// between every instance of that type.
#[derive(Debug, Clone)]
pub struct Message {
    type_name: String,
    field_names: Arc<[String]>,
    values: Vec<FieldValue>,
}

impl Message {
    pub fn new(
        type_name: impl Into<String>,
        field_names: Arc<[String]>,
        values: Vec<FieldValue>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            field_names,
            values,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Look up a field by its declared name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let index = self.field_names.iter().position(|field| field == name)?;
        self.values.get(index)
    }
}

/// Message types declared by a log, with their ordered field lists
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    formats: HashMap<String, Arc<[String]>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a message type
    pub fn declare(&mut self, type_name: impl Into<String>, field_names: Vec<String>) {
        self.formats.insert(type_name.into(), field_names.into());
    }

    pub fn declares(&self, type_name: &str) -> bool {
        self.formats.contains_key(type_name)
    }

    pub fn field_names(&self, type_name: &str) -> Option<&Arc<[String]>> {
        self.formats.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Latest decoded instance of every message type seen so far in a stream
#[derive(Debug, Clone, Default)]
pub struct MessageSnapshot {
    latest: HashMap<String, Message>,
}

impl MessageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_name: &str) -> Option<&Message> {
        self.latest.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.latest.contains_key(type_name)
    }

    /// Replace the stored instance of the message's type
    pub fn record(&mut self, message: Message) {
        self.latest.insert(message.type_name.clone(), message);
    }
}

/// One advance of a message source: the snapshot after decoding the next
/// message, and how far through the log the source has read (0-100)
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub snapshot: &'a MessageSnapshot,
    pub percent: f64,
}
