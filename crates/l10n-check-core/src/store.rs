use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One decoded key/value pair and the line its record started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    key: String,
    value: String,
    line: u32,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>, line: u32) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            line,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} '{}' = '{}'", self.line, self.key, self.value)
    }
}

/// Properties of one resource: every record in input order, plus a lookup of
/// the last record seen for each key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    name: String,
    records: Vec<Property>,
    by_key: BTreeMap<String, usize>,
}

impl PropertyStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            by_key: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a record. Returns the line of the record it shadows, if any.
    pub fn insert(&mut self, property: Property) -> Option<u32> {
        let index = self.records.len();
        let previous = self
            .by_key
            .insert(property.key.clone(), index)
            .map(|old| self.records[old].line);
        self.records.push(property);
        previous
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.by_key.get(key).map(|index| &self.records[*index])
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(Property::value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Distinct keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    /// Last record for every key, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.by_key.values().map(|index| &self.records[*index])
    }

    /// Every record in input order, shadowed duplicates included.
    pub fn records(&self) -> &[Property] {
        &self.records
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl fmt::Display for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, property) in self.records.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{property}")?;
        }
        Ok(())
    }
}
