//! Case-preserving, multi-valued header map shared by both message models.
//!
//! # Design
//! `http::HeaderMap` lower-cases every name, which would lose the casing the
//! foundation model hands us. `Headers` keeps names exactly as inserted and
//! only compares them case-insensitively on lookup. Iteration follows
//! insertion order so `Set-Cookie` values keep the order cookies were set.

use indexmap::IndexMap;

/// Ordered map from header name to its ordered list of values.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: IndexMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Replace every value of `name`.
    ///
    /// An existing entry matched case-insensitively keeps its position and
    /// its original casing; otherwise the entry is appended.
    pub fn set<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.key_of(&name) {
            Some(key) => {
                if let Some(slot) = self.entries.get_mut(&key) {
                    *slot = values;
                }
            }
            None => {
                self.entries.insert(name, values);
            }
        }
    }

    /// Append a single value to `name`, creating the entry if needed.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let key = self.key_of(&name).unwrap_or(name);
        self.entries.entry(key).or_default().push(value.into());
    }

    /// All values of `name` (case-insensitive); empty when absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.key_of(name).is_some()
    }

    /// Values of `name` joined by `", "`, or an empty string when absent.
    pub fn line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Remove `name` and return its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.key_of(name)?;
        self.entries.shift_remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
    }
}

// `IndexMap` equality ignores order; header order is significant here.
impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Headers {}

impl<N, V> FromIterator<(N, Vec<V>)> for Headers
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<V>)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, values) in iter {
            headers.set(name, values);
        }
        headers
    }
}
