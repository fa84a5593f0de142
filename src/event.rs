use crate::error::{Error, Result};

/// Attributes of an element in document order.
///
/// Names are unique. Lookup is linear, which is fine for the handful of
/// attributes an element of a project file carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes { pairs: Vec::new() }
    }

    /// Append an attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedInput`]: an attribute with this name already exists.
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::malformed(format!("Duplicate attribute {}", name)));
        }
        self.pairs.push((name, value.into()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the value of an existing attribute in place, or append it.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(key, _)| *key == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(key, _)| key == name)?;
        Some(self.pairs.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Low level notification from the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    DocStart,
    DocEnd,
    ElemStart { name: String, attrs: Attributes },
    ElemEnd { name: String },
    /// Character data in its escaped source form. Consecutive chunks
    /// belong to the same run of text.
    Chars { content: String },
}

/// Consumer of parse events.
pub trait EventSink {
    fn push(&mut self, event: ParseEvent) -> Result<()>;
}

impl EventSink for Vec<ParseEvent> {
    fn push(&mut self, event: ParseEvent) -> Result<()> {
        Vec::push(self, event);
        Ok(())
    }
}
