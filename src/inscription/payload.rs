use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::utils::constants::JSON_CONTENT_TYPE;
use crate::{Inscription, OrdResult};

/// JSON object with string values, serialized in insertion order.
///
/// Key order is part of the inscribed bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPayload {
    fields: Vec<(String, String)>,
}

impl JsonPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`JsonPayload::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Sets `key` to `value`. An existing key keeps its position.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, current)) => *current = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode the payload as compact JSON
    pub fn encode(&self) -> OrdResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for JsonPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for JsonPayload
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.push(key, value);
        }
        payload
    }
}

impl Inscription for JsonPayload {
    fn content_type(&self) -> String {
        JSON_CONTENT_TYPE.to_string()
    }

    fn data(&self) -> OrdResult<Vec<u8>> {
        Ok(self.encode()?.into_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_should_keep_insertion_order() {
        let payload = JsonPayload::new()
            .with("z", "last letter")
            .with("a", 1)
            .with("m", true);

        assert_eq!(
            payload.encode().unwrap(),
            r#"{"z":"last letter","a":"1","m":"true"}"#
        );
    }

    #[test]
    fn test_should_replace_existing_key_in_place() {
        let mut payload: JsonPayload = [("p", "x"), ("op", "y"), ("tick", "z")]
            .into_iter()
            .collect();
        payload.push("op", "mint");

        assert_eq!(payload.fields().len(), 3);
        assert_eq!(payload.get("op"), Some("mint"));
        assert_eq!(
            payload.encode().unwrap(),
            r#"{"p":"x","op":"mint","tick":"z"}"#
        );
    }

    #[test]
    fn test_should_escape_values() {
        let payload = JsonPayload::new().with("name", "a \"quoted\" name");

        assert_eq!(
            payload.encode().unwrap(),
            r#"{"name":"a \"quoted\" name"}"#
        );
    }

    #[test]
    fn test_should_build_json_envelope() {
        let payload = JsonPayload::new().with("hello", "world");
        let envelope = payload.envelope().unwrap();

        assert_eq!(envelope.content_type(), "application/json");
        assert_eq!(envelope.content(), br#"{"hello":"world"}"#);
    }
}
