use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::client::error::EncodingError;

/// Parameter values supplied for one call.
///
/// Values are converted to JSON when added; a conversion failure is kept and
/// reported when the request is built, so the builder chain stays infallible.
///
/// # Example
///
/// ```rust
/// use runx_client::CallParams;
///
/// let params = CallParams::default()
///     .add_param("appId", "my-app")
///     .add_param("enabled", true);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallParams {
    values: IndexMap<String, Result<Value, String>>,
}

impl CallParams {
    /// Adds (or replaces) a parameter value.
    #[must_use]
    pub fn add_param<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value).map_err(|err| err.to_string());
        self.values.insert(name.into(), value);
        self
    }

    /// Looks up a parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Serialization`] if the value could not be converted to JSON.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, EncodingError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(message)) => Err(EncodingError::Serialization {
                name: name.to_string(),
                message: message.clone(),
            }),
        }
    }

    /// Iterates over the supplied parameter names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of supplied parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn should_replace_existing_values() {
        let params = CallParams::default()
            .add_param("appId", "first")
            .add_param("appId", "second");

        assert_eq!(params.len(), 1);
        assert_eq!(
            params.get("appId").expect("should be valid"),
            Some(&json!("second"))
        );
    }

    #[test]
    fn should_keep_insertion_order() {
        let params = CallParams::default().add_param("b", 1).add_param("a", 2);

        assert_eq!(params.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn should_defer_serialization_errors() {
        // JSON object keys must be strings
        let mut map = BTreeMap::new();
        map.insert(vec![1_u8], "value");

        let params = CallParams::default().add_param("broken", map);
        let result = params.get("broken");

        assert!(matches!(
            result,
            Err(EncodingError::Serialization { ref name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn should_return_none_for_unknown_names() {
        let params = CallParams::default();

        assert!(params.is_empty());
        assert_eq!(params.get("missing").expect("should be valid"), None);
    }
}
