use serde::{Deserialize, Deserializer};

/// A field in a partial-update body.
///
/// JSON has three states for an optional key and a plain `Option` collapses two
/// of them. Fields of this type must carry `#[serde(default)]` so a missing key
/// lands on `Absent`; an explicit `null` becomes `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// `None` when the key was missing, `Some(None)` for an explicit null.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        field: Patch<String>,
    }

    fn parse(json: &str) -> Patch<String> {
        serde_json::from_str::<Body>(json).unwrap().field
    }

    #[test]
    fn test_missing_key_is_absent() {
        assert_eq!(parse("{}"), Patch::Absent);
        assert!(parse("{}").is_absent());
    }

    #[test]
    fn test_null_and_value() {
        assert_eq!(parse(r#"{"field":null}"#), Patch::Null);
        assert_eq!(parse(r#"{"field":"x"}"#), Patch::Value("x".to_string()));
        assert_eq!(parse(r#"{"field":""}"#), Patch::Value(String::new()));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"field":5}"#).is_err());
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Patch::<String>::Absent.into_option(), None);
        assert_eq!(Patch::<String>::Null.into_option(), Some(None));
        assert_eq!(Patch::Value(1).into_option(), Some(Some(1)));
    }
}
