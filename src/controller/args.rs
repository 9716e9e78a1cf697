use crate::error::{Error, Result};
use crate::request::{ParamVec, Params, PositionalVec};

/// Arguments an action is called with, bound from the route's captures.
///
/// Named captures bind by name, positional captures bind in order. The two
/// strategies are mutually exclusive and selected by the capture form the
/// matched pattern produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Args {
    #[default]
    None,
    Named(ParamVec),
    Positional(PositionalVec),
}

impl Args {
    /// Named argument. If a name repeats, the last occurrence wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Args::Named(params) => params
                .iter()
                .rfind(|(k, _)| k.as_ref() == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Named argument the action cannot run without.
    ///
    /// # Errors
    ///
    /// [`Error::MissingArgument`] when the route did not capture `name`.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::MissingArgument(name.to_string()))
    }

    #[must_use]
    pub fn positional(&self, idx: usize) -> Option<&str> {
        match self {
            Args::Positional(values) => values.get(idx).map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Args::None => 0,
            Args::Named(params) => params.len(),
            Args::Positional(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Params> for Args {
    fn from(params: Params) -> Self {
        match params {
            Params::None => Args::None,
            Params::Named(params) => Args::Named(params),
            Params::Positional(values) => Args::Positional(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_named_binding() {
        let mut params = ParamVec::new();
        params.push((Arc::from("id"), "42".to_string()));
        let args = Args::from(Params::Named(params));
        assert_eq!(args.require("id").unwrap(), "42");
        assert!(matches!(args.require("slug"), Err(Error::MissingArgument(_))));
        assert_eq!(args.positional(0), None);
    }

    #[test]
    fn test_positional_binding() {
        let values = PositionalVec::from_vec(vec!["a".to_string(), "b".to_string()]);
        let args = Args::from(Params::Positional(values));
        assert_eq!(args.positional(1), Some("b"));
        assert_eq!(args.get("a"), None);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_no_captures() {
        let args = Args::from(Params::None);
        assert!(args.is_empty());
        assert!(args.require("id").is_err());
    }
}
