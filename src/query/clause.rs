use serde::{Deserialize, Serialize};
use crate::core::{BuildError, Value};

/// Placeholder character bound positionally by the driver.
pub const WILDCARD: char = '?';

/// One fragment of a statement together with the parameters bound to its `?`s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clause {
    pub text: String,
    pub params: Vec<Value>,
}

impl Clause {
    /// Checks the 1:1 wildcard/parameter relation before accepting the fragment.
    pub fn checked<I, V>(clause: &'static str, text: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let text = text.into();
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        let expected = count_wildcards(&text);

        if expected != params.len() {
            return Err(BuildError::WildcardMismatch {
                clause,
                text,
                expected,
                given: params.len(),
            });
        }

        Ok(Self { text, params })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Join {
    /// LEFT, RIGHT, INNER, OUTER, ...
    pub kind: String,
    pub clause: Clause,
}

#[must_use]
pub fn count_wildcards(text: &str) -> usize {
    text.matches(WILDCARD).count()
}

/// Backtick-quotes an identifier, doubling any backtick inside it.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_matching_params() {
        let clause = Clause::checked("WHERE", "a = ? AND b = ?", [1, 2]).unwrap();
        assert_eq!(clause.params, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_checked_rejects_too_few_and_too_many() {
        for given in [vec![], vec![Value::Integer(1), Value::Integer(2)]] {
            let err = Clause::checked("WHERE", "a = ?", given.clone()).unwrap_err();
            assert_eq!(
                err,
                BuildError::WildcardMismatch {
                    clause: "WHERE",
                    text: "a = ?".to_string(),
                    expected: 1,
                    given: given.len(),
                }
            );
        }
    }

    #[test]
    fn test_no_wildcards_no_params() {
        assert!(Clause::checked("HAVING", "count(*) > 1", Vec::<Value>::new()).is_ok());
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "`users`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }
}
