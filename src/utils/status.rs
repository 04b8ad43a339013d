/// Initial status of every new order
pub const INITIAL_STATUS: &str = "New";

/// Default status values that close an order
pub const DEFAULT_CLOSING_TERMS: &[&str] = &["closed", "completed", "finished"];

/// Set of status values that mark an order as closed.
///
/// Status stays a free-form string; closing is a case-insensitive
/// membership test against this set, ignoring surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingTerms {
    terms: Vec<String>,
}

impl Default for ClosingTerms {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSING_TERMS.iter().map(|t| t.to_string()))
    }
}

impl ClosingTerms {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self { terms: normalized }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_closing(&self, status: &str) -> bool {
        let status = status.trim().to_lowercase();
        self.terms.iter().any(|t| *t == status)
    }
}
