//! Station name filter

/// Allow/deny lists of dotted-name prefixes.
///
/// An empty allow list admits every name. Deny prefixes always win. With
/// `trim_prefix` set, the longest matching allow prefix is cut from names
/// shown on the drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub trim_prefix: bool,
}

impl NameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit names starting with `prefix`.
    pub fn allow(mut self, prefix: impl Into<String>) -> Self {
        self.allow.push(prefix.into());
        self
    }

    /// Reject names starting with `prefix`.
    pub fn deny(mut self, prefix: impl Into<String>) -> Self {
        self.deny.push(prefix.into());
        self
    }

    pub fn with_trim_prefix(mut self, trim: bool) -> Self {
        self.trim_prefix = trim;
        self
    }

    fn allow_match(&self, name: &str) -> Option<&str> {
        self.allow
            .iter()
            .filter(|p| name.starts_with(p.as_str()))
            .max_by_key(|p| p.len())
            .map(String::as_str)
    }

    pub fn accepts(&self, name: &str) -> bool {
        let allowed = self.allow.is_empty() || self.allow_match(name).is_some();
        allowed && !self.deny.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Name as shown on the drawing.
    pub fn display_name<'a>(&self, name: &'a str) -> &'a str {
        if !self.trim_prefix {
            return name;
        }
        match self.allow_match(name) {
            Some(prefix) => &name[prefix.len()..],
            None => name,
        }
    }
}
