//! Named parameter bindings owned by a single statement.

use crate::value::Value;

/// Marker prefixed to every parameter name.
pub const PARAM_MARKER: char = ':';

/// Format the parameter name for a column: `title` -> `:title`.
pub fn param_name(column: &str) -> String {
    let mut name = String::with_capacity(column.len() + 1);
    name.push(PARAM_MARKER);
    name.push_str(column);
    name
}

/// Ordered name -> value bindings of a statement.
///
/// Names are stored with the `:` marker; `id` and `:id` name the same
/// binding. Names are unique; binding an existing name replaces its value in place, so
/// the first binding keeps its position. Order follows first insertion, which
/// keeps rendered INSERT column lists and logs reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` is bound, with or without the marker.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Value bound under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    /// Bind `value` under `name`, replacing any previous value for that name.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = with_marker(name.into());
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Builder-style [`Params::bind`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    /// Merge `other` into `self`; on a name clash the value from `other` wins.
    pub fn merge(&mut self, other: Params) {
        for (name, value) in other.entries {
            self.bind(name, value);
        }
    }

    /// Bind `value` under a name derived from `column` that is not yet taken.
    ///
    /// Tries `:column` first. When taken, probes `:column{n}` with `n` drawn
    /// from `counter`, which is shared across one compilation pass and
    /// incremented after every probe. Returns the name used, without the marker.
    pub fn bind_unique(&mut self, column: &str, value: Value, counter: &mut usize) -> String {
        let mut candidate = column.to_string();
        while self.contains(&param_name(&candidate)) {
            candidate = format!("{column}{}", *counter);
            *counter += 1;
        }
        self.entries.push((param_name(&candidate), value));
        candidate
    }

    /// Iterate `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Remove all bindings.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        let bare = name.strip_prefix(PARAM_MARKER).unwrap_or(name);
        self.entries
            .iter()
            .position(|(n, _)| n.strip_prefix(PARAM_MARKER) == Some(bare))
    }
}

fn with_marker(name: String) -> String {
    if name.starts_with(PARAM_MARKER) {
        name
    } else {
        param_name(&name)
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.bind(name, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build [`Params`] from `name => value` pairs.
///
/// ```ignore
/// let params = raveorm::params! { ":id" => 2, ":title" => "hello" };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(params.bind($name, $value);)+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_keeps_position() {
        let mut params = Params::new();
        params.bind(":a", 1).bind(":b", 2).bind(":a", 3);
        let names: Vec<_> = params.names().collect();
        assert_eq!(names, [":a", ":b"]);
        assert_eq!(params.get(":a"), Some(&Value::Int(3)));
    }

    #[test]
    fn bind_unique_suffixes_with_shared_counter() {
        let mut params = Params::new();
        let mut counter = 0;
        assert_eq!(params.bind_unique("id", Value::Int(1), &mut counter), "id");
        assert_eq!(params.bind_unique("id", Value::Int(2), &mut counter), "id0");
        assert_eq!(params.bind_unique("title", Value::Int(3), &mut counter), "title");
        assert_eq!(params.bind_unique("title", Value::Int(4), &mut counter), "title1");
        assert_eq!(params.bind_unique("id", Value::Int(5), &mut counter), "id2");
        assert_eq!(counter, 3);
    }

    #[test]
    fn bind_unique_skips_taken_suffix() {
        let mut params = Params::new().with(":id", 1).with(":id0", 2);
        let mut counter = 0;
        assert_eq!(params.bind_unique("id", Value::Int(3), &mut counter), "id1");
    }

    #[test]
    fn merge_overwrites() {
        let mut params = Params::new().with(":title", "a");
        params.merge(Params::new().with(":title", "b").with(":id", 1));
        assert_eq!(params.get(":title"), Some(&Value::Text("b".into())));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn names_without_marker_are_normalized() {
        let mut params = Params::new().with("id", 1);
        assert_eq!(params.names().collect::<Vec<_>>(), [":id"]);
        assert_eq!(params.get("id"), params.get(":id"));

        params.bind(":id", 2);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some(&Value::Int(2)));
    }

    #[test]
    fn params_macro() {
        let params = crate::params! { ":id" => 2, ":name" => "n" };
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(":id"), Some(&Value::Int(2)));
    }
}
