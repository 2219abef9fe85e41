use common::model::role::Role;
use common::model::template::TextElement;
use std::collections::BTreeMap;

/// Runtime values keyed by role.
///
/// Built from arbitrary string pairs (query parameters, CSV headers); keys
/// outside the [`Role`] vocabulary are dropped on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<Role, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: Role, value: impl Into<String>) -> Self {
        self.insert(role, value);
        self
    }

    pub fn insert(&mut self, role: Role, value: impl Into<String>) {
        self.values.insert(role, value.into());
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        self.values.get(&role).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Substitutions::new();
        for (key, value) in iter {
            if let Some(role) = Role::parse(key.as_ref()) {
                subs.insert(role, value);
            }
        }
        subs
    }
}

/// Picks the string to draw for `element`.
///
/// A non-empty substitution for the element's role wins; otherwise the
/// element's own text is used. There is no further fallback.
pub fn resolve_text<'a>(element: &'a TextElement, substitutions: &'a Substitutions) -> &'a str {
    Role::parse(&element.element_type)
        .and_then(|role| substitutions.get(role))
        .filter(|value| !value.is_empty())
        .unwrap_or(element.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(element_type: &str, text: &str) -> TextElement {
        TextElement {
            element_type: element_type.to_string(),
            text: text.to_string(),
            font_size: 24,
            color: "#000000".to_string(),
            x: 0,
            y: 0,
        }
    }

    #[test]
    fn substitution_replaces_default_text() {
        let subs = Substitutions::new().with(Role::Name, "Alex");
        assert_eq!(resolve_text(&element("name", "Jane Doe"), &subs), "Alex");
    }

    #[test]
    fn empty_substitution_keeps_default_text() {
        let subs = Substitutions::new().with(Role::Name, "");
        assert_eq!(resolve_text(&element("name", "Jane Doe"), &subs), "Jane Doe");
    }

    #[test]
    fn roles_do_not_leak_into_each_other() {
        let subs = Substitutions::new()
            .with(Role::Birthdate, "1990-04-01")
            .with(Role::Quote, "Carpe diem");
        assert_eq!(resolve_text(&element("name", "Jane Doe"), &subs), "Jane Doe");
        assert_eq!(resolve_text(&element("birthdate", "?"), &subs), "1990-04-01");
        assert_eq!(resolve_text(&element("quote", "?"), &subs), "Carpe diem");
    }

    #[test]
    fn unknown_element_type_always_renders_default() {
        let subs: Substitutions = [("greeting", "Hi!"), ("name", "Alex")].into_iter().collect();
        assert_eq!(resolve_text(&element("greeting", "Happy birthday"), &subs), "Happy birthday");
    }

    #[test]
    fn unknown_keys_are_dropped_when_collecting() {
        let subs: Substitutions = [("greeting", "Hi!"), ("colour", "red")].into_iter().collect();
        assert!(subs.is_empty());
    }
}
