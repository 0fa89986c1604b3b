//! Inline style declarations and class lists for in-memory elements

/// Ordered `property: value` declarations of a `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a `style` attribute such as `font-size: 20px; color: red`
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::default();
        for declaration in css_text.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                let value = value.trim();
                if !property.is_empty() && !value.is_empty() {
                    style.set(property, value);
                }
            }
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration; an existing one keeps its position
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.declarations.retain(|(p, _)| !p.eq_ignore_ascii_case(property));
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialized like a browser's `cssText`: `font-size: 20px; color: red;`
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whitespace separated `class` attribute tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn parse(value: &str) -> Self {
        let mut list = Self::default();
        for token in value.split_whitespace() {
            list.add(token);
        }
        list
    }

    pub fn contains(&self, class: &str) -> bool {
        self.tokens.iter().any(|t| t == class)
    }

    pub fn add(&mut self, class: &str) {
        if !class.is_empty() && !self.contains(class) {
            self.tokens.push(class.to_string());
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.tokens.retain(|t| t != class);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}
