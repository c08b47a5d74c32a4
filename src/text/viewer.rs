/// Who is reading formatted text, and what their client can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub first_name: String,
    pub last_name: String,
    pub supports_color: bool,
    pub supports_high_ascii: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            supports_color: true,
            supports_high_ascii: true,
        }
    }
}

impl Viewer {
    /// Build a viewer from a full name; the first word is the first name.
    pub fn from_full_name(full_name: &str) -> Self {
        let mut words = full_name.split_whitespace();
        let first_name = words.next().unwrap_or_default().to_string();
        let last_name = words.collect::<Vec<_>>().join(" ");
        Self {
            first_name,
            last_name,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_color(mut self, supported: bool) -> Self {
        self.supports_color = supported;
        self
    }

    #[must_use]
    pub const fn with_high_ascii(mut self, supported: bool) -> Self {
        self.supports_high_ascii = supported;
        self
    }

    /// Text substituted for `<player_name>`.
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }
}
