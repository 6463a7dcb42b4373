use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Colour palette entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
}

impl Theme {
    /// Palette in display order; the first entry is the default
    pub const ALL: [Theme; 5] = [
        Theme::Blue,
        Theme::Green,
        Theme::Purple,
        Theme::Orange,
        Theme::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Pink => "pink",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid theme '{}'. Valid themes: blue, green, purple, orange, pink",
                    s
                )
            })
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// UI preferences persisted next to the boards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub dark_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_first_palette_entry() {
        assert_eq!(Theme::default(), Theme::ALL[0]);
        assert!(!Preferences::default().dark_mode);
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str("purple").unwrap(), Theme::Purple);
        assert_eq!(Theme::from_str(" Pink ").unwrap(), Theme::Pink);
        assert!(Theme::from_str("teal").is_err());
        assert!(Theme::from_str("").is_err());
    }

    #[test]
    fn test_theme_display_roundtrip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_str(&theme.to_string()).unwrap(), theme);
        }
    }
}
