//! The theme shape and its default table.
//!
//! A [`Theme`] is two levels deep: a fixed set of [`Section`]s, each holding a
//! fixed set of string properties. The default table ([`defaults()`]) is the
//! single source of truth for that shape and for fallback values. Sections are
//! typed structs so a fully-populated theme can never be missing a property;
//! partial input is completed by [`Theme::from_partial`].
//!
//! Keys that the default table does not know about are kept in each section's
//! `extra` map (and the theme's own `extra` map for unknown sections). They are
//! carried through save and export but cannot be edited through
//! [`Theme::set`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ThemeError;

macro_rules! theme_section {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $field:ident : $key:literal = $default:literal, $desc:literal; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[doc = $desc]
                #[serde(rename = $key)]
                pub $field: String,
            )*
            /// Keys outside the default table, kept verbatim.
            #[serde(flatten)]
            pub extra: Map<String, Value>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default.to_string(), )*
                    extra: Map::new(),
                }
            }
        }

        impl $name {
            /// Known properties as `(key, description)` pairs, in table order.
            pub const PROPERTIES: &'static [(&'static str, &'static str)] = &[
                $( ($key, $desc), )*
            ];

            pub fn get(&self, property: &str) -> Option<&str> {
                match property {
                    $( $key => Some(self.$field.as_str()), )*
                    _ => None,
                }
            }

            fn slot_mut(&mut self, property: &str) -> Option<&mut String> {
                match property {
                    $( $key => Some(&mut self.$field), )*
                    _ => None,
                }
            }
        }
    };
}

theme_section! {
    /// Brand and surface colors. Every entry is projected as `color-<key>`.
    Colors {
        primary: "primary" = "#3d2518", "Main brand color (header, footer)";
        primary_light: "primaryLight" = "#4d2f20", "Lighter variant of primary";
        accent: "accent" = "#f59e0b", "Buttons, highlights, CTAs";
        accent_hover: "accentHover" = "#d97706", "Hover state for accent";
        background: "background" = "#fffbeb", "Page background";
        background_alt: "backgroundAlt" = "#fef3c7", "Alternate sections";
        text: "text" = "#1f2937", "Main text color";
        text_light: "textLight" = "#6b7280", "Secondary text";
        white: "white" = "#ffffff", "Text on dark surfaces";
        success: "success" = "#16a34a", "Success messages";
        error: "error" = "#dc2626", "Error messages";
    }
}

theme_section! {
    /// Font families and heading sizes.
    Typography {
        font_family: "fontFamily" = "Inter, system-ui, sans-serif", "Body font family";
        heading_font: "headingFont" = "Inter, system-ui, sans-serif", "Heading font family";
        base_font_size: "baseFontSize" = "16px", "Base font size";
        h1_size: "h1Size" = "3rem", "H1 size";
        h2_size: "h2Size" = "2rem", "H2 size";
        h3_size: "h3Size" = "1.5rem", "H3 size";
    }
}

impl Typography {
    /// Curated font stacks offered for `fontFamily` and `headingFont`, as
    /// `(value, label)`. Any other stack is accepted too.
    pub const FONT_OPTIONS: &'static [(&'static str, &'static str)] = &[
        ("Inter, system-ui, sans-serif", "Inter (Default)"),
        ("'Poppins', sans-serif", "Poppins"),
        ("'Roboto', sans-serif", "Roboto"),
        ("'Open Sans', sans-serif", "Open Sans"),
        ("'Lato', sans-serif", "Lato"),
        ("'Montserrat', sans-serif", "Montserrat"),
        ("'Playfair Display', serif", "Playfair Display"),
        ("'Merriweather', serif", "Merriweather"),
        ("Georgia, serif", "Georgia"),
        ("system-ui, sans-serif", "System UI"),
    ];
}

theme_section! {
    /// Site header bar.
    Header {
        background: "background" = "#3d2518", "Header background color";
        text: "text" = "#ffffff", "Header text color";
        nav_text: "navText" = "#ffffff", "Navigation text color";
        nav_hover: "navHover" = "#f59e0b", "Navigation hover color";
    }
}

theme_section! {
    /// Site footer.
    Footer {
        background: "background" = "#3d2518", "Footer background color";
        text: "text" = "#fef3c7", "Footer text color";
        link_color: "linkColor" = "#f59e0b", "Footer link color";
    }
}

theme_section! {
    /// Primary and secondary buttons.
    Buttons {
        primary_bg: "primaryBg" = "#f59e0b", "Primary button background";
        primary_text: "primaryText" = "#ffffff", "Primary button text color";
        primary_hover: "primaryHover" = "#d97706", "Primary button hover background";
        secondary_bg: "secondaryBg" = "#3d2518", "Secondary button background";
        secondary_text: "secondaryText" = "#ffffff", "Secondary button text color";
        secondary_hover: "secondaryHover" = "#2d1810", "Secondary button hover background";
        border_radius: "borderRadius" = "0.5rem", "Button border radius";
    }
}

theme_section! {
    /// Product cards. Nothing here is projected; card markup reads it directly.
    Cards {
        background: "background" = "#ffffff", "Card background color";
        border: "border" = "#e5e7eb", "Card border color";
        shadow: "shadow" = "0 1px 3px rgba(0,0,0,0.1)", "Card box shadow";
        border_radius: "borderRadius" = "1rem", "Card border radius";
    }
}

/// The full visual configuration of the storefront.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: Colors,
    pub typography: Typography,
    pub header: Header,
    pub footer: Footer,
    pub buttons: Buttons,
    pub cards: Cards,
    /// Sections outside the default table, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

static DEFAULT_THEME: LazyLock<Theme> = LazyLock::new(Theme::default);

/// The default table. Fallback for every omitted property and the target of reset.
pub fn defaults() -> &'static Theme {
    &DEFAULT_THEME
}

/// A named top-level group of properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Colors,
    Typography,
    Header,
    Footer,
    Buttons,
    Cards,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Colors,
        Section::Typography,
        Section::Header,
        Section::Footer,
        Section::Buttons,
        Section::Cards,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Colors => "colors",
            Section::Typography => "typography",
            Section::Header => "header",
            Section::Footer => "footer",
            Section::Buttons => "buttons",
            Section::Cards => "cards",
        }
    }

    /// Known `(property, description)` pairs for this section.
    pub fn properties(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Section::Colors => Colors::PROPERTIES,
            Section::Typography => Typography::PROPERTIES,
            Section::Header => Header::PROPERTIES,
            Section::Footer => Footer::PROPERTIES,
            Section::Buttons => Buttons::PROPERTIES,
            Section::Cards => Cards::PROPERTIES,
        }
    }

    pub fn describe(self, property: &str) -> Option<&'static str> {
        self.properties()
            .iter()
            .find(|(key, _)| *key == property)
            .map(|(_, desc)| *desc)
    }

    /// Suggested `(value, label)` choices for a property. Empty when free-form.
    pub fn options(self, property: &str) -> &'static [(&'static str, &'static str)] {
        match (self, property) {
            (Section::Typography, "fontFamily" | "headingFont") => Typography::FONT_OPTIONS,
            _ => &[],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ThemeError::UnknownSection(s.to_string()))
    }
}

impl Theme {
    /// Complete a partial (possibly foreign) theme with the default table.
    pub fn from_partial(overlay: &Value) -> Result<Theme, ThemeError> {
        crate::merge::merge_theme(defaults(), overlay)
    }

    pub fn get(&self, section: Section, property: &str) -> Option<&str> {
        match section {
            Section::Colors => self.colors.get(property),
            Section::Typography => self.typography.get(property),
            Section::Header => self.header.get(property),
            Section::Footer => self.footer.get(property),
            Section::Buttons => self.buttons.get(property),
            Section::Cards => self.cards.get(property),
        }
    }

    /// Replace one known leaf in place.
    pub fn set(&mut self, section: Section, property: &str, value: &str) -> Result<(), ThemeError> {
        let slot = match section {
            Section::Colors => self.colors.slot_mut(property),
            Section::Typography => self.typography.slot_mut(property),
            Section::Header => self.header.slot_mut(property),
            Section::Footer => self.footer.slot_mut(property),
            Section::Buttons => self.buttons.slot_mut(property),
            Section::Cards => self.cards.slot_mut(property),
        };
        let slot = slot.ok_or_else(|| ThemeError::UnknownProperty {
            section: section.to_string(),
            property: property.to_string(),
        })?;
        *slot = value.to_string();
        Ok(())
    }

    /// Copy of `self` with exactly one leaf replaced.
    pub fn with_property(
        &self,
        section: Section,
        property: &str,
        value: &str,
    ) -> Result<Theme, ThemeError> {
        let mut next = self.clone();
        next.set(section, property, value)?;
        Ok(next)
    }

    /// All known leaves as `("section.property", value)`, in table order.
    pub fn entries(&self) -> Vec<(String, String)> {
        Section::ALL
            .into_iter()
            .flat_map(|section| {
                section.properties().iter().filter_map(move |(key, _)| {
                    self.get(section, key)
                        .map(|value| (format!("{section}.{key}"), value.to_string()))
                })
            })
            .collect()
    }

    /// Dotted paths of every key the default table does not know.
    pub fn unknown_keys(&self) -> Vec<String> {
        let sections: [(&str, &Map<String, Value>); 6] = [
            ("colors", &self.colors.extra),
            ("typography", &self.typography.extra),
            ("header", &self.header.extra),
            ("footer", &self.footer.extra),
            ("buttons", &self.buttons.extra),
            ("cards", &self.cards.extra),
        ];
        let mut keys: Vec<String> = sections
            .into_iter()
            .flat_map(|(section, extra)| extra.keys().map(move |k| format!("{section}.{k}")))
            .collect();
        keys.extend(self.extra.keys().cloned());
        keys
    }

    pub fn to_value(&self) -> Result<Value, ThemeError> {
        serde_json::to_value(self).map_err(|e| ThemeError::InvalidTheme {
            reason: e.to_string(),
        })
    }
}
