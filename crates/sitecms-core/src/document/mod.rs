//! The configuration document
//!
//! One tree of nested records and ordered sequences, namespaced by topic.
//! The JSON shape of [`Document`] is exactly the persisted and exported
//! format; there is no envelope around it.

mod defaults;
pub mod merge;

pub(crate) use defaults::default_theme;
pub use defaults::{PLACEHOLDER_PARTNER, placeholder_project, placeholder_service};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The configuration document shared by every view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub theme: Theme,
    pub site: Site,
    pub hero: Hero,
    pub services: Vec<Service>,
    /// Partner logo URLs
    pub partners: Vec<String>,
    pub showroom: Showroom,
    pub projects: Vec<Project>,
    pub contact: Contact,
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Legacy flag; when set the site renders dark whatever the mode says
    #[serde(default)]
    pub dark: bool,
    pub mode: ThemeMode,
    pub primary: String,
    pub accent: String,
}

/// How the theme is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the platform's ambient color-scheme preference
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(Error::invalid_input(format!(
                "Unknown theme mode '{}'. Valid: light, dark, system",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub title: String,
    pub brand: String,
    pub tagline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub cta1: CallToAction,
    pub cta2: CallToAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallToAction {
    pub label: String,
    pub link: String,
    pub icon: String,
}

/// Sequence entries are replaced wholesale on merge, so missing leaves
/// default to empty instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub icon: String,
    pub title: String,
    pub desc: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showroom {
    pub url: String,
    pub image: String,
    pub blurb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub desc: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone_formatted: String,
    pub email: String,
    /// Digits only
    pub whatsapp: String,
    pub whats_msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub showroom: String,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub youtube: String,
}

impl Document {
    /// A fresh, independent copy of the built-in default document.
    pub fn defaults() -> Self {
        defaults::DEFAULT_DOCUMENT.clone()
    }

    /// Parse a persisted payload, filling any missing keys from the defaults.
    ///
    /// Objects are merged key by key; sequences and scalars in `raw` replace
    /// the default value wholesale.
    pub fn from_persisted(raw: &str) -> Result<Self> {
        let overlay: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| Error::unreadable(e.to_string()))?;
        if !overlay.is_object() {
            return Err(Error::unreadable(format!(
                "expected a JSON object, found {}",
                merge::kind(&overlay)
            )));
        }
        Self::from_value_over_defaults(overlay).map_err(|e| Error::unreadable(e.to_string()))
    }

    /// Deep-merge `overlay` over the defaults and build a typed document.
    pub(crate) fn from_value_over_defaults(overlay: serde_json::Value) -> Result<Self> {
        let mut base = serde_json::to_value(&*defaults::DEFAULT_DOCUMENT)?;
        merge::deep_merge(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }

    /// Serialize to the compact persisted form.
    pub fn to_persisted(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to the pretty-printed export form.
    pub fn to_export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Shallow-merge an import payload onto this document.
    ///
    /// Top-level keys present in `payload` replace the corresponding keys
    /// here; absent keys are left untouched. The result is normalized over
    /// the defaults so partially specified sections stay complete. On error
    /// `self` is unchanged.
    pub fn merge_import(&mut self, payload: &str) -> Result<()> {
        let overlay: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| Error::import(e.to_string()))?;
        if !overlay.is_object() {
            return Err(Error::import(format!(
                "expected a JSON object, found {}",
                merge::kind(&overlay)
            )));
        }

        let mut current = serde_json::to_value(&*self)?;
        merge::shallow_merge(&mut current, overlay);

        let mut merged =
            Self::from_value_over_defaults(current).map_err(|e| Error::import(e.to_string()))?;
        merged.contact.whatsapp = digits_only(&merged.contact.whatsapp);
        *self = merged;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Strip everything that is not an ASCII digit.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Remove the element at `index`, shifting later elements down.
///
/// Returns `false` and leaves the sequence alone when `index` is out of range.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_independent_copies() {
        let mut a = Document::defaults();
        a.site.brand = "Changed".to_string();
        a.services.clear();

        let b = Document::defaults();
        assert_eq!(b.site.brand, "AC Technology");
        assert_eq!(b.services.len(), 3);
    }

    #[test]
    fn persisted_json_uses_original_field_names() {
        let json = Document::defaults().to_persisted().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["contact"]["phoneFormatted"], "(+51) 01 543 1138");
        assert_eq!(value["contact"]["whatsMsg"].as_str().map(str::is_empty), Some(false));
        assert_eq!(value["theme"]["mode"], "system");
        assert_eq!(value["hero"]["cta2"]["icon"], "fa-brands fa-whatsapp");
    }

    #[test]
    fn subset_of_keys_keeps_remaining_defaults() {
        let doc = Document::from_persisted(r#"{"site":{"brand":"Acme"}}"#).unwrap();
        let defaults = Document::defaults();

        assert_eq!(doc.site.brand, "Acme");
        assert_eq!(doc.site.title, defaults.site.title);
        assert_eq!(doc.hero, defaults.hero);
        assert_eq!(doc.services, defaults.services);
    }

    #[test]
    fn persisted_sequences_replace_defaults_wholesale() {
        let doc = Document::from_persisted(r#"{"partners":["https://a.example/logo.svg"]}"#)
            .unwrap();
        assert_eq!(doc.partners, vec!["https://a.example/logo.svg".to_string()]);
    }

    #[test]
    fn unparsable_payload_is_unreadable() {
        assert!(matches!(
            Document::from_persisted("{not json"),
            Err(Error::PersistedDataUnreadable(_))
        ));
        assert!(matches!(
            Document::from_persisted("[1,2,3]"),
            Err(Error::PersistedDataUnreadable(_))
        ));
        assert!(matches!(
            Document::from_persisted(r#"{"services":"three"}"#),
            Err(Error::PersistedDataUnreadable(_))
        ));
    }

    #[test]
    fn import_replaces_top_level_keys_only() {
        let mut doc = Document::defaults();
        doc.site.brand = "Edited".to_string();

        doc.merge_import(r#"{"links":{"facebook":"https://facebook.com/ac"}}"#)
            .unwrap();

        assert_eq!(doc.links.facebook, "https://facebook.com/ac");
        // absent from the import, normalized from defaults
        assert_eq!(doc.links.youtube, "#");
        // untouched top-level key
        assert_eq!(doc.site.brand, "Edited");
    }

    #[test]
    fn import_replaces_whole_section() {
        let mut doc = Document::defaults();
        doc.site.tagline = "Edited tagline".to_string();

        doc.merge_import(r#"{"site":{"brand":"Imported"}}"#).unwrap();

        assert_eq!(doc.site.brand, "Imported");
        // the imported `site` replaced the in-memory one, gaps come from defaults
        assert_eq!(doc.site.tagline, Document::defaults().site.tagline);
    }

    #[test]
    fn invalid_import_leaves_document_untouched() {
        let mut doc = Document::defaults();
        doc.site.brand = "Keep me".to_string();
        let before = doc.clone();

        assert!(matches!(
            doc.merge_import("not json at all"),
            Err(Error::ImportPayloadInvalid(_))
        ));
        assert!(matches!(
            doc.merge_import(r#""a string""#),
            Err(Error::ImportPayloadInvalid(_))
        ));
        assert!(matches!(
            doc.merge_import(r#"{"theme":{"mode":"sepia"}}"#),
            Err(Error::ImportPayloadInvalid(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn import_normalizes_whatsapp() {
        let mut doc = Document::defaults();
        doc.merge_import(r#"{"contact":{"whatsapp":"+51 (999) 123-456"}}"#)
            .unwrap();
        assert_eq!(doc.contact.whatsapp, "51999123456");
    }

    #[test]
    fn entries_missing_a_leaf_are_kept() {
        let doc = Document::from_persisted(
            r#"{"site":{"brand":"Mine"},"projects":[{"title":"a","desc":"b"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.site.brand, "Mine");
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.projects[0].desc, "b");
        assert_eq!(doc.projects[0].image, "");

        let mut doc = Document::defaults();
        doc.merge_import(r#"{"services":[{"icon":"x","title":"t","desc":"d"}]}"#)
            .unwrap();
        assert_eq!(doc.services.len(), 1);
        assert!(doc.services[0].points.is_empty());
    }

    #[test]
    fn digits_only_strips_everything_else() {
        assert_eq!(digits_only("+51 999-999 999"), "51999999999");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only("٣٤5"), "5");
    }

    #[test]
    fn remove_at_shifts_and_ignores_out_of_range() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(remove_at(&mut items, 1));
        assert_eq!(items, vec!['a', 'c', 'd']);
        assert!(!remove_at(&mut items, 3));
        assert_eq!(items, vec!['a', 'c', 'd']);
    }

    #[test]
    fn theme_mode_parses_case_insensitively() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(" system ".parse::<ThemeMode>().unwrap(), ThemeMode::System);
        assert!("sepia".parse::<ThemeMode>().is_err());
    }
}
