//! Document edits
//!
//! Every mutation a view can make is an [`Edit`]. Applying an edit only
//! touches the in-memory document; [`View::apply`](crate::View::apply) is
//! what follows it with persist and re-render, in that order.
//!
//! Field edits are addressed by [`Field`], which parses from the admin form
//! input ids (`i-brand`, `i-srv-title-2`, ...).

use std::str::FromStr;

use crate::document::{
    self, Document, PLACEHOLDER_PARTNER, ThemeMode, digits_only, placeholder_project,
    placeholder_service, remove_at,
};
use crate::error::{Error, Result};
use crate::render::{RenderEnv, ThemeDecision};

/// One of the two hero call-to-action buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaSlot {
    First,
    Second,
}

/// Social and external links in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Showroom,
    Facebook,
    Instagram,
    LinkedIn,
    YouTube,
}

/// Every editable leaf of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SiteTitle,
    SiteBrand,
    SiteTagline,
    HeroTitle,
    HeroSubtitle,
    HeroImage,
    CtaLabel(CtaSlot),
    CtaIcon(CtaSlot),
    CtaLink(CtaSlot),
    ServiceIcon(usize),
    ServiceTitle(usize),
    ServiceDesc(usize),
    /// One point per line; blank lines are dropped
    ServicePoints(usize),
    Partner(usize),
    ShowroomUrl,
    ShowroomImage,
    ShowroomBlurb,
    ProjectTitle(usize),
    ProjectDesc(usize),
    ProjectImage(usize),
    ContactPhone,
    ContactEmail,
    /// Normalized to digits only
    ContactWhatsapp,
    ContactWhatsMsg,
    Link(LinkKind),
    ThemePrimary,
    ThemeAccent,
}

impl Field {
    /// The admin form input id for this field
    pub fn id(&self) -> String {
        match self {
            Field::SiteTitle => "i-title".to_string(),
            Field::SiteBrand => "i-brand".to_string(),
            Field::SiteTagline => "i-tagline".to_string(),
            Field::HeroTitle => "i-hero-title".to_string(),
            Field::HeroSubtitle => "i-hero-subtitle".to_string(),
            Field::HeroImage => "i-hero-image".to_string(),
            Field::CtaLabel(slot) => format!("i-cta{}-label", slot_number(*slot)),
            Field::CtaIcon(slot) => format!("i-cta{}-icon", slot_number(*slot)),
            Field::CtaLink(slot) => format!("i-cta{}-link", slot_number(*slot)),
            Field::ServiceIcon(i) => format!("i-srv-icon-{i}"),
            Field::ServiceTitle(i) => format!("i-srv-title-{i}"),
            Field::ServiceDesc(i) => format!("i-srv-desc-{i}"),
            Field::ServicePoints(i) => format!("i-srv-pts-{i}"),
            Field::Partner(i) => format!("i-logo-{i}"),
            Field::ShowroomUrl => "i-showroom-url".to_string(),
            Field::ShowroomImage => "i-showroom-img".to_string(),
            Field::ShowroomBlurb => "i-showroom-blurb".to_string(),
            Field::ProjectTitle(i) => format!("i-prj-title-{i}"),
            Field::ProjectDesc(i) => format!("i-prj-desc-{i}"),
            Field::ProjectImage(i) => format!("i-prj-img-{i}"),
            Field::ContactPhone => "i-phone".to_string(),
            Field::ContactEmail => "i-email".to_string(),
            Field::ContactWhatsapp => "i-wa".to_string(),
            Field::ContactWhatsMsg => "i-wa-msg".to_string(),
            Field::Link(kind) => format!("i-link-{}", link_name(*kind)),
            Field::ThemePrimary => "i-primary".to_string(),
            Field::ThemeAccent => "i-accent".to_string(),
        }
    }
}

fn slot_number(slot: CtaSlot) -> u8 {
    match slot {
        CtaSlot::First => 1,
        CtaSlot::Second => 2,
    }
}

fn link_name(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Showroom => "showroom",
        LinkKind::Facebook => "facebook",
        LinkKind::Instagram => "instagram",
        LinkKind::LinkedIn => "linkedin",
        LinkKind::YouTube => "youtube",
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim();
        let field = match id {
            "i-title" => Field::SiteTitle,
            "i-brand" => Field::SiteBrand,
            "i-tagline" => Field::SiteTagline,
            "i-hero-title" => Field::HeroTitle,
            "i-hero-subtitle" => Field::HeroSubtitle,
            "i-hero-image" => Field::HeroImage,
            "i-cta1-label" => Field::CtaLabel(CtaSlot::First),
            "i-cta1-icon" => Field::CtaIcon(CtaSlot::First),
            "i-cta1-link" => Field::CtaLink(CtaSlot::First),
            "i-cta2-label" => Field::CtaLabel(CtaSlot::Second),
            "i-cta2-icon" => Field::CtaIcon(CtaSlot::Second),
            "i-cta2-link" => Field::CtaLink(CtaSlot::Second),
            "i-showroom-url" => Field::ShowroomUrl,
            "i-showroom-img" => Field::ShowroomImage,
            "i-showroom-blurb" => Field::ShowroomBlurb,
            "i-phone" => Field::ContactPhone,
            "i-email" => Field::ContactEmail,
            "i-wa" => Field::ContactWhatsapp,
            "i-wa-msg" => Field::ContactWhatsMsg,
            "i-link-showroom" => Field::Link(LinkKind::Showroom),
            "i-link-facebook" => Field::Link(LinkKind::Facebook),
            "i-link-instagram" => Field::Link(LinkKind::Instagram),
            "i-link-linkedin" => Field::Link(LinkKind::LinkedIn),
            "i-link-youtube" => Field::Link(LinkKind::YouTube),
            "i-primary" => Field::ThemePrimary,
            "i-accent" => Field::ThemeAccent,
            _ => return parse_indexed(id),
        };
        Ok(field)
    }
}

fn parse_indexed(id: &str) -> Result<Field> {
    let unknown = || Error::invalid_input(format!("Unknown field id '{}'", id));

    let (prefix, index) = id.rsplit_once('-').ok_or_else(unknown)?;
    let index: usize = index.parse().map_err(|_| unknown())?;

    let field = match prefix {
        "i-srv-icon" => Field::ServiceIcon(index),
        "i-srv-title" => Field::ServiceTitle(index),
        "i-srv-desc" => Field::ServiceDesc(index),
        "i-srv-pts" => Field::ServicePoints(index),
        "i-logo" => Field::Partner(index),
        "i-prj-title" => Field::ProjectTitle(index),
        "i-prj-desc" => Field::ProjectDesc(index),
        "i-prj-img" => Field::ProjectImage(index),
        _ => return Err(unknown()),
    };
    Ok(field)
}

/// A single mutation of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace one field's value
    Set { field: Field, value: String },
    /// Append a placeholder service
    AddService,
    RemoveService(usize),
    /// Append the placeholder partner logo
    AddPartner,
    RemovePartner(usize),
    /// Append a placeholder project
    AddProject,
    RemoveProject(usize),
    SetThemeMode(ThemeMode),
    /// Switch to light if the site currently renders dark, else to dark
    ToggleTheme,
    /// Restore the default theme section
    ResetTheme,
}

impl Edit {
    /// Convenience constructor for [`Edit::Set`]
    pub fn set(field: Field, value: impl Into<String>) -> Self {
        Edit::Set {
            field,
            value: value.into(),
        }
    }

    /// Apply to `doc`
    ///
    /// Returns `false` when the edit addresses an entry that does not exist;
    /// the document is then unchanged.
    pub fn apply(&self, doc: &mut Document, env: &RenderEnv) -> bool {
        match self {
            Edit::Set { field, value } => set_field(doc, *field, value),
            Edit::AddService => {
                doc.services.push(placeholder_service());
                true
            }
            Edit::RemoveService(i) => remove_at(&mut doc.services, *i),
            Edit::AddPartner => {
                doc.partners.push(PLACEHOLDER_PARTNER.to_string());
                true
            }
            Edit::RemovePartner(i) => remove_at(&mut doc.partners, *i),
            Edit::AddProject => {
                doc.projects.push(placeholder_project());
                true
            }
            Edit::RemoveProject(i) => remove_at(&mut doc.projects, *i),
            Edit::SetThemeMode(mode) => {
                doc.theme.mode = *mode;
                true
            }
            Edit::ToggleTheme => {
                let currently_dark = ThemeDecision::resolve(&doc.theme, env).dark;
                doc.theme.mode = if currently_dark {
                    ThemeMode::Light
                } else {
                    ThemeMode::Dark
                };
                true
            }
            Edit::ResetTheme => {
                doc.theme = document::default_theme();
                true
            }
        }
    }
}

fn set_field(doc: &mut Document, field: Field, value: &str) -> bool {
    let slot = match field {
        Field::SiteTitle => &mut doc.site.title,
        Field::SiteBrand => &mut doc.site.brand,
        Field::SiteTagline => &mut doc.site.tagline,
        Field::HeroTitle => &mut doc.hero.title,
        Field::HeroSubtitle => &mut doc.hero.subtitle,
        Field::HeroImage => &mut doc.hero.image,
        Field::CtaLabel(slot) => &mut cta_mut(doc, slot).label,
        Field::CtaIcon(slot) => &mut cta_mut(doc, slot).icon,
        Field::CtaLink(slot) => &mut cta_mut(doc, slot).link,
        Field::ServicePoints(i) => {
            let Some(service) = doc.services.get_mut(i) else {
                return false;
            };
            service.points = split_points(value);
            return true;
        }
        Field::ServiceIcon(i) => match doc.services.get_mut(i) {
            Some(service) => &mut service.icon,
            None => return false,
        },
        Field::ServiceTitle(i) => match doc.services.get_mut(i) {
            Some(service) => &mut service.title,
            None => return false,
        },
        Field::ServiceDesc(i) => match doc.services.get_mut(i) {
            Some(service) => &mut service.desc,
            None => return false,
        },
        Field::Partner(i) => match doc.partners.get_mut(i) {
            Some(partner) => partner,
            None => return false,
        },
        Field::ShowroomUrl => &mut doc.showroom.url,
        Field::ShowroomImage => &mut doc.showroom.image,
        Field::ShowroomBlurb => &mut doc.showroom.blurb,
        Field::ProjectTitle(i) => match doc.projects.get_mut(i) {
            Some(project) => &mut project.title,
            None => return false,
        },
        Field::ProjectDesc(i) => match doc.projects.get_mut(i) {
            Some(project) => &mut project.desc,
            None => return false,
        },
        Field::ProjectImage(i) => match doc.projects.get_mut(i) {
            Some(project) => &mut project.image,
            None => return false,
        },
        Field::ContactPhone => &mut doc.contact.phone_formatted,
        Field::ContactEmail => &mut doc.contact.email,
        Field::ContactWhatsapp => {
            doc.contact.whatsapp = digits_only(value);
            return true;
        }
        Field::ContactWhatsMsg => &mut doc.contact.whats_msg,
        Field::Link(kind) => match kind {
            LinkKind::Showroom => &mut doc.links.showroom,
            LinkKind::Facebook => &mut doc.links.facebook,
            LinkKind::Instagram => &mut doc.links.instagram,
            LinkKind::LinkedIn => &mut doc.links.linkedin,
            LinkKind::YouTube => &mut doc.links.youtube,
        },
        Field::ThemePrimary => &mut doc.theme.primary,
        Field::ThemeAccent => &mut doc.theme.accent,
    };
    *slot = value.to_string();
    true
}

fn cta_mut(doc: &mut Document, slot: CtaSlot) -> &mut document::CallToAction {
    match slot {
        CtaSlot::First => &mut doc.hero.cta1,
        CtaSlot::Second => &mut doc.hero.cta2,
    }
}

/// One point per line, trimmed, blank lines dropped
pub fn split_points(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
