use maud::{DOCTYPE, Markup, html};

use super::{RenderEnv, Renderer, ThemeDecision};
use crate::document::{CallToAction, Document, ThemeMode};
use crate::edit::{CtaSlot, Field, LinkKind};

/// Sidebar sections, in display order
pub const SECTIONS: &[(&str, &str)] = &[
    ("s-dashboard", "Dashboard"),
    ("s-hero", "Hero / Inicio"),
    ("s-servicios", "Servicios"),
    ("s-marcas", "Marcas"),
    ("s-showroom", "Showroom"),
    ("s-proyectos", "Proyectos"),
    ("s-contacto", "Contacto"),
    ("s-links", "Redes & Links"),
    ("s-tema", "Tema"),
];

/// The admin form editor
///
/// Input ids are the field ids understood by [`Field`](crate::Field), so a
/// form event can be turned straight into an [`Edit`](crate::Edit).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminRenderer;

impl Renderer for AdminRenderer {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn render(&self, document: &Document, env: &RenderEnv) -> String {
        page(document, env).into_string()
    }
}

fn page(doc: &Document, env: &RenderEnv) -> Markup {
    let theme = ThemeDecision::resolve(&doc.theme, env);
    html! {
        (DOCTYPE)
        html lang="es" class=[theme.dark.then_some("dark")] style=(theme.css_variables()) {
            head {
                meta charset="utf-8";
                title { "Panel Administrativo — " (doc.site.brand) }
            }
            body {
                aside id="sidebar" {
                    nav {
                        @for (id, label) in SECTIONS {
                            a class="sidebar-link" href=(format!("#{id}")) { (label) }
                        }
                    }
                }
                header {
                    button type="button" id="btn-theme" {
                        i id="i-theme" class=(theme.toggle_icon()) {}
                    }
                }
                div id="content" {
                    (dashboard(doc))
                    (hero_section(doc))
                    (services_section(doc))
                    (partners_section(doc))
                    (showroom_section(doc))
                    (projects_section(doc))
                    (contact_section(doc))
                    (links_section(doc))
                    (theme_section(doc))
                }
            }
        }
    }
}

fn section(id: &str, inner: Markup) -> Markup {
    let label = SECTIONS
        .iter()
        .find(|(section_id, _)| *section_id == id)
        .map_or("", |(_, label)| *label);
    html! {
        section id=(id) {
            h3 { (label) }
            (inner)
        }
    }
}

fn input(label: &str, field: Field, value: &str) -> Markup {
    let id = field.id();
    html! {
        label for=(id) { (label) }
        input id=(id) value=(value);
    }
}

fn textarea(label: &str, field: Field, value: &str) -> Markup {
    let id = field.id();
    html! {
        label for=(id) { (label) }
        textarea id=(id) rows="3" { (value) }
    }
}

fn cta_fieldset(legend: &str, slot: CtaSlot, cta: &CallToAction) -> Markup {
    html! {
        fieldset {
            legend { (legend) }
            (input("Etiqueta", Field::CtaLabel(slot), &cta.label))
            (input("Icono (clase FA)", Field::CtaIcon(slot), &cta.icon))
            (input("URL", Field::CtaLink(slot), &cta.link))
        }
    }
}

fn dashboard(doc: &Document) -> Markup {
    section(
        "s-dashboard",
        html! {
            dl {
                dt { "Marca" }
                dd id="dash-brand" { (doc.site.brand) }
                dt { "Servicios" }
                dd id="dash-services" { (doc.services.len()) }
                dt { "Proyectos" }
                dd id="dash-projects" { (doc.projects.len()) }
            }
            div {
                button type="button" id="btn-export" { "Exportar JSON" }
                label for="file-import" { "Importar JSON" }
                input type="file" id="file-import" accept="application/json";
                button type="button" id="btn-reset-all" { "Restablecer todo" }
            }
        },
    )
}

fn hero_section(doc: &Document) -> Markup {
    let hero = &doc.hero;
    section(
        "s-hero",
        html! {
            (input("Título del sitio", Field::SiteTitle, &doc.site.title))
            (input("Marca", Field::SiteBrand, &doc.site.brand))
            (input("Tagline", Field::SiteTagline, &doc.site.tagline))
            (input("Título (Hero)", Field::HeroTitle, &hero.title))
            (textarea("Subtítulo (Hero)", Field::HeroSubtitle, &hero.subtitle))
            (input("Imagen (URL)", Field::HeroImage, &hero.image))
            (cta_fieldset("CTA 1", CtaSlot::First, &hero.cta1))
            (cta_fieldset("CTA 2", CtaSlot::Second, &hero.cta2))
        },
    )
}

fn services_section(doc: &Document) -> Markup {
    section(
        "s-servicios",
        html! {
            @for (i, service) in doc.services.iter().enumerate() {
                fieldset class="service" {
                    legend { "Servicio " (i + 1) }
                    (input("Icono (clase FA)", Field::ServiceIcon(i), &service.icon))
                    (input("Título", Field::ServiceTitle(i), &service.title))
                    (textarea("Descripción", Field::ServiceDesc(i), &service.desc))
                    @let points = service.points.join("\n");
                    (textarea("Puntos (uno por línea)", Field::ServicePoints(i), &points))
                    button type="button" data-del-srv=(i) { "Eliminar" }
                }
            }
            button type="button" id="btn-add-srv" { "Agregar servicio" }
        },
    )
}

fn partners_section(doc: &Document) -> Markup {
    section(
        "s-marcas",
        html! {
            @for (i, src) in doc.partners.iter().enumerate() {
                div class="partner" {
                    img src=(src) alt="Logo";
                    (input("Logo (URL)", Field::Partner(i), src))
                    button type="button" data-del-logo=(i) { "Eliminar" }
                }
            }
            button type="button" id="btn-add-logo" { "Agregar logo" }
        },
    )
}

fn showroom_section(doc: &Document) -> Markup {
    section(
        "s-showroom",
        html! {
            (input("URL de reserva", Field::ShowroomUrl, &doc.showroom.url))
            (input("Imagen (URL)", Field::ShowroomImage, &doc.showroom.image))
            (textarea("Descripción", Field::ShowroomBlurb, &doc.showroom.blurb))
        },
    )
}

fn projects_section(doc: &Document) -> Markup {
    section(
        "s-proyectos",
        html! {
            @for (i, project) in doc.projects.iter().enumerate() {
                fieldset class="project" {
                    legend { "Proyecto " (i + 1) }
                    (input("Título", Field::ProjectTitle(i), &project.title))
                    (textarea("Descripción", Field::ProjectDesc(i), &project.desc))
                    (input("Imagen (URL)", Field::ProjectImage(i), &project.image))
                    button type="button" data-del-prj=(i) { "Eliminar" }
                }
            }
            button type="button" id="btn-add-prj" { "Agregar proyecto" }
        },
    )
}

fn contact_section(doc: &Document) -> Markup {
    let contact = &doc.contact;
    section(
        "s-contacto",
        html! {
            (input("Teléfono mostrado", Field::ContactPhone, &contact.phone_formatted))
            (input("Email mostrado", Field::ContactEmail, &contact.email))
            (input("WhatsApp (solo números)", Field::ContactWhatsapp, &contact.whatsapp))
            (textarea("Mensaje WhatsApp", Field::ContactWhatsMsg, &contact.whats_msg))
        },
    )
}

fn links_section(doc: &Document) -> Markup {
    let links = &doc.links;
    section(
        "s-links",
        html! {
            (input("Showroom URL", Field::Link(LinkKind::Showroom), &links.showroom))
            (input("Facebook", Field::Link(LinkKind::Facebook), &links.facebook))
            (input("Instagram", Field::Link(LinkKind::Instagram), &links.instagram))
            (input("LinkedIn", Field::Link(LinkKind::LinkedIn), &links.linkedin))
            (input("YouTube", Field::Link(LinkKind::YouTube), &links.youtube))
        },
    )
}

fn theme_section(doc: &Document) -> Markup {
    const MODES: [(ThemeMode, &str); 3] = [
        (ThemeMode::Light, "Claro"),
        (ThemeMode::Dark, "Oscuro"),
        (ThemeMode::System, "Sistema"),
    ];
    section(
        "s-tema",
        html! {
            div {
                @for (mode, label) in MODES {
                    @let pressed = (doc.theme.mode == mode).to_string();
                    button type="button" data-mode=(mode.as_str()) aria-pressed=(pressed) {
                        (label)
                    }
                }
            }
            (input("Color primario (hex)", Field::ThemePrimary, &doc.theme.primary))
            (input("Color acento (hex)", Field::ThemeAccent, &doc.theme.accent))
            button type="button" id="btn-reset-theme" { "Restablecer tema" }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &Document) -> String {
        AdminRenderer.render(doc, &RenderEnv::default())
    }

    #[test]
    fn title_and_dashboard_reflect_document() {
        let mut doc = Document::defaults();
        doc.site.brand = "Acme".to_string();
        doc.projects.pop();

        let html = render(&doc);
        assert!(html.contains("<title>Panel Administrativo — Acme</title>"));
        assert!(html.contains(r#"<dd id="dash-services">3</dd>"#));
        assert!(html.contains(r#"<dd id="dash-projects">2</dd>"#));
    }

    #[test]
    fn one_form_per_collection_entry() {
        let doc = Document::defaults();
        let html = render(&doc);

        assert!(html.contains(r#"id="i-srv-title-2" value="Domótica &amp; Seguridad""#));
        assert!(!html.contains("i-srv-title-3"));
        assert_eq!(html.matches("data-del-srv=").count(), doc.services.len());
        assert_eq!(html.matches("data-del-logo=").count(), doc.partners.len());
        assert_eq!(html.matches("data-del-prj=").count(), doc.projects.len());
        assert!(html.contains(r#"data-del-srv="1""#));
    }

    #[test]
    fn points_are_one_per_line() {
        let html = render(&Document::defaults());
        assert!(html.contains(concat!(
            r#"<textarea id="i-srv-pts-0" rows="3">"#,
            "Site survey\nSwitching &amp; routing\nWiFi empresarial</textarea>"
        )));
    }

    #[test]
    fn every_section_is_present() {
        let html = render(&Document::defaults());
        for (id, _) in SECTIONS {
            assert!(html.contains(&format!(r#"<section id="{id}">"#)), "missing {id}");
        }
    }

    #[test]
    fn every_input_id_is_a_field_id() {
        let html = render(&Document::defaults());
        let ids: Vec<&str> = html
            .split(" id=\"i-")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .filter(|id| *id != "theme")
            .collect();

        assert!(ids.len() > 30, "found only {} inputs", ids.len());
        for id in ids {
            let id = format!("i-{id}");
            let field: Field = id.parse().unwrap();
            assert_eq!(field.id(), id);
        }
    }

    #[test]
    fn active_theme_mode_is_pressed() {
        let html = render(&Document::defaults());
        assert!(html.contains(r#"data-mode="system" aria-pressed="true""#));
        assert!(html.contains(r#"data-mode="dark" aria-pressed="false""#));
    }
}
