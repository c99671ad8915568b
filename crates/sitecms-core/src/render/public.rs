use maud::{DOCTYPE, Markup, html};

use super::{RenderEnv, Renderer, ThemeDecision, non_empty_or, whatsapp_url};
use crate::document::{CallToAction, Document, Hero, Links, Project, Service};

const DEFAULT_CTA1_ICON: &str = "fa-solid fa-bolt";
const DEFAULT_CTA2_ICON: &str = "fa-brands fa-whatsapp";
const EMPTY_LINK: &str = "#";

/// The public marketing site
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicRenderer;

impl Renderer for PublicRenderer {
    fn name(&self) -> &'static str {
        "public"
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
                meta name="viewport" content="width=device-width, initial-scale=1";
                title id="site-title" { (doc.site.title) }
            }
            body {
                header id="header" {
                    a href="#inicio" id="brand" { (doc.site.brand) }
                    p id="tagline" { (doc.site.tagline) }
                    button type="button" id="theme-toggle" aria-label="Cambiar tema" {
                        i id="theme-icon" class=(theme.toggle_icon()) {}
                    }
                }
                main {
                    (hero(&doc.hero))
                    section id="servicios" {
                        div id="services-grid" {
                            @for service in &doc.services {
                                (service_card(service))
                            }
                        }
                    }
                    section id="marcas" {
                        div id="partners-row" {
                            @for src in &doc.partners {
                                div class="partner" {
                                    img src=(src) alt="Marca";
                                }
                            }
                        }
                    }
                    section id="showroom" {
                        a id="link-showroom" href=(non_empty_or(&doc.showroom.url, EMPTY_LINK)) {
                            img id="showroom-image" src=(doc.showroom.image) alt="Showroom";
                        }
                        p id="showroom-blurb" { (doc.showroom.blurb) }
                    }
                    section id="proyectos" {
                        div id="projects-grid" {
                            @for project in &doc.projects {
                                (project_figure(project))
                            }
                        }
                    }
                    section id="contacto" {
                        p id="contact-phone" { (doc.contact.phone_formatted) }
                        p id="contact-email" { (doc.contact.email) }
                    }
                }
                footer id="footer" {
                    span id="brand-foot" { (doc.site.brand) }
                    nav {
                        @for (id, href, label) in footer_links(&doc.links) {
                            a id=(id) href=(non_empty_or(href, EMPTY_LINK)) { (label) }
                        }
                    }
                }
                a id="wa-fab" href=(whatsapp_url(&doc.contact)) aria-label="WhatsApp" {
                    i class="fa-brands fa-whatsapp" {}
                }
            }
        }
    }
}

fn hero(hero: &Hero) -> Markup {
    html! {
        section id="inicio" {
            h1 id="hero-title" { (hero.title) }
            p id="hero-subtitle" { (hero.subtitle) }
            img id="hero-image" src=(hero.image) alt="";
            (cta("cta-1", &hero.cta1, DEFAULT_CTA1_ICON))
            (cta("cta-2", &hero.cta2, DEFAULT_CTA2_ICON))
        }
    }
}

fn cta(id: &str, cta: &CallToAction, default_icon: &str) -> Markup {
    html! {
        a id=(id) href=(non_empty_or(&cta.link, EMPTY_LINK)) {
            i id=(format!("{id}-icon")) class=(non_empty_or(&cta.icon, default_icon)) {}
            span id=(format!("{id}-label")) { (cta.label) }
        }
    }
}

fn service_card(service: &Service) -> Markup {
    html! {
        div class="service" {
            i class=(service.icon) {}
            h3 { (service.title) }
            p { (service.desc) }
            ul {
                @for point in &service.points {
                    li { (point) }
                }
            }
        }
    }
}

fn project_figure(project: &Project) -> Markup {
    html! {
        figure class="project" {
            img src=(project.image) alt=(project.title);
            figcaption {
                h3 { (project.title) }
                p { (project.desc) }
            }
        }
    }
}

/// Footer anchors as (id, href, label)
fn footer_links(links: &Links) -> [(&'static str, &str, &'static str); 5] {
    [
        ("link-showroom-footer", links.showroom.as_str(), "Showroom"),
        ("link-facebook", links.facebook.as_str(), "Facebook"),
        ("link-instagram", links.instagram.as_str(), "Instagram"),
        ("link-linkedin", links.linkedin.as_str(), "LinkedIn"),
        ("link-youtube", links.youtube.as_str(), "YouTube"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ThemeMode;

    fn render(doc: &Document, prefers_dark: bool) -> String {
        PublicRenderer.render(doc, &RenderEnv::new(prefers_dark))
    }

    #[test]
    fn renders_site_text_and_deep_link() {
        let html = render(&Document::defaults(), false);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r##"<a href="#inicio" id="brand">AC Technology</a>"##));
        assert!(html.contains(r#"<span id="brand-foot">AC Technology</span>"#));
        assert!(html.contains(r#"id="wa-fab" href="https://wa.me/51999999999?text=Hola%2C%20"#));
        assert!(html.contains("--color-primary: #2a9dff;"));
    }

    #[test]
    fn renders_every_collection_entry() {
        let doc = Document::defaults();
        let html = render(&doc, false);

        assert_eq!(html.matches(r#"<div class="service">"#).count(), doc.services.len());
        assert_eq!(html.matches(r#"alt="Marca""#).count(), doc.partners.len());
        assert_eq!(html.matches(r#"<figure class="project">"#).count(), doc.projects.len());
        assert!(html.contains("<li>Switching &amp; routing</li>"));
    }

    #[test]
    fn is_deterministic() {
        let doc = Document::defaults();
        assert_eq!(render(&doc, true), render(&doc, true));
    }

    #[test]
    fn dark_class_follows_theme_decision() {
        let mut doc = Document::defaults();

        assert!(!render(&doc, false).contains(r#"class="dark""#));
        assert!(render(&doc, true).contains(r#"<html lang="es" class="dark""#));

        doc.theme.mode = ThemeMode::Light;
        let html = render(&doc, true);
        assert!(!html.contains(r#"class="dark""#));
        assert!(html.contains(r#"id="theme-icon" class="fa-solid fa-moon""#));

        doc.theme.mode = ThemeMode::Dark;
        assert!(render(&doc, false).contains(r#"id="theme-icon" class="fa-solid fa-sun""#));
    }

    #[test]
    fn empty_links_and_icons_fall_back() {
        let mut doc = Document::defaults();
        doc.hero.cta1.link.clear();
        doc.hero.cta1.icon.clear();
        doc.links.youtube.clear();

        let html = render(&doc, false);
        assert!(html.contains(
            r##"<a id="cta-1" href="#"><i id="cta-1-icon" class="fa-solid fa-bolt"></i>"##
        ));
        assert!(html.contains(r##"<a id="link-youtube" href="#">"##));
    }

    #[test]
    fn text_is_escaped() {
        let mut doc = Document::defaults();
        doc.site.brand = "<script>alert(1)</script>".to_string();

        let html = render(&doc, false);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
