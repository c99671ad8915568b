// Built-in content the site ships with, and the placeholder entries the
// admin editor appends.

use std::sync::LazyLock;

use super::{
    CallToAction, Contact, Document, Hero, Links, Project, Service, Showroom, Site, Theme,
    ThemeMode,
};

/// Logo appended by "add partner"
pub const PLACEHOLDER_PARTNER: &str =
    "https://upload.wikimedia.org/wikipedia/commons/4/44/Logitech_logo.svg";

const PLACEHOLDER_PROJECT_IMAGE: &str =
    "https://images.unsplash.com/photo-1542744173-05336fcc7ad4?q=80&w=1600&auto=format&fit=crop";

/// Immutable template; callers only ever receive clones.
pub(super) static DEFAULT_DOCUMENT: LazyLock<Document> = LazyLock::new(build_defaults);

/// Entry appended by "add service"
pub fn placeholder_service() -> Service {
    Service {
        icon: "fa-solid fa-circle".to_string(),
        title: "Nuevo servicio".to_string(),
        desc: "Descripción...".to_string(),
        points: strings(&["Punto 1", "Punto 2"]),
    }
}

/// Entry appended by "add project"
pub fn placeholder_project() -> Project {
    Project {
        title: "Nuevo proyecto".to_string(),
        desc: "Descripción...".to_string(),
        image: PLACEHOLDER_PROJECT_IMAGE.to_string(),
    }
}

pub(crate) fn default_theme() -> Theme {
    DEFAULT_DOCUMENT.theme.clone()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn cta(label: &str, link: &str, icon: &str) -> CallToAction {
    CallToAction {
        label: label.to_string(),
        link: link.to_string(),
        icon: icon.to_string(),
    }
}

fn service(icon: &str, title: &str, desc: &str, points: &[&str]) -> Service {
    Service {
        icon: icon.to_string(),
        title: title.to_string(),
        desc: desc.to_string(),
        points: strings(points),
    }
}

fn project(title: &str, desc: &str, image: &str) -> Project {
    Project {
        title: title.to_string(),
        desc: desc.to_string(),
        image: image.to_string(),
    }
}

fn build_defaults() -> Document {
    Document {
        theme: Theme {
            dark: false,
            mode: ThemeMode::System,
            primary: "#2a9dff".to_string(),
            accent: "#00c9b7".to_string(),
        },
        site: Site {
            title: "AC Technology — Soluciones Integrales".to_string(),
            brand: "AC Technology".to_string(),
            tagline: "Soluciones integrales: corporativo, educativo y residencial".to_string(),
        },
        hero: Hero {
            title: "Proyectos INTEGRALES en tecnología".to_string(),
            subtitle: "Integramos soluciones de audio, video, redes, domótica y seguridad para \
                       empresas, instituciones educativas y residencias."
                .to_string(),
            image: "https://images.unsplash.com/photo-1518779578993-ec3579fee39f?q=80&w=1600&auto=format&fit=crop"
                .to_string(),
            cta1: cta(
                "Conoce el demo virtual",
                "https://www.figma.com/",
                "fa-solid fa-bolt",
            ),
            cta2: cta("Escríbenos por WhatsApp", "#", "fa-brands fa-whatsapp"),
        },
        services: vec![
            service(
                "fa-solid fa-network-wired",
                "Redes & Cableado Estructurado",
                "Diseño e implementación de redes LAN/WiFi de alto rendimiento.",
                &["Site survey", "Switching & routing", "WiFi empresarial"],
            ),
            service(
                "fa-solid fa-video",
                "Audio/Video & Salas de Reunión",
                "Videoconferencia, pantallas LED, sonido profesional y control.",
                &["Zoom/Teams Rooms", "Señalética digital", "Matricería AV"],
            ),
            service(
                "fa-solid fa-house-signal",
                "Domótica & Seguridad",
                "CCTV, control de accesos, alarmas e integración IoT.",
                &["Cámaras IP", "Sensores & control", "Automatización"],
            ),
        ],
        partners: strings(&[
            PLACEHOLDER_PARTNER,
            "https://upload.wikimedia.org/wikipedia/commons/4/45/Dahua_Technology_logo.svg",
            "https://upload.wikimedia.org/wikipedia/commons/d/d3/Cisco_logo_blue_2016.svg",
            "https://upload.wikimedia.org/wikipedia/commons/1/14/Hikvision_logo.svg",
            "https://upload.wikimedia.org/wikipedia/commons/7/7f/Crestron_logo.svg",
            "https://upload.wikimedia.org/wikipedia/commons/6/6e/Yealink_logo.svg",
        ]),
        showroom: Showroom {
            url: "#".to_string(),
            image: "https://images.unsplash.com/photo-1556761175-4b46a572b786?q=80&w=1600&auto=format&fit=crop"
                .to_string(),
            blurb: "Equipado con lo último en tecnología. Agenda una demostración y recibe \
                    asesoría personalizada."
                .to_string(),
        },
        projects: vec![
            project(
                "Campus educativo — red WiFi y audiovisuales",
                "Cobertura total, aulas híbridas y señalética digital.",
                "https://images.unsplash.com/photo-1587620962725-abab7fe55159?q=80&w=1600&auto=format&fit=crop",
            ),
            project(
                "Oficinas corporativas — salas de reunión",
                "Videoconferencia certificada y control centralizado.",
                PLACEHOLDER_PROJECT_IMAGE,
            ),
            project(
                "Residencial premium — domótica y seguridad",
                "Automatización, CCTV y audio multiroom.",
                "https://images.unsplash.com/photo-1519710164239-da123dc03ef4?q=80&w=1600&auto=format&fit=crop",
            ),
        ],
        contact: Contact {
            phone_formatted: "(+51) 01 543 1138".to_string(),
            email: "informes@actechnology.com.pe".to_string(),
            whatsapp: "51999999999".to_string(),
            whats_msg: "Hola, me gustaría más información sobre sus soluciones integrales."
                .to_string(),
        },
        links: Links {
            showroom: "#".to_string(),
            facebook: "#".to_string(),
            instagram: "#".to_string(),
            linkedin: "#".to_string(),
            youtube: "#".to_string(),
        },
    }
}
