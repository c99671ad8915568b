//! Embedding example for sitecms-core
//!
//! An admin view and a public view share one in-memory store. The public
//! view listens in the background; every admin edit is persisted, announced,
//! and picked up there.

use std::sync::Arc;
use std::time::Duration;

use sitecms_core::{
    AdminRenderer, ConfigStore, Edit, Field, MemoryStorage, PublicRenderer, RenderEnv, Result,
    ThemeMode, View, ViewEvent,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let store = ConfigStore::new(Arc::new(MemoryStorage::new()));

    let (mut admin, _admin_events) = View::new(store.clone(), AdminRenderer, RenderEnv::default());
    admin.load().await;

    let (mut public, mut public_events) =
        View::new(store.clone(), PublicRenderer, RenderEnv::new(true));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let public_task = tokio::spawn(async move {
        let result = public.run_with_shutdown(Some(shutdown_rx)).await;
        result.map(|_| public)
    });

    let edits = [
        Edit::set(Field::SiteBrand, "Nova Integraciones"),
        Edit::set(Field::ContactWhatsapp, "+51 987 654 321"),
        Edit::AddService,
        Edit::set(Field::ServiceTitle(3), "Energía solar"),
        Edit::SetThemeMode(ThemeMode::Light),
    ];
    for edit in &edits {
        admin.apply(edit).await?;
        info!("Admin applied {:?}", edit);
    }

    // wait until the public view has caught up with every edit
    let mut reloads = 0;
    while reloads < edits.len() {
        match tokio::time::timeout(Duration::from_secs(1), public_events.recv()).await {
            Ok(Some(ViewEvent::Reloaded { origin })) => {
                reloads += 1;
                info!("Public view reloaded ({:?})", origin);
            }
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => break,
        }
    }

    let _ = shutdown_tx.send(());
    let public = match public_task.await {
        Ok(result) => result?,
        Err(e) => return Err(sitecms_core::Error::Other(e.to_string())),
    };

    let document = public.document();
    info!(
        "Public view shows '{}' with {} services, whatsapp {}",
        document.site.brand,
        document.services.len(),
        document.contact.whatsapp
    );
    info!("Rendered {} bytes of HTML", public.output().len());
    Ok(())
}
