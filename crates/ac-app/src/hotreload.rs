use std::path::Path;
use std::sync::Arc;

use ac_core::config::EffectParams;
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;

/// Surveille le fichier de config et publie chaque version valide dans l'ArcSwap.
///
/// Le rendu charge les paramètres une fois par frame : une nouvelle version
/// n'est visible qu'à la frame suivante. Une config invalide est ignorée.
///
/// Retourne le Watcher (doit rester vivant tant que le rendu tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    params: &Arc<ArcSwap<EffectParams>>,
    overrides: Overrides,
) -> Result<impl Watcher + use<>> {
    let params = Arc::clone(params);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else {
            return;
        };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        match ac_core::config::load_config(&path) {
            Ok(mut next) => {
                overrides.apply(&mut next);
                if **params.load() != next {
                    params.store(Arc::new(next));
                    log::info!("Config rechargée depuis {}", path.display());
                }
            }
            Err(e) => {
                // On garde la config précédente.
                log::warn!("Erreur de rechargement config : {e:#}");
            }
        }
    })
    .context("Impossible de créer le watcher de config")?;

    watcher
        .watch(config_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("Impossible de surveiller {}", config_path.display()))?;
    log::info!("Hot reload actif sur {}", config_path.display());
    Ok(watcher)
}
