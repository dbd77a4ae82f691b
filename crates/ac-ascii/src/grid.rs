use ac_core::config::EffectParams;
use glam::Vec2;

use crate::hash::random;

/// Amplitude maximale du décalage de glitch, en cellules (±).
pub const GLITCH_SHIFT_CELLS: f32 = 10.0;

/// Décalage de seed entre les hash X et Y du jitter.
const JITTER_Y_SEED: f32 = 1000.0;

/// Grille de cellules superposée à l'image de sortie.
///
/// `cell_count = floor(resolution / cell_size)`, au moins 1 par axe : une
/// géométrie dégénérée ne provoque jamais de division par zéro.
///
/// # Example
/// ```
/// use ac_ascii::grid::CellGrid;
/// use glam::Vec2;
/// let grid = CellGrid::new(Vec2::new(1920.0, 1080.0), 9.0);
/// assert_eq!(grid.dimensions(), (213, 120));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGrid {
    cell_count: Vec2,
}

impl CellGrid {
    /// Construit la grille pour une résolution et une taille de cellule.
    #[must_use]
    pub fn new(resolution: Vec2, cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size >= 1.0 {
            cell_size
        } else {
            1.0
        };
        let res = Vec2::new(sanitize_extent(resolution.x), sanitize_extent(resolution.y));
        Self {
            cell_count: (res / cell_size).floor().max(Vec2::ONE),
        }
    }

    /// Nombre de cellules par axe, en flottant.
    #[inline(always)]
    #[must_use]
    pub fn cell_count(&self) -> Vec2 {
        self.cell_count
    }

    /// Nombre de cellules par axe.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cell_count.x as u32, self.cell_count.y as u32)
    }

    /// Cellule contenant `uv` (non perturbée).
    #[inline(always)]
    #[must_use]
    pub fn cell_of(&self, uv: Vec2) -> Vec2 {
        (uv * self.cell_count).floor()
    }

    /// Position locale de `uv` dans sa cellule non perturbée, dans [0, 1)².
    #[inline(always)]
    #[must_use]
    pub fn local_uv(&self, uv: Vec2) -> Vec2 {
        let p = uv * self.cell_count;
        p - p.floor()
    }

    /// Centre de la cellule `cell`, en UV, pour ré-échantillonner l'image.
    #[inline(always)]
    #[must_use]
    pub fn cell_center_uv(&self, cell: Vec2) -> Vec2 {
        (cell + 0.5) / self.cell_count
    }

    /// Applique jitter puis glitch à une coordonnée de cellule.
    ///
    /// Fonction pure de `(cell, time, params)` : aucun état caché.
    #[inline]
    #[must_use]
    pub fn perturb(&self, cell: Vec2, time: f32, params: &EffectParams) -> Vec2 {
        let cell = jitter(cell, time, params.jitter_intensity, params.jitter_speed);
        glitch(cell, time, params.glitch_intensity, params.glitch_frequency)
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Décalage pseudo-aléatoire par cellule et par tick de `floor(time * speed)`.
///
/// X dépend de la ligne, Y de la colonne, avec des seeds distinctes pour
/// éviter une corrélation diagonale.
///
/// # Example
/// ```
/// use ac_ascii::grid::jitter;
/// use glam::Vec2;
/// let cell = Vec2::new(12.0, 4.0);
/// assert_eq!(jitter(cell, 3.7, 0.0, 1.0), cell);
/// assert_eq!(jitter(cell, 3.7, 0.5, 1.0), jitter(cell, 3.2, 0.5, 1.0));
/// ```
#[inline]
#[must_use]
pub fn jitter(cell: Vec2, time: f32, intensity: f32, speed: f32) -> Vec2 {
    if intensity <= 0.0 {
        return cell;
    }
    let jitter_time = time * speed;
    let jx = (random(Vec2::new(cell.y, jitter_time.floor())) - 0.5) * intensity * 2.0;
    let jy = (random(Vec2::new(cell.x, (jitter_time + JITTER_Y_SEED).floor())) - 0.5)
        * intensity
        * 2.0;
    cell + Vec2::new(jx, jy)
}

/// Déchirure horizontale : par tick de `floor(time * frequency)`, chaque ligne
/// est décalée de ±10 cellules avec probabilité `intensity`. Toutes les
/// cellules d'une même ligne et d'un même tick bougent ensemble.
///
/// # Example
/// ```
/// use ac_ascii::grid::glitch;
/// use glam::Vec2;
/// let cell = Vec2::new(5.0, 9.0);
/// assert_eq!(glitch(cell, 1.0, 0.0, 4.0), cell);
/// assert_eq!(glitch(cell, 1.0, 1.0, 0.0), cell);
/// ```
#[inline]
#[must_use]
pub fn glitch(cell: Vec2, time: f32, intensity: f32, frequency: f32) -> Vec2 {
    if intensity <= 0.0 || frequency <= 0.0 {
        return cell;
    }
    let tick = (time * frequency).floor();
    if random(Vec2::new(tick, cell.y)) < intensity {
        let shift = (random(Vec2::new(tick + 1.0, cell.y)) - 0.5) * GLITCH_SHIFT_CELLS * 2.0;
        Vec2::new(cell.x + shift, cell.y)
    } else {
        cell
    }
}
