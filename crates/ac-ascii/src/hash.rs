//! Hachage pseudo-aléatoire et bruit de valeur, purs et sans état.
//!
//! Les mêmes entrées donnent toujours la même sortie : le jitter et le glitch
//! sont des fonctions de `(cellule, tick)`, jamais d'un générateur à état.

use glam::Vec2;

/// Hash scalaire d'un point 2D dans [0, 1).
///
/// # Example
/// ```
/// use ac_ascii::hash::random;
/// use glam::Vec2;
/// let a = random(Vec2::new(3.0, 7.0));
/// assert_eq!(a, random(Vec2::new(3.0, 7.0)));
/// assert!((0.0..1.0).contains(&a));
/// ```
#[inline(always)]
#[must_use]
pub fn random(st: Vec2) -> f32 {
    fract((st.dot(Vec2::new(12.9898, 78.233))).sin() * 43_758.547)
}

/// Bruit de valeur lissé (interpolation hermite entre 4 hash de coins).
///
/// # Example
/// ```
/// use ac_ascii::hash::{noise, random};
/// use glam::Vec2;
/// // Aux points entiers, le bruit vaut le hash du coin.
/// let p = Vec2::new(2.0, 5.0);
/// assert!((noise(p) - random(p)).abs() < 1e-6);
/// ```
#[must_use]
pub fn noise(st: Vec2) -> f32 {
    let i = st.floor();
    let f = st - i;
    let a = random(i);
    let b = random(i + Vec2::new(1.0, 0.0));
    let c = random(i + Vec2::new(0.0, 1.0));
    let d = random(i + Vec2::new(1.0, 1.0));
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    lerp(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Partie fractionnaire au sens GLSL (`x - floor(x)`), toujours dans [0, 1).
#[inline(always)]
#[must_use]
pub fn fract(x: f32) -> f32 {
    let f = x - x.floor();
    // x - floor(x) peut arrondir à 1.0 pour de petits x négatifs.
    if f >= 1.0 { 0.0 } else { f }
}

/// Interpolation linéaire scalaire.
#[inline(always)]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothstep hermite, bornes `edge0 < edge1`.
///
/// # Example
/// ```
/// use ac_ascii::hash::smoothstep;
/// assert_eq!(smoothstep(0.2, 0.4, 0.1), 0.0);
/// assert_eq!(smoothstep(0.2, 0.4, 0.5), 1.0);
/// assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
/// ```
#[inline(always)]
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_in_unit_interval() {
        for y in -20..20 {
            for x in -20..20 {
                let v = random(Vec2::new(x as f32 * 1.37, y as f32 * 11.0));
                assert!((0.0..1.0).contains(&v), "{v} hors [0, 1)");
            }
        }
    }

    #[test]
    fn random_varies_between_neighbours() {
        let a = random(Vec2::new(10.0, 0.0));
        let b = random(Vec2::new(11.0, 0.0));
        let c = random(Vec2::new(10.0, 1000.0));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn noise_is_continuous() {
        let p = Vec2::new(4.3, 8.9);
        let q = p + Vec2::splat(1e-3);
        assert!((noise(p) - noise(q)).abs() < 0.05);
        let v = noise(p);
        assert!((-0.5..1.5).contains(&v));
    }

    #[test]
    fn fract_handles_negatives() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
        assert_eq!(fract(3.0), 0.0);
        assert!(fract(-1e-9) < 1.0);
    }
}
