use ac_core::charset::Charset;
use ac_core::error::CoreError;
use ac_core::traits::GlyphRasterizer;
use glam::Vec2;

/// Largeur maximale de la bande d'atlas, en pixels.
pub const MAX_ATLAS_WIDTH: u32 = 16_384;

/// Atlas de glyphes : une bande horizontale de tuiles carrées de même taille,
/// une par caractère, dans l'ordre de densité du jeu de caractères.
///
/// Stocke un seul canal (le rouge de la texture d'origine) : l'intensité du
/// glyphe. Construit une fois par jeu de caractères, libéré au drop.
pub struct GlyphAtlas {
    tile_size: u32,
    tile_count: usize,
    /// Couverture [0..255], row-major, `width() * tile_size` octets.
    data: Vec<u8>,
}

impl GlyphAtlas {
    /// Rasterise `charset` en une bande de `charset.len()` tuiles.
    ///
    /// # Errors
    /// `CoreError::EmptyCharset` si le jeu est vide, `CoreError::AtlasSurface`
    /// si la bande ne peut pas être allouée (tuile nulle ou bande trop large).
    ///
    /// # Example
    /// ```
    /// use ac_ascii::atlas::GlyphAtlas;
    /// use ac_core::charset::Charset;
    /// use ac_core::traits::GlyphRasterizer;
    ///
    /// struct Solid;
    /// impl GlyphRasterizer for Solid {
    ///     fn rasterize(&self, _ch: char, _size: u32, out: &mut [u8]) { out.fill(255); }
    /// }
    ///
    /// let atlas = GlyphAtlas::build(&Charset::terminal(), 8, &Solid).unwrap();
    /// assert_eq!(atlas.tile_count(), 16);
    /// assert!(GlyphAtlas::build(&Charset::from_spec(""), 8, &Solid).is_err());
    /// ```
    pub fn build<R>(charset: &Charset, tile_size: u32, rasterizer: &R) -> Result<Self, CoreError>
    where
        R: GlyphRasterizer + ?Sized,
    {
        if charset.is_empty() {
            return Err(CoreError::EmptyCharset);
        }
        let count = charset.len();
        let surface_err = || CoreError::AtlasSurface {
            tiles: count,
            tile_size,
        };
        let width = u32::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(tile_size))
            .filter(|&w| tile_size > 0 && w <= MAX_ATLAS_WIDTH)
            .ok_or_else(surface_err)?;

        let tile_len = tile_size as usize * tile_size as usize;
        let mut scratch = vec![0u8; tile_len];
        let mut data = vec![0u8; width as usize * tile_size as usize];

        for (i, &ch) in charset.chars().iter().enumerate() {
            scratch.fill(0);
            rasterizer.rasterize(ch, tile_size, &mut scratch);
            let x0 = i * tile_size as usize;
            for (row, src) in scratch.chunks_exact(tile_size as usize).enumerate() {
                let start = row * width as usize + x0;
                data[start..start + tile_size as usize].copy_from_slice(src);
            }
        }

        log::debug!("Atlas construit : {count} tuiles de {tile_size}px ({width}x{tile_size})");
        Ok(Self {
            tile_size,
            tile_count: count,
            data,
        })
    }

    /// Nombre de tuiles (≥ 1).
    #[inline(always)]
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Côté d'une tuile en pixels.
    #[must_use]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Largeur totale de la bande.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.tile_size * self.tile_count as u32
    }

    /// Hauteur de la bande (= côté d'une tuile).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.tile_size
    }

    /// Tuile choisie pour une luminosité : `clamp(floor(b * N), 0, N - 1)`.
    /// Monotone croissante en `brightness`.
    ///
    /// # Example
    /// ```
    /// # use ac_ascii::atlas::GlyphAtlas;
    /// # use ac_core::charset::Charset;
    /// # use ac_core::traits::GlyphRasterizer;
    /// # struct Blank;
    /// # impl GlyphRasterizer for Blank { fn rasterize(&self, _: char, _: u32, _: &mut [u8]) {} }
    /// let atlas = GlyphAtlas::build(&Charset::from_spec(".:#@"), 4, &Blank).unwrap();
    /// assert_eq!(atlas.tile_index(0.0), 0);
    /// assert_eq!(atlas.tile_index(0.5), 2);
    /// assert_eq!(atlas.tile_index(1.0), 3);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn tile_index(&self, brightness: f32) -> usize {
        let n = self.tile_count as f32;
        (brightness * n).floor().clamp(0.0, n - 1.0) as usize
    }

    /// Intensité du glyphe `tile` à la position locale `local_uv` ∈ [0, 1]².
    /// Bilinéaire sur la bande entière, clamp-to-edge.
    #[inline]
    #[must_use]
    pub fn sample(&self, tile: usize, local_uv: Vec2) -> f32 {
        let tile = tile.min(self.tile_count - 1) as f32;
        let n = self.tile_count as f32;
        self.sample_strip(Vec2::new((tile + local_uv.x) / n, local_uv.y))
    }

    /// Échantillonne la bande en UV globales.
    fn sample_strip(&self, uv: Vec2) -> f32 {
        let (w, h) = (self.width(), self.height());
        let x = uv.x * w as f32 - 0.5;
        let y = uv.y * h as f32 - 0.5;
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let (x0f, y0f) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0f, y - y0f);
        let cx = |v: f32| v.clamp(0.0, (w - 1) as f32) as usize;
        let cy = |v: f32| v.clamp(0.0, (h - 1) as f32) as usize;
        let (x0, x1) = (cx(x0f), cx(x0f + 1.0));
        let (y0, y1) = (cy(y0f), cy(y0f + 1.0));

        let texel = |x: usize, y: usize| f32::from(self.data[y * w as usize + x]) / 255.0;
        let top = texel(x0, y0) + (texel(x1, y0) - texel(x0, y0)) * fx;
        let bottom = texel(x0, y1) + (texel(x1, y1) - texel(x0, y1)) * fx;
        top + (bottom - top) * fy
    }

    /// Couverture brute de la tuile `tile`, ligne par ligne.
    pub fn tile_rows(&self, tile: usize) -> impl Iterator<Item = &[u8]> + '_ {
        let ts = self.tile_size as usize;
        let x0 = tile.min(self.tile_count - 1) * ts;
        self.data
            .chunks_exact(self.width() as usize)
            .map(move |row| &row[x0..x0 + ts])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Remplit les `k` premières colonnes, `k` = position du caractère
    /// dans ".:#@" (densité croissante).
    struct Bars;

    impl GlyphRasterizer for Bars {
        fn rasterize(&self, ch: char, tile_size: u32, out: &mut [u8]) {
            let k = ".:#@".find(ch).unwrap_or(0) + 1;
            for row in out.chunks_exact_mut(tile_size as usize) {
                for px in row.iter_mut().take(k) {
                    *px = 255;
                }
            }
        }
    }

    #[test]
    fn builds_one_equal_tile_per_glyph() {
        let atlas = GlyphAtlas::build(&Charset::from_spec(".:#@"), 8, &Bars).unwrap();
        assert_eq!(atlas.tile_count(), 4);
        assert_eq!(atlas.width(), 32);
        assert_eq!(atlas.height(), 8);
        for t in 0..4 {
            let rows: Vec<&[u8]> = atlas.tile_rows(t).collect();
            assert_eq!(rows.len(), 8);
            assert!(rows.iter().all(|r| r.len() == 8));
            let lit = rows[0].iter().filter(|&&v| v == 255).count();
            assert_eq!(lit, t + 1);
        }
    }

    #[test]
    fn empty_charset_fails() {
        assert!(matches!(
            GlyphAtlas::build(&Charset::from_spec(""), 8, &Bars),
            Err(CoreError::EmptyCharset)
        ));
    }

    #[test]
    fn unallocatable_surface_fails() {
        assert!(matches!(
            GlyphAtlas::build(&Charset::terminal(), 0, &Bars),
            Err(CoreError::AtlasSurface { .. })
        ));
        assert!(matches!(
            GlyphAtlas::build(&Charset::terminal(), MAX_ATLAS_WIDTH, &Bars),
            Err(CoreError::AtlasSurface { .. })
        ));
    }

    #[test]
    fn tile_selection_is_monotonic() {
        let atlas = GlyphAtlas::build(&Charset::terminal(), 4, &Bars).unwrap();
        let mut prev = 0;
        for i in -10..=110 {
            let t = atlas.tile_index(i as f32 / 100.0);
            assert!(t >= prev, "régression de tuile à {i}");
            assert!(t < atlas.tile_count());
            prev = t;
        }
        assert_eq!(atlas.tile_index(f32::MAX), 15);
    }

    #[test]
    fn sample_reads_inside_the_requested_tile() {
        let atlas = GlyphAtlas::build(&Charset::from_spec(".:#@"), 8, &Bars).unwrap();
        // Tuile 0 : seule la 1re colonne est allumée.
        assert!(atlas.sample(0, Vec2::new(0.06, 0.5)) > 0.99);
        assert!(atlas.sample(0, Vec2::new(0.5, 0.5)) < 0.01);
        // Tuile 3 : 4 colonnes sur 8.
        assert!(atlas.sample(3, Vec2::new(0.3, 0.5)) > 0.99);
        assert!(atlas.sample(3, Vec2::new(0.8, 0.5)) < 0.01);
        // Index hors bornes : clampé sur la dernière tuile.
        assert_eq!(atlas.sample(99, Vec2::new(0.3, 0.5)), atlas.sample(3, Vec2::new(0.3, 0.5)));
    }
}
