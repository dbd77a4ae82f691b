use crate::host::ContextState;

/// Écart relatif à une durée de frame absorbé par l'accumulateur.
pub const FRAME_TOLERANCE: f64 = 1e-9;

/// Résultat d'un appel à [`TemporalController::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// Le temps a été avancé (éventuellement de zéro). Contient le temps courant.
    Advanced(f64),
    /// Contexte de rendu indisponible : rien n'a bougé, la frame doit être sautée.
    Skipped,
}

/// Horloge de simulation du pipeline.
///
/// Deux modes, choisis par `target_fps` :
/// - non quantifié (`target_fps <= 0`) : `time += delta` à chaque appel ;
/// - quantifié (`target_fps > 0`) : le delta réel s'accumule, et chaque fois
///   que l'accumulateur atteint une durée de frame, le temps avance d'exactement
///   une durée de frame. Le résidu est reporté, jamais remis à zéro.
///
/// Le temps quantifié est tenu en nombre entier de frames depuis la dernière
/// base ; l'accumulateur reste en secondes. Un accumulateur à
/// [`FRAME_TOLERANCE`] près d'une durée de frame compte comme une frame
/// pleine, pour que des deltas totalisant exactement N frames en produisent N.
///
/// # Example
/// ```
/// use ac_core::clock::{Advance, TemporalController};
/// use ac_core::host::ContextState;
///
/// let mut clock = TemporalController::new(4.0);
/// clock.advance(0.125, ContextState::Ready);
/// assert_eq!(clock.time(), 0.0);
/// clock.advance(0.125, ContextState::Ready);
/// assert_eq!(clock.time(), 0.25);
/// assert_eq!(clock.advance(1.0, ContextState::Lost), Advance::Skipped);
/// assert_eq!(clock.time(), 0.25);
/// ```
#[derive(Clone, Debug)]
pub struct TemporalController {
    /// FPS cible. `<= 0` = non quantifié.
    target_fps: f64,
    /// Temps au moment du dernier changement de mode.
    base_time: f64,
    /// Frames entières écoulées depuis `base_time` (mode quantifié).
    frames: u64,
    /// Résidu en secondes, dans [0, 1/target_fps) (mode quantifié).
    pending: f64,
    /// Temps libre accumulé depuis `base_time` (mode non quantifié).
    free_time: f64,
}

impl TemporalController {
    /// Crée une horloge à t = 0.
    #[must_use]
    pub fn new(target_fps: f32) -> Self {
        Self {
            target_fps: sanitize_fps(target_fps),
            base_time: 0.0,
            frames: 0,
            pending: 0.0,
            free_time: 0.0,
        }
    }

    /// `true` si le temps avance par pas discrets.
    #[inline]
    #[must_use]
    pub fn is_quantized(&self) -> bool {
        self.target_fps > 0.0
    }

    /// Durée d'une frame quantifiée, en secondes (`None` si non quantifié).
    #[inline]
    #[must_use]
    pub fn frame_duration(&self) -> Option<f64> {
        self.is_quantized().then(|| 1.0 / self.target_fps)
    }

    /// Temps de simulation courant, en secondes.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f64 {
        if self.is_quantized() {
            self.base_time + self.frames as f64 / self.target_fps
        } else {
            self.base_time + self.free_time
        }
    }

    /// Résidu de l'accumulateur en secondes, dans [0, 1/target_fps).
    /// Toujours 0 en mode non quantifié.
    #[inline]
    #[must_use]
    pub fn residual(&self) -> f64 {
        if self.is_quantized() {
            self.pending
        } else {
            0.0
        }
    }

    /// Avance l'horloge de `delta` secondes réelles.
    ///
    /// Un delta négatif ou non fini compte pour 0. Si le contexte est perdu,
    /// aucun état n'est modifié.
    pub fn advance(&mut self, delta: f64, context: ContextState) -> Advance {
        if context == ContextState::Lost {
            return Advance::Skipped;
        }
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        if let Some(frame) = self.frame_duration() {
            self.pending += delta;
            let threshold = frame * (1.0 - FRAME_TOLERANCE);
            if self.pending >= threshold {
                let whole = (self.pending / frame).floor();
                self.frames += whole as u64;
                self.pending -= whole * frame;
                // La division peut tomber juste sous une frame pleine.
                if self.pending >= threshold {
                    self.frames += 1;
                    self.pending -= frame;
                }
                self.pending = self.pending.max(0.0);
            }
        } else {
            self.free_time += delta;
        }
        Advance::Advanced(self.time())
    }

    /// Change le FPS cible entre deux frames sans déplacer le temps.
    ///
    /// Le résidu est reporté, borné sous la nouvelle durée de frame.
    pub fn set_target_fps(&mut self, target_fps: f32) {
        let fps = sanitize_fps(target_fps);
        if fps == self.target_fps {
            return;
        }
        let residual_secs = self.residual();
        self.base_time = self.time();
        self.frames = 0;
        self.free_time = 0.0;
        self.target_fps = fps;
        self.pending = 0.0;
        if let Some(frame) = self.frame_duration() {
            // Reste sous le seuil : changer de mode n'émet pas de frame.
            self.pending = residual_secs.min(frame * (1.0 - 2.0 * FRAME_TOLERANCE));
        }
    }

    /// Redémarre à t = 0.
    pub fn reset(&mut self) {
        self.base_time = 0.0;
        self.frames = 0;
        self.pending = 0.0;
        self.free_time = 0.0;
    }
}

impl Default for TemporalController {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn sanitize_fps(fps: f32) -> f64 {
    if fps.is_finite() && fps > 0.0 {
        f64::from(fps)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: ContextState = ContextState::Ready;

    #[test]
    fn uncapped_accumulates_raw_delta() {
        let mut clock = TemporalController::new(0.0);
        clock.advance(0.1, READY);
        clock.advance(0.25, READY);
        assert!((clock.time() - 0.35).abs() < 1e-12);
        assert_eq!(clock.residual(), 0.0);
        assert!(clock.frame_duration().is_none());
    }

    /// Générateur splitmix64, pour des découpages reproductibles.
    struct SplitMix(u64);

    impl SplitMix {
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = self.0;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        }

        fn unit(&mut self) -> f64 {
            (self.next() >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    /// Découpe 1.0 s en `n` deltas dont la somme vaut exactement 1.0.
    fn split_one_second(rng: &mut SplitMix, n: usize) -> Vec<f64> {
        let mut deltas = Vec::with_capacity(n);
        let mut sum = 0.0;
        for _ in 1..n {
            let d = rng.unit() * (1.0 - sum) * 0.5;
            deltas.push(d);
            sum += d;
        }
        deltas.push(1.0 - sum);
        deltas
    }

    #[test]
    fn quantized_steps_sum_to_whole_frames() {
        let mut rng = SplitMix(0x5EED);
        for fps in [30.0_f32, 24.0, 60.0, 25.0, 12.0] {
            let step = 1.0 / f64::from(fps);
            for _ in 0..2_000 {
                let n = 2 + (rng.next() % 14) as usize;
                let deltas = split_one_second(&mut rng, n);
                assert_eq!(deltas.iter().sum::<f64>(), 1.0);

                let mut clock = TemporalController::new(fps);
                let mut prev = clock.time();
                for &d in &deltas {
                    clock.advance(d, READY);
                    let t = clock.time();
                    let steps = (t - prev) / step;
                    assert!((steps - steps.round()).abs() < 1e-9, "pas non entier : {steps}");
                    assert!(clock.residual() >= 0.0 && clock.residual() < step);
                    prev = t;
                }
                let expected = (1.0 * f64::from(fps)).floor() * step;
                assert!(
                    (clock.time() - expected).abs() < 1e-9,
                    "fps {fps}, deltas {deltas:?} : t = {}",
                    clock.time()
                );
            }
        }
    }

    #[test]
    fn split_just_below_a_frame_still_emits_it() {
        let mut clock = TemporalController::new(30.0);
        clock.advance(0.939_149_162_778_510_6, READY);
        clock.advance(0.060_850_837_221_489_43, READY);
        assert!((clock.time() - 1.0).abs() < 1e-12);
        assert!(clock.residual() < 1e-9);
    }

    #[test]
    fn quantized_residual_carries_forward() {
        let mut clock = TemporalController::new(32.0);
        // 64 appels à 1/128 s : 16 frames, sans dérive.
        for _ in 0..64 {
            clock.advance(1.0 / 128.0, READY);
            assert!(clock.residual() < 1.0 / 32.0);
        }
        assert!((clock.time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn large_delta_advances_several_frames() {
        let mut clock = TemporalController::new(10.0);
        clock.advance(0.35, READY);
        assert!((clock.time() - 0.3).abs() < 1e-12);
        assert!((clock.residual() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn zero_and_invalid_deltas_are_harmless() {
        let mut clock = TemporalController::new(24.0);
        clock.advance(0.5, READY);
        let t = clock.time();
        let r = clock.residual();
        for d in [0.0, -1.0, f64::NAN, f64::NEG_INFINITY] {
            assert_eq!(clock.advance(d, READY), Advance::Advanced(t));
        }
        assert_eq!(clock.residual(), r);
    }

    #[test]
    fn lost_context_does_not_mutate() {
        let mut clock = TemporalController::new(30.0);
        clock.advance(0.02, READY);
        let before = (clock.time(), clock.residual());
        assert_eq!(clock.advance(10.0, ContextState::Lost), Advance::Skipped);
        assert_eq!((clock.time(), clock.residual()), before);
    }

    #[test]
    fn time_is_monotonic_across_mode_changes() {
        let mut clock = TemporalController::new(0.0);
        clock.advance(0.4, READY);
        let t0 = clock.time();
        clock.set_target_fps(12.0);
        assert_eq!(clock.time(), t0);
        clock.advance(0.1, READY);
        assert!(clock.time() >= t0);
        clock.set_target_fps(0.0);
        let t1 = clock.time();
        clock.advance(0.01, READY);
        assert!(clock.time() > t1);
        clock.reset();
        assert_eq!(clock.time(), 0.0);
    }
}
