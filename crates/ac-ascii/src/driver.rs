use ac_core::clock::{Advance, TemporalController};
use ac_core::config::EffectParams;
use ac_core::host::{ContextState, InputMailbox};
use glam::Vec2;

use crate::pipeline::FrameContext;

/// Frontière de frame : instantané des entrées hôte, avance de l'horloge,
/// puis production du [`FrameContext`] immuable que voient tous les pixels.
///
/// # Example
/// ```
/// use ac_ascii::driver::FrameDriver;
/// use ac_core::config::EffectParams;
/// use ac_core::host::{ContextState, InputMailbox};
///
/// let mailbox = InputMailbox::default();
/// let mut driver = FrameDriver::new(mailbox.clone());
/// let params = EffectParams::default();
///
/// let ctx = driver.begin_frame(0.5, &params).unwrap();
/// assert_eq!(ctx.time, 0.5);
///
/// mailbox.set_context(ContextState::Lost);
/// assert!(driver.begin_frame(0.5, &params).is_none());
/// ```
pub struct FrameDriver {
    clock: TemporalController,
    mailbox: InputMailbox,
    skipped: u64,
}

impl FrameDriver {
    /// Pilote à t = 0, lisant les entrées publiées dans `mailbox`.
    #[must_use]
    pub fn new(mailbox: InputMailbox) -> Self {
        Self {
            clock: TemporalController::default(),
            mailbox,
            skipped: 0,
        }
    }

    /// Démarre une frame après `delta` secondes réelles.
    ///
    /// Retourne `None` si le contexte de rendu est perdu ou si la résolution
    /// dépasse [`MAX_OUTPUT_EXTENT`](ac_core::host::MAX_OUTPUT_EXTENT) : la
    /// frame est sautée et l'horloge reste intacte, FPS cible compris.
    pub fn begin_frame(&mut self, delta: f64, params: &EffectParams) -> Option<FrameContext> {
        let inputs = self.mailbox.snapshot();
        if let Err(e) = inputs.check_extent() {
            self.skipped += 1;
            log::warn!("Frame sautée : {e}");
            return None;
        }
        if inputs.context == ContextState::Ready {
            self.clock.set_target_fps(params.target_fps);
        }
        match self.clock.advance(delta, inputs.context) {
            Advance::Skipped => {
                self.skipped += 1;
                log::debug!("Frame sautée (contexte perdu), total {}", self.skipped);
                None
            }
            Advance::Advanced(time) => {
                let (w, h) = inputs.resolution;
                Some(FrameContext {
                    time: time as f32,
                    resolution: Vec2::new(w as f32, h as f32),
                    mouse: Vec2::new(inputs.mouse.0, inputs.mouse.1),
                })
            }
        }
    }

    /// Horloge pilotée.
    #[must_use]
    pub fn clock(&self) -> &TemporalController {
        &self.clock
    }

    /// Frames sautées depuis la création.
    #[must_use]
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Boîte aux lettres partagée avec l'hôte.
    #[must_use]
    pub fn mailbox(&self) -> &InputMailbox {
        &self.mailbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::host::MAX_OUTPUT_EXTENT;

    #[test]
    fn snapshot_is_taken_at_frame_start() {
        let mailbox = InputMailbox::default();
        let mut driver = FrameDriver::new(mailbox.clone());
        let params = EffectParams::default();
        mailbox.set_resolution(640, 360);
        mailbox.set_mouse(12.0, 34.0);
        let ctx = driver.begin_frame(0.0, &params).unwrap();
        mailbox.set_mouse(99.0, 99.0);
        assert_eq!(ctx.resolution, Vec2::new(640.0, 360.0));
        assert_eq!(ctx.mouse, Vec2::new(12.0, 34.0));
    }

    #[test]
    fn lost_context_skips_without_advancing() {
        let mailbox = InputMailbox::default();
        let mut driver = FrameDriver::new(mailbox.clone());
        let params = EffectParams::default();
        driver.begin_frame(0.25, &params);
        mailbox.set_context(ContextState::Lost);
        assert!(driver.begin_frame(1.0, &params).is_none());
        assert!(driver.begin_frame(1.0, &params).is_none());
        assert_eq!(driver.skipped_frames(), 2);
        mailbox.set_context(ContextState::Ready);
        let ctx = driver.begin_frame(0.25, &params).unwrap();
        assert_eq!(ctx.time, 0.5);
    }

    #[test]
    fn target_fps_follows_params() {
        let mut driver = FrameDriver::new(InputMailbox::default());
        let params = EffectParams {
            target_fps: 4.0,
            ..EffectParams::default()
        };
        assert_eq!(driver.begin_frame(0.125, &params).unwrap().time, 0.0);
        assert_eq!(driver.begin_frame(0.125, &params).unwrap().time, 0.25);
        assert!(driver.clock().is_quantized());
    }

    #[test]
    fn fps_change_during_lost_frame_waits_for_next_frame() {
        let mailbox = InputMailbox::default();
        let mut driver = FrameDriver::new(mailbox.clone());
        let at_30 = EffectParams {
            target_fps: 30.0,
            ..EffectParams::default()
        };
        let at_60 = EffectParams {
            target_fps: 60.0,
            ..EffectParams::default()
        };
        driver.begin_frame(0.05, &at_30);
        let before = (
            driver.clock().time(),
            driver.clock().residual(),
            driver.clock().frame_duration(),
        );

        mailbox.set_context(ContextState::Lost);
        assert!(driver.begin_frame(0.0, &at_60).is_none());
        let after = (
            driver.clock().time(),
            driver.clock().residual(),
            driver.clock().frame_duration(),
        );
        assert_eq!(after, before);

        mailbox.set_context(ContextState::Ready);
        driver.begin_frame(0.0, &at_60);
        assert_eq!(driver.clock().frame_duration(), Some(1.0 / 60.0));
    }

    #[test]
    fn oversized_resolution_skips_without_advancing() {
        let mailbox = InputMailbox::default();
        let mut driver = FrameDriver::new(mailbox.clone());
        let params = EffectParams::default();
        driver.begin_frame(0.1, &params);
        mailbox.set_resolution(MAX_OUTPUT_EXTENT + 1, 4);
        assert!(driver.begin_frame(0.1, &params).is_none());
        assert_eq!(driver.skipped_frames(), 1);
        assert!((driver.clock().time() - 0.1).abs() < 1e-12);
        mailbox.set_resolution(64, 4);
        assert!(driver.begin_frame(0.1, &params).is_some());
    }

    #[test]
    fn zero_resolution_falls_back() {
        let mailbox = InputMailbox::default();
        let mut driver = FrameDriver::new(mailbox.clone());
        mailbox.set_resolution(0, 0);
        let ctx = driver.begin_frame(0.0, &EffectParams::default()).unwrap();
        assert_eq!(ctx.resolution, Vec2::new(1920.0, 1080.0));
    }
}
