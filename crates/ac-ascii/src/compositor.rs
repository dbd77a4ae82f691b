use ac_core::frame::{FrameBuffer, quantize};
use ac_core::traits::ColorSampler;
use glam::Vec2;
use rayon::prelude::*;

use crate::pipeline::{FrameContext, PixelPipeline};

/// Évalue le pipeline pour chaque pixel de `out`, une ligne par tâche rayon.
///
/// Les pixels ne lisent que des données immuables (`image`, paramètres,
/// atlas, `ctx`), l'ordre d'évaluation n'a donc aucun effet sur le résultat.
/// Un buffer de taille nulle est un no-op.
///
/// # Example
/// ```
/// use ac_ascii::compositor::render_frame;
/// use ac_ascii::pipeline::{FrameContext, PixelPipeline};
/// use ac_core::config::EffectParams;
/// use ac_core::frame::FrameBuffer;
///
/// let params = EffectParams::default();
/// let pipeline = PixelPipeline::new(&params, None).unwrap();
/// let source = FrameBuffer::filled(32, 18, [200, 120, 40, 255]);
/// let mut out = FrameBuffer::new(32, 18);
/// render_frame(&pipeline, &FrameContext::still(32, 18), &source, &mut out);
/// assert_eq!(out.pixel(0, 0).3, 255);
/// ```
pub fn render_frame<S>(
    pipeline: &PixelPipeline<'_>,
    ctx: &FrameContext,
    image: &S,
    out: &mut FrameBuffer,
) where
    S: ColorSampler + ?Sized,
{
    if out.is_empty() {
        return;
    }
    let (w, h) = (out.width as usize, out.height as usize);
    let size = Vec2::new(w as f32, h as f32);
    let grid = pipeline.grid(ctx.resolution);

    out.data
        .par_chunks_mut(w * 4)
        .take(h)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f32 + 0.5) / size.y;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let uv = Vec2::new((x as f32 + 0.5) / size.x, v);
                px.copy_from_slice(&quantize(pipeline.shade_in(&grid, uv, ctx, image)));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::config::EffectParams;

    fn render(params: &EffectParams, source: &FrameBuffer, w: u32, h: u32) -> FrameBuffer {
        let pipeline = PixelPipeline::new(params, None).unwrap();
        let mut out = FrameBuffer::new(w, h);
        render_frame(&pipeline, &FrameContext::still(w, h), source, &mut out);
        out
    }

    #[test]
    fn zero_sized_output_is_a_noop() {
        let params = EffectParams::default();
        let source = FrameBuffer::filled(8, 8, [255, 255, 255, 255]);
        let out = render(&params, &source, 0, 12);
        assert!(out.data.is_empty());
    }

    #[test]
    fn matches_per_pixel_shading() {
        let params = EffectParams {
            cell_size: 4.0,
            ..EffectParams::default()
        };
        let mut source = FrameBuffer::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                let v = (x * 16 + y) as f32 / 255.0;
                source.put_pixel(x, y, glam::Vec4::new(v, 1.0 - v, 0.5, 1.0));
            }
        }
        let out = render(&params, &source, 16, 16);
        let pipeline = PixelPipeline::new(&params, None).unwrap();
        let ctx = FrameContext::still(16, 16);
        for (x, y) in [(0, 0), (5, 9), (15, 15), (8, 3)] {
            let uv = Vec2::new((x as f32 + 0.5) / 16.0, (y as f32 + 0.5) / 16.0);
            let [r, g, b, a] = quantize(pipeline.shade(uv, &ctx, &source));
            assert_eq!(out.pixel(x, y), (r, g, b, a));
        }
    }

    #[test]
    fn black_source_renders_black() {
        let params = EffectParams::default();
        let source = FrameBuffer::filled(20, 10, [0, 0, 0, 255]);
        let out = render(&params, &source, 20, 10);
        assert!(out.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }
}
