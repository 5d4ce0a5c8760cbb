use kurbo::Shape as _;

use crate::{
    foundation::{
        color::Rgb,
        core::{Affine, BezPath, Point, Size},
        error::{AvatarError, AvatarResult},
    },
    render::FrameRGBA,
    scene::{
        model::Primitive,
        retained::{DrawItem, RetainedScene},
    },
};

/// Options for [`CpuRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Background the frame is cleared to; `None` leaves it transparent.
    pub clear: Option<Rgb>,
    /// Flattening tolerance for curves and stroke expansion, in pixels.
    pub tolerance: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear: None,
            tolerance: 0.1,
        }
    }
}

/// Rasterizes a [`RetainedScene`] with `vello_cpu`.
///
/// Filled primitives become kurbo paths; stroked segments are expanded to outlines before
/// filling. Text is left to the host's text stack and is not drawn.
#[derive(Clone, Debug, Default)]
pub struct CpuRenderer {
    settings: RenderSettings,
}

impl CpuRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Render the scene at its viewport size into premultiplied RGBA8.
    #[tracing::instrument(skip_all)]
    pub fn render(&self, scene: &RetainedScene) -> AvatarResult<FrameRGBA> {
        use crate::scene::surface::SceneSurface as _;

        let (width, height) = pixel_size(scene.viewport())?;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        clear_pixmap(&mut pixmap, [0, 0, 0, 0]);

        let items = scene.draw_list();
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        // `render_to_pixmap` overwrites every pixel, so the background is painted in the context.
        if let Some(clear) = self.settings.clear {
            let [r, g, b] = clear.channels();
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }
        let mut skipped = 0usize;
        for item in &items {
            if !self.draw_item(&mut ctx, item) {
                skipped += 1;
            }
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        tracing::debug!(drawn = items.len() - skipped, skipped, "rendered scene");

        Ok(FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Returns `false` when nothing could be drawn for the item.
    fn draw_item(&self, ctx: &mut vello_cpu::RenderContext, item: &DrawItem) -> bool {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(item.transform));
        let tolerance = self.settings.tolerance;

        if let Primitive::Segments { lines, width } = &item.primitive {
            let Some(color) = item.stroke else {
                return false;
            };
            let path = segments_path(lines);
            let outline = kurbo::stroke(
                path.iter(),
                &kurbo::Stroke::new(*width).with_caps(kurbo::Cap::Round),
                &kurbo::StrokeOpts::default(),
                tolerance,
            );
            fill(ctx, &outline, color);
            return true;
        }

        let Some(path) = primitive_path(&item.primitive, tolerance) else {
            tracing::trace!(part = %item.name, "primitive not rasterized");
            return false;
        };
        if let Some(color) = item.fill {
            fill(ctx, &path, color);
        }
        if let Some(color) = item.stroke {
            let outline = kurbo::stroke(
                path.iter(),
                &kurbo::Stroke::new(1.5),
                &kurbo::StrokeOpts::default(),
                tolerance,
            );
            fill(ctx, &outline, color);
        }
        true
    }
}

/// Outline of a filled primitive in its local space. `None` for groups, text and strokes.
pub fn primitive_path(primitive: &Primitive, tolerance: f64) -> Option<BezPath> {
    let origin = Point::ZERO;
    let path = match primitive {
        Primitive::Group | Primitive::Text { .. } | Primitive::Segments { .. } => return None,
        Primitive::Ellipse { rx, ry } => {
            kurbo::Ellipse::new(origin, (*rx, *ry), 0.0).to_path(tolerance)
        }
        Primitive::Circle { radius } => kurbo::Circle::new(origin, *radius).to_path(tolerance),
        Primitive::Rect { rect } => rect.to_path(tolerance),
        Primitive::RoundedRect { rect, radius } => {
            kurbo::RoundedRect::from_rect(*rect, *radius).to_path(tolerance)
        }
        Primitive::Polygon { points } => {
            let (first, rest) = points.split_first()?;
            let mut path = BezPath::new();
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close_path();
            path
        }
        Primitive::Arc {
            radius,
            start_angle,
            sweep_angle,
        } => {
            // Wedge: center, out to the arc start, along the arc, back to center.
            let arc = kurbo::Arc::new(
                origin,
                (*radius, *radius),
                *start_angle,
                *sweep_angle,
                0.0,
            );
            let mut path = BezPath::new();
            path.move_to(origin);
            path.line_to(Point::new(
                radius * start_angle.cos(),
                radius * start_angle.sin(),
            ));
            path.extend(arc.append_iter(tolerance));
            path.close_path();
            path
        }
    };
    Some(path)
}

fn segments_path(lines: &[[Point; 2]]) -> BezPath {
    let mut path = BezPath::new();
    for [from, to] in lines {
        path.move_to(*from);
        path.line_to(*to);
    }
    path
}

fn fill(ctx: &mut vello_cpu::RenderContext, path: &BezPath, color: Rgb) {
    let [r, g, b] = color.channels();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
    ctx.fill_path(&bezpath_to_cpu(path));
}

fn pixel_size(viewport: Size) -> AvatarResult<(u16, u16)> {
    let to_px = |v: f64, what: &str| -> AvatarResult<u16> {
        let px = v.round();
        if !(1.0..=f64::from(u16::MAX)).contains(&px) {
            return Err(AvatarError::render(format!(
                "viewport {what} {v} is outside 1..={}",
                u16::MAX
            )));
        }
        Ok(px as u16)
    };
    Ok((to_px(viewport.width, "width")?, to_px(viewport.height, "height")?))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
