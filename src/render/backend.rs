use crate::assets::OverlayImage;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::QrStyleResult;
use crate::paint::gradient::ResolvedPaint;
use crate::shapes::{FillRule, Primitive, ShapeDescriptor};

/// A rendered raster surface as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy as an `image` buffer.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let p = crate::foundation::core::Rgba8Premul {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                };
                px.copy_from_slice(&p.to_straight_rgba());
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
    }
}

/// A named drawing region: one paint applied to every shape emitted inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Region<'a> {
    /// Unique name within the surface; used for clip resources.
    pub name: &'a str,
    /// Paint resource previously registered with [`Backend::define_paint`].
    pub paint: Option<&'a str>,
    /// Area the paint covers.
    pub bounds: Rect,
}

/// Drawing contract shared by the raster and vector surfaces.
///
/// Callers resolve and define a paint before opening the region that uses it, and emit shapes
/// strictly between `begin_region` and `end_region`.
pub trait Backend {
    /// What [`Backend::finish`] produces.
    type Surface;

    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Whether a paint resource with this name exists.
    fn has_paint(&self, name: &str) -> bool;

    /// Register a paint under `name`. An existing resource with that name is kept.
    fn define_paint(&mut self, name: &str, paint: &ResolvedPaint);

    /// Open a region; all shapes until [`Backend::end_region`] share its paint.
    fn begin_region(&mut self, region: &Region<'_>);

    /// Start a shape rotated by `rotation` radians about `center`.
    fn begin_shape(&mut self, center: Point, rotation: f64, fill_rule: FillRule);

    /// Add a primitive, given in the shape's unrotated frame.
    fn emit(&mut self, primitive: &Primitive);

    /// Close the current shape.
    fn end_shape(&mut self);

    /// Close the current region.
    fn end_region(&mut self);

    /// Convert the overlay into this surface's own form ahead of drawing it into `dst`.
    ///
    /// A later [`Backend::draw_image`] with the same image and `dst` reuses the result; an error
    /// here means the image cannot be drawn on this surface at all.
    fn prepare_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()>;

    /// Draw the overlay image stretched into `dst`.
    fn draw_image(&mut self, image: &OverlayImage, dst: Rect) -> QrStyleResult<()>;

    /// Hand over the finished surface.
    fn finish(self) -> QrStyleResult<Self::Surface>;

    /// Emit a whole shape descriptor.
    fn draw_shape(&mut self, shape: &ShapeDescriptor) {
        self.begin_shape(shape.center(), shape.rotation, shape.fill_rule);
        for primitive in &shape.primitives {
            self.emit(primitive);
        }
        self.end_shape();
    }
}
