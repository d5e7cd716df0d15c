/*
 * Converts logical (device-independent) sizes into physical pixels using the
 * scale of the display the window currently lives on. Nothing is cached: the
 * transform is queried on every call because moving a window to another
 * monitor changes it.
 */
use crate::error::Result as PlatformResult;
use crate::types::{LogicalSize, NativeWindowId, PixelSize};

/// Logical units per inch.
pub const BASE_DPI: f64 = 96.0;

/// Scale from logical units to device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceTransform {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl DeviceTransform {
    pub const IDENTITY: DeviceTransform = DeviceTransform {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn from_dpi(dpi_x: u32, dpi_y: u32) -> Self {
        Self {
            scale_x: f64::from(dpi_x) / BASE_DPI,
            scale_y: f64::from(dpi_y) / BASE_DPI,
        }
    }

    /// Applies the scale and truncates toward zero.
    pub fn transform(&self, size: LogicalSize) -> PixelSize {
        PixelSize {
            width: (size.width * self.scale_x) as i32,
            height: (size.height * self.scale_y) as i32,
        }
    }
}

/// Source of display scale factors.
pub trait DisplayScale {
    /// Transform of the display `window` is attached to, or `None` if the
    /// window is not attached to any display surface.
    fn window_transform(&self, window: NativeWindowId) -> Option<DeviceTransform>;

    /// Transform of a fresh, unattached display context.
    fn default_transform(&self) -> PlatformResult<DeviceTransform>;
}

pub fn to_pixel_size<D: DisplayScale + ?Sized>(
    display: &D,
    attached_to: Option<NativeWindowId>,
    actual: LogicalSize,
) -> PlatformResult<PixelSize> {
    let transform = match attached_to.and_then(|window| display.window_transform(window)) {
        Some(transform) => transform,
        None => {
            log::debug!(
                "PixelSize: no display context for {attached_to:?}, using default transform"
            );
            display.default_transform()?
        }
    };
    Ok(transform.transform(actual))
}
