use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the surface format, preferring sRGB variants when asked.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(f) = formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }
    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    alpha_modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| alpha_modes.contains(m))
        .or_else(|| alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Returns `requested` if the format supports it, otherwise 1.
pub(crate) fn choose_sample_count(requested: u32, supported: impl Fn(u32) -> bool) -> u32 {
    if requested > 1 && supported(requested) {
        requested
    } else {
        1
    }
}

/// Applies a new drawable size. Returns `true` when the surface was reconfigured.
///
/// wgpu does not support configuring a surface with a 0x0 size; in that case
/// only `size` is updated and configuration is deferred.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
