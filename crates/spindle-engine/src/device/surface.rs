use std::fmt;

use winit::dpi::PhysicalSize;

/// Surface configurations an adapter offers for a window.
///
/// Diagnostic only: logged when a context is created, never used to pick
/// anything after the fact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceConfigInfo {
    pub formats: Vec<wgpu::TextureFormat>,
    pub present_modes: Vec<wgpu::PresentMode>,
    pub alpha_modes: Vec<wgpu::CompositeAlphaMode>,
}

impl SurfaceConfigInfo {
    pub(crate) fn from_caps(caps: &wgpu::SurfaceCapabilities) -> Self {
        Self {
            formats: caps.formats.clone(),
            present_modes: caps.present_modes.clone(),
            alpha_modes: caps.alpha_modes.clone(),
        }
    }

    /// Number of distinct (format, present mode, alpha mode) combinations.
    pub fn combinations(&self) -> usize {
        self.formats.len() * self.present_modes.len() * self.alpha_modes.len()
    }
}

impl fmt::Display for SurfaceConfigInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "formats {:?}; present modes {:?}; alpha modes {:?}",
            self.formats, self.present_modes, self.alpha_modes
        )
    }
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Falls back to FIFO, which every backend must support.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Updates the stored size and reconfigures the surface.
///
/// Returns `false` when the new size is zero-area: wgpu cannot configure such
/// a surface, so configuration is deferred until the next non-zero resize.
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

/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated; the surface was configured again.
    Reconfigured,
    /// Timed out or otherwise transient.
    SkipFrame,
    /// Out of memory. Stop rendering.
    Fatal,
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
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn prefers_srgb_when_offered() {
        let c = caps(vec![
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn no_formats_means_incompatible() {
        assert_eq!(choose_surface_format(&caps(vec![]), true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back_to_first() {
        let c = caps(vec![wgpu::TextureFormat::Rgba8Unorm]);
        let mode = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn unsupported_present_mode_falls_back_to_fifo() {
        let c = caps(vec![wgpu::TextureFormat::Rgba8Unorm]);
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn config_info_counts_combinations() {
        let c = caps(vec![
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        let info = SurfaceConfigInfo::from_caps(&c);
        assert_eq!(info.combinations(), 4);
        assert!(info.to_string().contains("Bgra8UnormSrgb"));
    }
}
