use torsio_sync::PixelFormat;

/// Surface format as reported to the coordinator.
///
/// wgpu formats carry no numeric id, so formats without a named
/// [`PixelFormat`] variant all map to `Other(0)`.
pub fn pixel_format_of(format: wgpu::TextureFormat) -> PixelFormat {
    match format {
        wgpu::TextureFormat::Bgra8Unorm => PixelFormat::Bgra8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb => PixelFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8Unorm => PixelFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8UnormSrgb => PixelFormat::Rgba8UnormSrgb,
        wgpu::TextureFormat::Rgba16Float => PixelFormat::Rgba16Float,
        wgpu::TextureFormat::Rgb10a2Unorm => PixelFormat::Rgb10a2Unorm,
        other => {
            log::warn!("surface format {other:?} has no engine-side name");
            PixelFormat::Other(0)
        }
    }
}

/// Inverse of [`pixel_format_of`] for the named formats.
pub fn texture_format_of(format: PixelFormat) -> Option<wgpu::TextureFormat> {
    Some(match format {
        PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        PixelFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        PixelFormat::Rgb10a2Unorm => wgpu::TextureFormat::Rgb10a2Unorm,
        PixelFormat::Other(_) => return None,
    })
}
