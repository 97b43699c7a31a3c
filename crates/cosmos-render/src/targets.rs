use super::helpers;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Multisampled color and depth attachments for the sprite pass.
///
/// The color target resolves into the swapchain image each frame, so both
/// textures are recreated whenever the surface size changes.
pub(crate) struct RenderTargets {
    #[allow(dead_code)]
    pub(crate) msaa_tex: wgpu::Texture,
    pub(crate) msaa_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let (msaa_tex, msaa_view) = msaa_color(device, width, height, format);
        let (depth_tex, depth_view) = depth(device, width, height);
        Self {
            msaa_tex,
            msaa_view,
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) {
        (self.msaa_tex, self.msaa_view) = msaa_color(device, width, height, format);
        (self.depth_tex, self.depth_view) = depth(device, width, height);
    }
}

fn msaa_color(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_target_texture(
        device,
        "msaa_color",
        width,
        height,
        format,
        crate::MSAA_SAMPLES,
        wgpu::TextureUsages::RENDER_ATTACHMENT,
    )
}

fn depth(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_target_texture(
        device,
        "depth",
        width,
        height,
        DEPTH_FORMAT,
        crate::MSAA_SAMPLES,
        wgpu::TextureUsages::RENDER_ATTACHMENT,
    )
}
