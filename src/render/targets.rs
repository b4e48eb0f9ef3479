use super::helpers;

/// Offscreen multisampled color target, resolved into the swapchain each frame.
///
/// Absent when antialiasing is off (dense displays or no MSAA support), in
/// which case passes draw straight into the surface texture.
pub(crate) struct RenderTargets {
    pub(crate) sample_count: u32,
    msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let mut targets = Self {
            sample_count,
            msaa: None,
        };
        targets.recreate(device, format, width, height);
        targets
    }

    pub(crate) fn recreate(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) {
        if let Some((tex, _)) = self.msaa.take() {
            tex.destroy();
        }
        if self.sample_count > 1 {
            self.msaa = Some(helpers::create_color_texture(
                device,
                "msaa_color",
                width,
                height,
                format,
                self.sample_count,
            ));
        }
    }

    /// Attachment view and resolve target for a frame drawn into `frame_view`.
    pub(crate) fn attachment<'a>(
        &'a self,
        frame_view: &'a wgpu::TextureView,
    ) -> (&'a wgpu::TextureView, Option<&'a wgpu::TextureView>) {
        match &self.msaa {
            Some((_, msaa_view)) => (msaa_view, Some(frame_view)),
            None => (frame_view, None),
        }
    }

    pub(crate) fn destroy(&mut self) {
        if let Some((tex, _)) = self.msaa.take() {
            tex.destroy();
        }
    }
}
