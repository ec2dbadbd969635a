// pipeline/wgpu_state.rs
//
// Translation of resolved pipeline settings into wgpu descriptor pieces for
// adapters that build wgpu render pipelines.

use super::settings::{ColorMask, CompareFunction, DrawMode, PipelineSettings};

impl CompareFunction {
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

impl DrawMode {
    pub fn to_wgpu(self) -> wgpu::PolygonMode {
        match self {
            DrawMode::Fill => wgpu::PolygonMode::Fill,
            DrawMode::Wireframe => wgpu::PolygonMode::Line,
            DrawMode::Point => wgpu::PolygonMode::Point,
        }
    }
}

impl ColorMask {
    pub fn to_wgpu(self) -> wgpu::ColorWrites {
        let mut writes = wgpu::ColorWrites::empty();
        if self.contains(ColorMask::RED) {
            writes |= wgpu::ColorWrites::RED;
        }
        if self.contains(ColorMask::GREEN) {
            writes |= wgpu::ColorWrites::GREEN;
        }
        if self.contains(ColorMask::BLUE) {
            writes |= wgpu::ColorWrites::BLUE;
        }
        if self.contains(ColorMask::ALPHA) {
            writes |= wgpu::ColorWrites::ALPHA;
        }
        writes
    }
}

impl PipelineSettings {
    /// wgpu culls at most one face; culling both collapses to back-face culling.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        match (self.backface_culling, self.frontface_culling) {
            (false, false) => None,
            (true, false) => Some(wgpu::Face::Back),
            (false, true) => Some(wgpu::Face::Front),
            (true, true) => {
                log::debug!("Both faces culled; wgpu pipeline falls back to back-face culling");
                Some(wgpu::Face::Back)
            }
        }
    }

    pub fn primitive_state(&self, topology: wgpu::PrimitiveTopology) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull_mode(),
            unclipped_depth: false,
            polygon_mode: self.draw_mode.to_wgpu(),
            conservative: false,
        }
    }

    /// Depth state for a renderer that uploads the offset projection, which
    /// already carries the polygon offset. No depth bias is added.
    pub fn depth_stencil_state(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.z_write,
            depth_compare: self.depth_compare.to_wgpu(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Depth state for backends that draw with the raw projection: the
    /// polygon offset becomes a constant depth bias instead. Negative bias
    /// pulls toward the viewer with a `Less`-style compare.
    pub fn depth_stencil_state_with_bias(
        &self,
        format: wgpu::TextureFormat,
        offset_units: f32,
    ) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            bias: wgpu::DepthBiasState {
                constant: -(self.polygon_offset * offset_units).round() as i32,
                slope_scale: 0.0,
                clamp: 0.0,
            },
            ..self.depth_stencil_state(format)
        }
    }

    pub fn color_target(
        &self,
        format: wgpu::TextureFormat,
        blend: Option<wgpu::BlendState>,
    ) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend,
            write_mask: self.color_mask.to_wgpu(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_map_to_standard_wgpu_state() {
        let settings = PipelineSettings::default();
        let primitive = settings.primitive_state(wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(primitive.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(primitive.polygon_mode, wgpu::PolygonMode::Fill);

        let depth = settings.depth_stencil_state(wgpu::TextureFormat::Depth24Plus);
        assert!(depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::LessEqual);
        assert_eq!(depth.bias.constant, 0);
        assert_eq!(settings.color_mask.to_wgpu(), wgpu::ColorWrites::ALL);
    }

    #[test]
    fn culling_and_draw_mode_translate() {
        let mut settings = PipelineSettings::default().with_draw_mode(DrawMode::Wireframe);
        settings.flip_culling();
        let primitive = settings.primitive_state(wgpu::PrimitiveTopology::LineList);
        assert_eq!(primitive.cull_mode, Some(wgpu::Face::Front));
        assert_eq!(primitive.polygon_mode, wgpu::PolygonMode::Line);

        settings.frontface_culling = false;
        assert_eq!(settings.cull_mode(), None);
        settings.frontface_culling = true;
        settings.backface_culling = true;
        assert_eq!(settings.cull_mode(), Some(wgpu::Face::Back));
    }

    #[test]
    fn polygon_offset_becomes_negative_bias() {
        let settings = PipelineSettings::default().with_polygon_offset(2.0);
        let depth =
            settings.depth_stencil_state_with_bias(wgpu::TextureFormat::Depth32Float, 1.5);
        assert_eq!(depth.bias.constant, -3);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::LessEqual);
    }

    #[test]
    fn offset_projection_path_adds_no_bias() {
        let settings = PipelineSettings::default().with_polygon_offset(2.0);
        let depth = settings.depth_stencil_state(wgpu::TextureFormat::Depth32Float);
        assert_eq!(depth.bias.constant, 0);
        assert_eq!(depth.bias.slope_scale, 0.0);
    }

    #[test]
    fn color_mask_keeps_selected_channels() {
        let writes = (ColorMask::RED | ColorMask::ALPHA).to_wgpu();
        assert_eq!(writes, wgpu::ColorWrites::RED | wgpu::ColorWrites::ALPHA);
    }
}
