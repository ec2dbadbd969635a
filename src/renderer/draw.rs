#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

impl PrimitiveType {
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    /// Number of vertices (or indices) needed for `primitives` primitives.
    pub fn vertex_count(self, primitives: u32) -> u32 {
        if primitives == 0 {
            return 0;
        }
        match self {
            PrimitiveType::Points => primitives,
            PrimitiveType::Lines => primitives * 2,
            PrimitiveType::LineStrip => primitives + 1,
            PrimitiveType::Triangles => primitives * 3,
            PrimitiveType::TriangleStrip => primitives + 2,
        }
    }
}

/// Front-face vertex order of the submitted geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Winding {
    #[default]
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

impl IndexFormat {
    pub fn to_wgpu(self) -> wgpu::IndexFormat {
        match self {
            IndexFormat::U16 => wgpu::IndexFormat::Uint16,
            IndexFormat::U32 => wgpu::IndexFormat::Uint32,
        }
    }
}

/// Backend-side vertex and index buffers plus their modification counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GeometryBuffers {
    pub vertex_buffer: u64,
    pub index_buffer: Option<u64>,
    pub index_format: IndexFormat,
    pub vertex_change_id: u32,
    pub index_change_id: u32,
}

impl GeometryBuffers {
    pub fn new(vertex_buffer: u64) -> Self {
        Self {
            vertex_buffer,
            ..Self::default()
        }
    }

    pub fn with_indices(mut self, index_buffer: u64, format: IndexFormat) -> Self {
        self.index_buffer = Some(index_buffer);
        self.index_format = format;
        self
    }

    pub fn touch_vertices(&mut self) {
        self.vertex_change_id = self.vertex_change_id.wrapping_add(1);
    }

    pub fn touch_indices(&mut self) {
        self.index_change_id = self.index_change_id.wrapping_add(1);
    }

    /// Combined change counter; differs whenever either buffer changed.
    pub fn change_id(&self) -> u64 {
        (u64::from(self.vertex_change_id) << 32) | u64::from(self.index_change_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawRequest {
    pub primitive: PrimitiveType,
    pub primitive_count: u32,
    pub winding: Winding,
    pub geometry: GeometryBuffers,
}

impl DrawRequest {
    pub fn new(primitive: PrimitiveType, primitive_count: u32, geometry: GeometryBuffers) -> Self {
        Self {
            primitive,
            primitive_count,
            winding: Winding::default(),
            geometry,
        }
    }

    pub fn triangles(primitive_count: u32, geometry: GeometryBuffers) -> Self {
        Self::new(PrimitiveType::Triangles, primitive_count, geometry)
    }

    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    pub fn vertex_count(&self) -> u32 {
        self.primitive.vertex_count(self.primitive_count)
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count == 0
    }
}
