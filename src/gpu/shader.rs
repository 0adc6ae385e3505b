use bytemuck::{Pod, Zeroable};

/// Instanced star sprites: one screen-space quad per star, shaded as an
/// antialiased disc.
pub const STAR_SHADER: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) radius: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let r = max(radius, 0.25);
    // One extra pixel so the soft edge is not cut off.
    let extent = r + 1.0;
    let pixel = center + quad_pos * extent;

    let ndc = vec2<f32>(
        pixel.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - pixel.y / uniforms.resolution.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = color;
    out.uv = quad_pos * extent / r;
    out.radius = r;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    let edge = 1.0 / in.radius;
    let alpha = 1.0 - smoothstep(1.0 - edge, 1.0 + edge, dist);
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color, alpha);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub resolution: [f32; 2],
    pub _padding: [f32; 2],
}

impl Uniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width.max(1) as f32, height.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_shader_validates() {
        let module = naga::front::wgsl::parse_str(STAR_SHADER)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(STAR_SHADER)));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("star shader should validate");
    }

    #[test]
    fn test_uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 16);
    }
}
