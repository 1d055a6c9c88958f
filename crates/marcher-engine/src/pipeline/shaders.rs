/// One WGSL program shipped with the engine. Entry point is always `main`.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSource {
    pub label: &'static str,
    pub source: &'static str,
}

macro_rules! wgsl {
    ($name:literal) => {
        ShaderSource {
            label: $name,
            source: include_str!(concat!("shaders/", $name, ".wgsl")),
        }
    };
}

/// The five programs, compiled together at startup.
pub const SHADERS: [ShaderSource; 5] = [
    wgsl!("vertexWriteGBuffers"),
    wgsl!("vertexTextureQuad"),
    wgsl!("fragmentWriteGBuffers"),
    wgsl!("fragmentGBuffersDebugView"),
    wgsl!("fragmentRayMarching"),
];

pub const ENTRY_POINT: &str = "main";
