use std::borrow::Cow;

/// WGSL text plus a debug label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    label: String,
    code: Cow<'static, str>,
}

impl ShaderSource {
    pub fn wgsl(label: impl Into<String>, code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }

    /// The bundled pass-through program (`vertex_main` / `fragment_main`).
    pub fn triangle() -> Self {
        Self::wgsl("trigon triangle shader", include_str!("shaders/triangle.wgsl"))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Names of the two stage entry points in one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderEntryPoints {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderEntryPoints {
    fn default() -> Self {
        Self {
            vertex: "vertex_main".to_owned(),
            fragment: "fragment_main".to_owned(),
        }
    }
}
