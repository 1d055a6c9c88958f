/// Declares a copyable index handle into one of the backend's resource tables.
macro_rules! handle {
    ($($(#[$meta:meta])* $name:ident => $kind:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
            pub struct $name(pub(crate) u32);

            impl $name {
                /// Human-readable resource kind, used in error messages.
                pub const KIND: &'static str = $kind;

                #[inline]
                pub(crate) fn from_index(index: usize) -> Self {
                    Self(index as u32)
                }

                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

handle! {
    /// A GPU buffer (vertex, index, uniform or storage).
    BufferId => "buffer",
    /// A texture allocation.
    TextureId => "texture",
    /// A view into a texture.
    ViewId => "texture view",
    /// A binding layout created from a `BindingLayout` declaration.
    LayoutId => "layout",
    /// A binding set (bind group) built against a layout.
    BindGroupId => "bind group",
    /// A compiled shader program.
    ShaderId => "shader",
    /// A compiled render pipeline.
    PipelineId => "pipeline",
}
