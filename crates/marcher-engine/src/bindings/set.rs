use crate::error::{BindingMismatch, RenderError};
use crate::gfx::{BufferId, LayoutId, ViewId};

use super::layout::{BindingLayout, SlotKind};
use super::registry::RegisteredLayout;

/// A resource bound to one slot, tagged with the access mode it is bound for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingResource {
    Texture(ViewId),
    ReadOnlyStorage(BufferId),
    Uniform(BufferId),
}

impl BindingResource {
    pub fn kind(&self) -> SlotKind {
        match self {
            BindingResource::Texture(_) => SlotKind::UnfilterableTexture,
            BindingResource::ReadOnlyStorage(_) => SlotKind::ReadOnlyStorage,
            BindingResource::Uniform(_) => SlotKind::Uniform,
        }
    }
}

/// Resources grouped for one pipeline slot, checked against their layout.
///
/// Immutable once built; replacing a resource means building a new set.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BindingSet {
    label: String,
    layout: LayoutId,
    entries: Vec<(u32, BindingResource)>,
}

impl BindingSet {
    /// Builds a set for `layout`.
    ///
    /// Fails with `RenderError::BindingMismatch` unless `entries` has exactly
    /// one resource per declared slot, in slot order, with matching kinds.
    pub fn new(
        label: impl Into<String>,
        layout: &RegisteredLayout,
        entries: Vec<(u32, BindingResource)>,
    ) -> Result<Self, RenderError> {
        let label = label.into();

        if let Err(reason) = check(&layout.decl, &entries) {
            return Err(RenderError::BindingMismatch {
                set: label,
                layout: layout.decl.label,
                reason,
            });
        }

        log::debug!(
            "binding set `{}` built for layout `{}`",
            label,
            layout.decl.label
        );

        Ok(Self {
            label,
            layout: layout.id,
            entries,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layout(&self) -> LayoutId {
        self.layout
    }

    pub fn entries(&self) -> &[(u32, BindingResource)] {
        &self.entries
    }
}

fn check(layout: &BindingLayout, entries: &[(u32, BindingResource)]) -> Result<(), BindingMismatch> {
    if entries.len() != layout.entries.len() {
        return Err(BindingMismatch::Count {
            expected: layout.entries.len(),
            found: entries.len(),
        });
    }

    for (position, (declared, (slot, resource))) in layout.entries.iter().zip(entries).enumerate() {
        if declared.slot != *slot {
            return Err(BindingMismatch::Slot {
                position,
                expected: declared.slot,
                found: *slot,
            });
        }
        if declared.kind != resource.kind() {
            return Err(BindingMismatch::Kind {
                slot: *slot,
                expected: declared.kind,
                found: resource.kind(),
            });
        }
    }

    Ok(())
}
