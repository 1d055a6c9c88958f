use std::ops::Range;

use super::handle::{BindGroupId, PipelineId};

/// A single command inside a render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPipeline(PipelineId),
    SetBindGroup {
        slot: u32,
        group: BindGroupId,
    },
    Draw {
        vertices: Range<u32>,
        instances: Range<u32>,
    },
}

/// A recorded render pass targeting the current presentable image.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub label: String,
    pub clear: wgpu::Color,
    pub commands: Vec<Command>,
}

impl PassRecord {
    /// Number of draws in this pass.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }
}

/// Work recorded for one frame and submitted as a single unit.
///
/// A frame with no passes is legal: it submits nothing to the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameCommands {
    pub passes: Vec<PassRecord>,
}

impl FrameCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a pass that clears the presentable image to `clear`.
    ///
    /// The pass is appended to the frame when [`PassEncoder::end`] is called.
    pub fn begin_pass(&mut self, label: impl Into<String>, clear: wgpu::Color) -> PassEncoder<'_> {
        PassEncoder {
            frame: self,
            record: PassRecord {
                label: label.into(),
                clear,
                commands: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Records commands into one pass of a [`FrameCommands`].
pub struct PassEncoder<'f> {
    frame: &'f mut FrameCommands,
    record: PassRecord,
}

impl PassEncoder<'_> {
    pub fn set_pipeline(&mut self, pipeline: PipelineId) {
        self.record.commands.push(Command::SetPipeline(pipeline));
    }

    pub fn set_bind_group(&mut self, slot: u32, group: BindGroupId) {
        self.record
            .commands
            .push(Command::SetBindGroup { slot, group });
    }

    pub fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.record
            .commands
            .push(Command::Draw { vertices, instances });
    }

    /// Closes the pass and appends it to the frame.
    pub fn end(self) {
        self.frame.passes.push(self.record);
    }
}
