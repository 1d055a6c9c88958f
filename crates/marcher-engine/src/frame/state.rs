/// Where the scheduler is inside the current frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrameState {
    #[default]
    Idle,
    ComputeCamera,
    UpdateUniforms,
    RecordPass,
    Submit,
    Present,
}

/// Result of one `tick`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was submitted and presented.
    Presented,
    /// Uniform writes were submitted but the mode draws nothing, so no
    /// image was presented.
    Submitted,
    /// The surface was unavailable; nothing was shown this frame.
    Skipped,
    /// The view is detached. No work was done.
    Stopped,
}
