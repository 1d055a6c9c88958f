//! Binding layouts and binding sets.
//!
//! A [`BindingLayout`] is a pure declaration of slots. A [`BindingSet`] pairs
//! concrete resources with a registered layout and can only be constructed if
//! it matches that layout slot for slot.

mod layout;
mod registry;
mod set;

pub use layout::{BindingLayout, LayoutEntry, SlotKind};
pub use registry::{LayoutKind, LayoutRegistry, RegisteredLayout};
pub use set::{BindingResource, BindingSet};
