// Navigation state module.
// Screens, events, the controller that moves between them, and activity messages.

pub mod controller;
#[cfg(test)]
pub(crate) mod fake;
pub mod messages;
pub mod navigation;

pub use controller::{Controller, Transition};
pub use messages::{Message, MessageLevel, MessageLog};
pub use navigation::{
    CANCEL_LABEL, JobAction, JobListScreen, NavEvent, NodeRef, Screen, TreeNode, branch_buttons,
};
