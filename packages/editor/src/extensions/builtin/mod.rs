//! Extensions every editor gets unless `enableCoreExtensions` is false

mod commands;
mod editable;

pub use commands::BaseCommands;
pub use editable::Editable;

use crate::extensions::Extension;
use std::sync::Arc;

/// The core extension set, in the order the editor prepends it
pub fn core_extensions() -> Vec<Arc<dyn Extension>> {
    vec![Arc::new(BaseCommands), Arc::new(Editable)]
}
