//! CreatureStudio CLI library.
//!
//! Configuration, the on-disk blueprint store, the template catalog, and the
//! command implementations behind the `creature` binary.

pub mod commands;
pub mod config;
pub mod error;
pub mod store;
pub mod templates;

pub use config::{ConfigOverrides, StudioConfig};
pub use error::{StoreError, StoreResult};
pub use store::{BlueprintStore, BlueprintSummary, PROTECTED_BLUEPRINTS};
pub use templates::{TemplateCatalog, TemplateKind};
