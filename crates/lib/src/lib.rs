//! imgbuild-lib: lifecycle engine for image build resources
//!
//! An image build is declared by a host (a declarative orchestrator) and
//! realized by an external build tool run as a subprocess:
//! - `ResourceDeclaration`: desired state, and once stamped, persisted state
//! - `Lifecycle`: create/read/update/delete/import over that state
//! - `CommandInvoker`: runs `init` and `build` against the build tool
//! - `StateFile`: JSON state store for hosts that keep state on disk

pub mod consts;
pub mod declaration;
pub mod env;
pub mod execute;
pub mod lifecycle;
pub mod params;
pub mod schema;
pub mod stamp;
pub mod state;
pub mod util;

pub use declaration::ResourceDeclaration;
pub use lifecycle::{Diagnostic, Lifecycle, LifecycleError};
