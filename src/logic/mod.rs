pub mod authorize;
pub mod metabolic;
pub mod validate;

pub use authorize::{can_view, require_authenticated, require_project_claim, AccessDenied};
pub use metabolic::{reaction_identifiers, ModelParseError};
pub use validate::{ModelValidator, ValidationError};
