//! Skill contract, registry and the outbound HTTP client used by executors.

/// Named skill lookup.
pub mod registry;
/// Outbound JSON client.
pub mod remote;
/// The skill contract.
pub mod skill;

pub use registry::SkillRegistry;
pub use remote::RemoteClient;
pub use skill::{Skill, SkillDescriptor};
