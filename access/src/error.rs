use agora_types::{Address, Role};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{caller} is missing role {role}")]
    Unauthorized { caller: Address, role: Role },

    #[error("role {0} cannot be granted to the wildcard identity")]
    WildcardNotPermitted(Role),
}
