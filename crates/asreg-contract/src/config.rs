use serde::{Deserialize, Serialize};

/// Behavioural switches for the registry contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Lower-case the new owner on `set_user`, the way `init_item` folds the
    /// initial owner. Off by default: transfers store the owner verbatim.
    pub fold_transferred_owner: bool,
    /// Character placed before each note appended by `repair_item`.
    /// Notes are not escaped, so a note containing it reads back split.
    pub review_separator: char,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            fold_transferred_owner: false,
            review_separator: '^',
        }
    }
}

impl ContractConfig {
    /// Configuration that folds every owner it stores.
    pub fn folding() -> Self {
        Self {
            fold_transferred_owner: true,
            ..Default::default()
        }
    }
}
