//! Registry commands.
//!
//! A request arrives as a function name plus a string argument vector. It is
//! turned into a [`Command`] before anything touches the ledger, so arity and
//! value checks live next to the variant they guard.

use std::fmt;

use asreg_types::{fold_field, parse_non_negative, ItemId};

use crate::config::ContractConfig;
use crate::error::{ContractError, ContractResult};

/// How many arguments a verb accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn check(self, verb: Verb, args: &[String]) -> ContractResult<()> {
        let ok = match self {
            Self::Exactly(n) => args.len() == n,
            Self::AtLeast(n) => args.len() >= n,
        };
        if ok {
            Ok(())
        } else {
            Err(ContractError::BadArity {
                verb: verb.as_str(),
                expected: self,
                actual: args.len(),
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// The three host-facing entrypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entrypoint {
    /// Deploy-time initialisation. Always runs `init`.
    Init,
    /// State-changing calls.
    Invoke,
    /// Read-only calls.
    Query,
}

impl Entrypoint {
    /// Whether this entrypoint may run `verb`.
    pub fn accepts(&self, verb: Verb) -> bool {
        match self {
            Self::Init => verb == Verb::Init,
            Self::Invoke => verb != Verb::Read,
            Self::Query => verb == Verb::Read,
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Invoke => "invoke",
            Self::Query => "query",
        })
    }
}

/// Every function name the registry understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Init,
    Write,
    Read,
    Delete,
    InitItem,
    SetUser,
    RepairItem,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Init,
        Verb::Write,
        Verb::Read,
        Verb::Delete,
        Verb::InitItem,
        Verb::SetUser,
        Verb::RepairItem,
    ];

    /// Look up a verb by its function name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Write => "write",
            Self::Read => "read",
            Self::Delete => "delete",
            Self::InitItem => "init_item",
            Self::SetUser => "set_user",
            Self::RepairItem => "repair_item",
        }
    }

    /// Accepted argument count.
    pub fn arity(&self) -> Arity {
        match self {
            Self::Init | Self::Read | Self::Delete => Arity::Exactly(1),
            Self::Write | Self::RepairItem => Arity::Exactly(2),
            Self::SetUser => Arity::Exactly(3),
            Self::InitItem => Arity::AtLeast(5),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated arguments of `init_item`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
    pub owner: String,
    pub price: i64,
    pub warranty_validity: i64,
}

/// A validated registry command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Store the seed under `abc` and reset the index.
    Init { seed: i64 },
    /// Raw write; does not touch the index.
    Write { key: String, value: Vec<u8> },
    /// Raw read.
    Read { key: String },
    /// Remove an item and its index entry. Idempotent.
    Delete { id: ItemId },
    /// Create an item.
    InitItem(NewItem),
    /// Transfer an item to a new owner at a new price.
    SetUser {
        id: ItemId,
        owner: String,
        price: i64,
    },
    /// Append a review note to an item.
    RepairItem { id: ItemId, note: String },
}

impl Command {
    /// Validate `args` for `verb`.
    pub fn parse(verb: Verb, args: &[String], config: &ContractConfig) -> ContractResult<Self> {
        verb.arity().check(verb, args)?;
        match verb {
            Verb::Init => Self::init(&args[0]),
            Verb::Write => Ok(Self::Write {
                key: args[0].clone(),
                value: args[1].clone().into_bytes(),
            }),
            Verb::Read => Ok(Self::Read {
                key: args[0].clone(),
            }),
            Verb::Delete => Ok(Self::Delete {
                id: ItemId::fold(&args[0]),
            }),
            Verb::InitItem => Self::init_item(&args[0], &args[1], &args[2], &args[3], &args[4]),
            Verb::SetUser => Self::set_user(&args[0], &args[1], &args[2], config),
            Verb::RepairItem => Ok(Self::RepairItem {
                id: ItemId::fold(&args[0]),
                note: args[1].clone(),
            }),
        }
    }

    fn init(seed: &str) -> ContractResult<Self> {
        let seed = seed.parse().map_err(|_| ContractError::BadInteger {
            field: "seed",
            value: seed.to_string(),
        })?;
        Ok(Self::Init { seed })
    }

    fn init_item(
        id: &str,
        name: &str,
        owner: &str,
        price: &str,
        warranty: &str,
    ) -> ContractResult<Self> {
        let id = ItemId::parse(id)?;
        let name = fold_field("name", name)?;
        let owner = fold_field("owner", owner)?;
        let price = parse_non_negative("price", price)?;
        let warranty_validity = parse_non_negative("warranty", warranty)?;
        Ok(Self::InitItem(NewItem {
            id,
            name,
            owner,
            price,
            warranty_validity,
        }))
    }

    fn set_user(
        id: &str,
        owner: &str,
        price: &str,
        config: &ContractConfig,
    ) -> ContractResult<Self> {
        let owner = if config.fold_transferred_owner {
            owner.to_lowercase()
        } else {
            owner.to_string()
        };
        if owner.is_empty() {
            return Err(ContractError::EmptyField { field: "owner" });
        }
        Ok(Self::SetUser {
            id: ItemId::fold(id),
            owner,
            price: parse_non_negative("price", price)?,
        })
    }

    /// The verb this command was parsed from.
    pub fn verb(&self) -> Verb {
        match self {
            Self::Init { .. } => Verb::Init,
            Self::Write { .. } => Verb::Write,
            Self::Read { .. } => Verb::Read,
            Self::Delete { .. } => Verb::Delete,
            Self::InitItem(_) => Verb::InitItem,
            Self::SetUser { .. } => Verb::SetUser,
            Self::RepairItem { .. } => Verb::RepairItem,
        }
    }
}
