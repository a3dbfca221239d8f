//! Asset registry contract.
//!
//! A deterministic state machine over a host ledger. Requests arrive as a
//! function name plus string arguments through one of three entrypoints
//! (`init`, `invoke`, `query`), are validated into a [`Command`] and applied
//! by [`Registry::apply`] through a [`KvFacade`](asreg_store::KvFacade).
//!
//! Handlers read committed state only and never rely on their own pending
//! writes. Every error maps onto an [`ErrorKind`] whose tag prefixes the
//! message returned to the host.
//!
//! # Key Types
//!
//! - [`Registry`] -- entrypoints and the transition function
//! - [`Command`] -- validated request, one variant per verb
//! - [`Host`] -- execute-then-commit harness over a [`KvBackend`](asreg_store::KvBackend)
//! - [`RegistryAuditor`] -- record/index consistency checks
//! - [`ContractConfig`] -- behavioural switches

pub mod audit;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod registry;

pub use audit::{AuditReport, RegistryAuditor, Violation, ViolationKind};
pub use command::{Arity, Command, Entrypoint, NewItem, Verb};
pub use config::ContractConfig;
pub use error::{ContractError, ContractResult, ErrorKind};
pub use host::{Host, TxReceipt};
pub use registry::{Registry, TxContext};
