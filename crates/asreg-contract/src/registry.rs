//! The registry state machine.
//!
//! [`Registry::apply`] is the single transition function: given a ledger
//! facade, the transaction context and a validated [`Command`], it issues the
//! writes for that command and returns the bytes handed back to the host.
//! The entrypoints resolve a function name to a [`Command`] first.

use asreg_codec::{ItemCodec, RecordForm};
use asreg_index::ItemIndex;
use asreg_store::KvFacade;
use asreg_types::{item_key, Item, ItemId, TxTimestamp, SEED_KEY};

use crate::command::{Command, Entrypoint, NewItem, Verb};
use crate::config::ContractConfig;
use crate::error::{ContractError, ContractResult};

/// Host-supplied facts about the running transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Identical on every replica executing the transaction.
    pub timestamp: TxTimestamp,
}

impl TxContext {
    pub fn new(timestamp: TxTimestamp) -> Self {
        Self { timestamp }
    }
}

/// The asset registry contract.
///
/// Holds configuration only. All state lives in the ledger behind the
/// [`KvFacade`] passed to each call.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    config: ContractConfig,
}

impl Registry {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Deploy-time entrypoint. The function name is ignored; this always
    /// runs `init`.
    pub fn init(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        self.dispatch(kv, ctx, Entrypoint::Init, function, args)
    }

    /// State-changing entrypoint. Accepts every verb except `read`.
    pub fn invoke(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        self.dispatch(kv, ctx, Entrypoint::Invoke, function, args)
    }

    /// Read-only entrypoint. Accepts `read` only.
    pub fn query(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        self.dispatch(kv, ctx, Entrypoint::Query, function, args)
    }

    /// Older hosts call `run`; it behaves exactly like [`Registry::invoke`].
    pub fn run(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        self.invoke(kv, ctx, function, args)
    }

    /// Resolve `function` for `entry`, validate `args` and apply the result.
    pub fn dispatch(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        entry: Entrypoint,
        function: &str,
        args: &[String],
    ) -> ContractResult<Vec<u8>> {
        tracing::debug!(%entry, function, args = args.len(), "dispatching");
        let result = Self::resolve(entry, function)
            .and_then(|verb| Command::parse(verb, args, &self.config))
            .and_then(|cmd| self.apply(kv, ctx, cmd));
        match &result {
            Ok(output) => tracing::debug!(%entry, function, output = output.len(), "completed"),
            Err(err) => tracing::warn!(%entry, function, kind = %err.kind(), %err, "rejected"),
        }
        result
    }

    fn resolve(entry: Entrypoint, function: &str) -> ContractResult<Verb> {
        if entry == Entrypoint::Init {
            return Ok(Verb::Init);
        }
        Verb::from_name(function)
            .filter(|verb| entry.accepts(*verb))
            .ok_or_else(|| ContractError::UnknownVerb {
                entrypoint: entry,
                verb: function.to_string(),
            })
    }

    /// Apply one validated command. Returns the output bytes, which are
    /// empty for everything but `read`.
    pub fn apply(
        &self,
        kv: &mut dyn KvFacade,
        ctx: &TxContext,
        cmd: Command,
    ) -> ContractResult<Vec<u8>> {
        tracing::debug!(verb = %cmd.verb(), ts = %ctx.timestamp, "applying");
        match cmd {
            Command::Init { seed } => {
                kv.put(SEED_KEY, seed.to_string().into_bytes())?;
                ItemIndex::new(kv).reset()?;
            }
            Command::Write { key, value } => kv.put(&key, value)?,
            Command::Read { key } => {
                return kv.get(&key)?.ok_or(ContractError::NotFound { key });
            }
            Command::Delete { id } => {
                kv.delete(&item_key(&id))?;
                ItemIndex::new(kv).remove(&id)?;
            }
            Command::InitItem(new) => self.init_item(kv, ctx, new)?,
            Command::SetUser { id, owner, price } => {
                let mut item = self.load_item(kv, &id)?;
                item.transfer(owner, price);
                self.store_item(kv, &id, &item)?;
            }
            Command::RepairItem { id, note } => {
                let mut item = self.load_item(kv, &id)?;
                item.append_review(self.config.review_separator, &note);
                self.store_item(kv, &id, &item)?;
            }
        }
        Ok(Vec::new())
    }

    fn init_item(&self, kv: &mut dyn KvFacade, ctx: &TxContext, new: NewItem) -> ContractResult<()> {
        // Any record at the key blocks creation, decodable or not.
        if kv.get(&item_key(&new.id))?.is_some() {
            return Err(ContractError::DuplicateId(new.id));
        }
        let item = Item::new(
            new.id,
            new.name,
            new.owner,
            new.price,
            ctx.timestamp,
            new.warranty_validity,
        );
        self.store_item(kv, &item.id, &item)?;
        ItemIndex::new(kv).append(&item.id)?;
        Ok(())
    }

    fn load_item(&self, kv: &dyn KvFacade, id: &ItemId) -> ContractResult<Item> {
        let key = item_key(id);
        let bytes = kv.get(&key)?.ok_or(ContractError::NotFound { key })?;
        let decoded = ItemCodec::decode_with_form(&bytes)?;
        if decoded.form == RecordForm::Legacy {
            tracing::warn!(%id, "legacy item record will be rewritten in canonical form");
        }
        Ok(decoded.item)
    }

    fn store_item(&self, kv: &mut dyn KvFacade, id: &ItemId, item: &Item) -> ContractResult<()> {
        kv.put(&item_key(id), ItemCodec::encode(item)?)?;
        Ok(())
    }

    /// Decode every indexed item, in index order.
    ///
    /// An indexed id without a record is reported as `NOT_FOUND`.
    pub fn list_items(&self, kv: &mut dyn KvFacade) -> ContractResult<Vec<Item>> {
        let ids = ItemIndex::new(&mut *kv).load()?;
        ids.iter().map(|id| self.load_item(kv, id)).collect()
    }
}
