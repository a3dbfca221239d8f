use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use asreg_contract::{ContractConfig, Entrypoint, Host, Registry, TxReceipt};
use asreg_store::FileKvStore;
use asreg_types::TxTimestamp;
use colored::Colorize;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;
    let state = cli.state.unwrap_or(config.state_path);
    let host = open_host(&state, config.contract)?;
    let format = cli.format;
    let timestamp = cli.timestamp;

    match cli.command {
        Command::Init(args) => {
            let receipt = host.init(&[args.seed], resolve_timestamp(timestamp)?)?;
            print_receipt("init", &receipt, &format)
        }
        Command::Invoke(call) => {
            let receipt = host.execute(
                Entrypoint::Invoke,
                &call.function,
                &call.args,
                resolve_timestamp(timestamp)?,
            )?;
            print_receipt(&call.function, &receipt, &format)
        }
        Command::Query(call) => cmd_query(&host, call, &format),
        Command::Items => cmd_items(&host, &format),
        Command::Audit => cmd_audit(&host, &format),
    }
}

fn open_host(state: &Path, contract: ContractConfig) -> anyhow::Result<Host<FileKvStore>> {
    let backend = FileKvStore::open(state)
        .with_context(|| format!("opening ledger {}", state.display()))?;
    Ok(Host::new(backend, Registry::new(contract)))
}

fn resolve_timestamp(explicit: Option<i64>) -> anyhow::Result<TxTimestamp> {
    if let Some(millis) = explicit {
        return Ok(TxTimestamp::from_millis(millis));
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    let millis = i64::try_from(elapsed.as_millis()).context("system clock out of range")?;
    Ok(TxTimestamp::from_millis(millis))
}

fn print_receipt(function: &str, receipt: &TxReceipt, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "function": function,
                "writes": receipt.writes.len(),
                "digest": receipt.write_set_digest,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{} {} committed", "✓".green().bold(), function.bold());
            println!("  Writes: {}", receipt.writes.len());
            println!("  Digest: {}", receipt.write_set_digest.dimmed());
        }
    }
    Ok(())
}

fn cmd_query(host: &Host<FileKvStore>, call: CallArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let output = host.query(&call.function, &call.args)?;
    let text = String::from_utf8_lossy(&output);
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "value": text })),
        OutputFormat::Text => println!("{text}"),
    }
    Ok(())
}

fn cmd_items(host: &Host<FileKvStore>, format: &OutputFormat) -> anyhow::Result<()> {
    let items = host.list_items()?;
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }
    for item in &items {
        println!(
            "{}  {}  owner {}  price {}",
            item.id.as_str().yellow().bold(),
            item.name,
            item.owner.cyan(),
            item.price
        );
        for note in item.review_notes(host.registry().config().review_separator) {
            println!("    {} {}", "repair:".dimmed(), note);
        }
    }
    Ok(())
}

fn cmd_audit(host: &Host<FileKvStore>, format: &OutputFormat) -> anyhow::Result<()> {
    let report = host.audit()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!(
                "Items: {}  Indexed: {}",
                report.item_count.to_string().bold(),
                report.indexed_count.to_string().bold()
            );
            for v in &report.violations {
                println!("  {} {:?} {}: {}", "✗".red(), v.kind, v.key.yellow(), v.description);
            }
        }
    }
    if !report.is_valid() {
        anyhow::bail!("audit found {} violation(s)", report.violations.len());
    }
    if let OutputFormat::Text = format {
        println!("{} Registry consistent", "✓".green().bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_timestamp_wins() {
        assert_eq!(resolve_timestamp(Some(5)).unwrap(), TxTimestamp::from_millis(5));
        assert!(resolve_timestamp(None).unwrap().as_millis() > 0);
    }

    #[test]
    fn state_survives_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let ts = TxTimestamp::from_millis(1_700_000_000_000);

        let host = open_host(&state, ContractConfig::default()).unwrap();
        host.invoke("init_item", &args(&["A1", "Phone", "alice", "499", "0"]), ts)
            .unwrap();
        drop(host);

        let host = open_host(&state, ContractConfig::default()).unwrap();
        let items = host.list_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].purchase_date, 1_700_000_000_000);
        assert!(cmd_audit(&host, &OutputFormat::Text).is_ok());
    }

    #[test]
    fn audit_fails_on_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let ts = TxTimestamp::from_millis(1);
        let host = open_host(&state, ContractConfig::default()).unwrap();
        host.invoke("init_item", &args(&["a1", "pen", "dan", "1", "0"]), ts)
            .unwrap();
        host.init(&args(&["0"]), ts).unwrap();
        assert!(cmd_audit(&host, &OutputFormat::Json).is_err());
    }
}
