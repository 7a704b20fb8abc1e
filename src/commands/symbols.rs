use anyhow::Result;
use tracing::info;

use crate::cli::SymbolsArgs;
use crate::commands::extract::SymbolTable;
use crate::util::write_json_pretty;

/// Writes the built-in symbol table so it can be edited and passed back with
/// `extract --symbols`.
pub fn run(args: SymbolsArgs) -> Result<()> {
    let table = SymbolTable::builtin();
    write_json_pretty(&args.output, table.entries())?;

    info!(
        path = %args.output.display(),
        entries = table.len(),
        "wrote symbol table"
    );

    Ok(())
}
