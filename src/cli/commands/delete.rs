//! Delete command - remove an index directory

use crate::cli::output::{colors, print_structured};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::storage::IndexStore;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Directory of the index to delete
    pub index_path: PathBuf,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Execute the delete command
pub fn execute(
    args: DeleteArgs,
    _services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.index_path.exists() {
        return Err(format!(
            "Index '{}' not found.",
            args.index_path.display()
        )
        .into());
    }

    // Confirmation prompt unless --yes
    if !args.yes {
        print!(
            "Delete index '{}'? [y/N] ",
            colors::file_path(&args.index_path.display().to_string())
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    IndexStore::destroy(&args.index_path)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} index '{}'",
                colors::success("Deleted"),
                colors::file_path(&args.index_path.display().to_string())
            );
        }
        OutputFormat::Json | OutputFormat::Xml => {
            let response = serde_json::json!({
                "deleted": true,
                "index": args.index_path.display().to_string(),
            });
            print_structured(&response, format)?;
        }
    }

    Ok(())
}
