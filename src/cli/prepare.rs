//! Run the `prepare` phase for one element.
//!
//! Reads the element markup and (optionally) the question data, registers the
//! element's required columns with the page registry and prints the updated
//! question data.
//!
//! ```bash
//! csvmap prepare --element question.html --data data.json > data.json.new
//! ```

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, ElementArgs, to_json_output};
use crate::element;

/// Register an element's required columns in the question data
#[derive(Args, Debug)]
pub struct PrepareCommand {
    #[command(flatten)]
    pub input: ElementArgs,
}

impl PrepareCommand {
    /// Updated question data as pretty JSON.
    pub async fn run(&self, ctx: &CommandContext) -> Result<String> {
        let html = self.input.read_element().await?;
        let mut data = self.input.read_data().await?;

        let config = element::prepare(&html, &mut data, &ctx.settings)?;
        for duplicate in data.params.duplicate_file_names() {
            tracing::warn!("File name '{}' is declared by more than one upload element", duplicate);
        }
        tracing::info!("Prepared '{}' ({} required column(s))", config.file_name(), config.column_names().len());

        to_json_output(&data)
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        println!("{}", self.run(ctx).await?);
        Ok(())
    }
}
