//! Run the `parse` phase for one element.
//!
//! Reconciles the submitted fields in the question data and prints the updated
//! data: the answer under the element's file name and any defects on the
//! configured error channel.
//!
//! ```bash
//! csvmap parse --element question.html --data submitted.json
//! csvmap parse --element question.html --data submitted.json --strict
//! ```

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, ElementArgs, to_json_output};
use crate::core::CsvMapError;
use crate::element::{self, ParseState, Reconciliation};

/// Reconcile a submission and print the updated question data
#[derive(Args, Debug)]
pub struct ParseCommand {
    #[command(flatten)]
    pub input: ElementArgs,

    /// Exit with an error when the submission has defects
    #[arg(long)]
    pub strict: bool,
}

impl ParseCommand {
    /// Updated question data as pretty JSON, plus the reconciliation outcome.
    pub async fn run(&self, ctx: &CommandContext) -> Result<(String, Reconciliation)> {
        let html = self.input.read_element().await?;
        let mut data = self.input.read_data().await?;

        let outcome = element::parse(&html, &mut data, &ctx.settings)?;
        match outcome.state {
            ParseState::Success => tracing::info!("Submission accepted"),
            ParseState::AlreadyProcessed => tracing::info!("Submission was already reconciled"),
            ParseState::Failed => {
                tracing::info!("Submission has {} defect(s)", outcome.errors.len());
            }
        }

        Ok((to_json_output(&data)?, outcome))
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let (output, outcome) = self.run(ctx).await?;
        println!("{output}");

        if self.strict && outcome.state == ParseState::Failed {
            let messages: Vec<String> = outcome.errors.iter().map(ToString::to_string).collect();
            return Err(CsvMapError::Other {
                message: format!("Submission rejected:\n  {}", messages.join("\n  ")),
            }
            .into());
        }
        Ok(())
    }
}
