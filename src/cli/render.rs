//! Render the upload control for one element.
//!
//! Prints the HTML the question panel would show. Outside the question panel
//! nothing is printed.

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, ElementArgs};
use crate::element;
use crate::templating::TemplateRenderer;

/// Render the upload control HTML
#[derive(Args, Debug)]
pub struct RenderCommand {
    #[command(flatten)]
    pub input: ElementArgs,
}

impl RenderCommand {
    pub async fn run(&self, ctx: &CommandContext) -> Result<String> {
        let html = self.input.read_element().await?;
        let data = self.input.read_data().await?;
        let renderer = TemplateRenderer::from_settings(&ctx.settings).await?;

        element::render(&html, &data, &ctx.settings, &renderer)
    }

    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let html = self.run(ctx).await?;
        if !html.is_empty() {
            println!("{html}");
        }
        Ok(())
    }
}
