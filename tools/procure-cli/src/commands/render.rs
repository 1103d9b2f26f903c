//! Render views to HTML.

use anyhow::{bail, Result};
use procure_commerce::catalog::ProductCatalog;
use procure_commerce::ProductSlug;
use procure_views::{Header, ProductCard};

use super::{RenderArgs, RenderCommand};
use crate::context::Context;

/// Run the render command.
pub fn run(args: RenderArgs, ctx: &Context) -> Result<()> {
    let html = match args.command {
        RenderCommand::Header { path } => Header::new(ctx.cart()?, path).render(),
        RenderCommand::Card { slug } => render_card(&slug, ctx)?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "html": html }));
    } else {
        ctx.output.raw(&html);
    }
    Ok(())
}

fn render_card(slug: &str, ctx: &Context) -> Result<String> {
    let Some(product) = ctx.catalog()?.product(&ProductSlug::new(slug)) else {
        bail!("Product '{}' not found in catalog", slug);
    };
    Ok(ProductCard::new(product, ctx.cart()?).render())
}
