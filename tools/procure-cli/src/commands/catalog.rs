//! Catalog commands.

use anyhow::{bail, Result};
use procure_commerce::catalog::{ProductCatalog, StockStatus};

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CatalogCommand::List { stock: None }) {
        CatalogCommand::List { stock } => {
            let stock = stock.as_deref().map(parse_stock).transpose()?;
            list_products(stock, ctx)
        }
    }
}

fn parse_stock(value: &str) -> Result<StockStatus> {
    match StockStatus::from_str(value) {
        Some(status) => Ok(status),
        None => {
            let valid: Vec<&str> = StockStatus::ALL.iter().map(|s| s.as_str()).collect();
            bail!("Unknown stock status '{}' (expected one of: {})", value, valid.join(", "))
        }
    }
}

fn list_products(stock: Option<StockStatus>, ctx: &Context) -> Result<()> {
    let mut products = ctx.catalog()?.products();
    if let Some(status) = stock {
        products.retain(|p| p.stock_status == status);
    }

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Catalog");

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    let widths = [28, 20, 32, 14, 12];
    ctx.output.table_row(
        &["SLUG", "PART NUMBER", "NAME", "PRICE", "STOCK"],
        &widths,
    );

    for product in &products {
        let price = product
            .price
            .amount()
            .map(|amount| amount.display())
            .unwrap_or_else(|| "On request".to_string());
        ctx.output.table_row(
            &[
                product.slug.as_str(),
                product.part_number.as_str(),
                &product.name,
                &price,
                &stock_badge(product.stock_status),
            ],
            &widths,
        );
    }

    ctx.output.info(&format!("Total: {} product(s)", products.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("on-request").unwrap(), StockStatus::OnRequest);
        assert_eq!(parse_stock("In-Stock").unwrap(), StockStatus::InStock);

        let err = parse_stock("discontinued").unwrap_err().to_string();
        assert!(err.contains("in-stock, on-request, out-of-stock"));
    }
}
