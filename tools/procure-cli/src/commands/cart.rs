//! Cart commands.

use anyhow::{Context as _, Result};
use procure_commerce::cart::{CartHandle, CartSnapshot, PersistenceStatus};
use procure_commerce::catalog::Price;
use procure_commerce::ProductSlug;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::persistence_badge;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.cart()?;

    let snapshot = match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => cart.snapshot(),
        CartCommand::Add { slug, quantity } => add(&cart, &slug, quantity, ctx)?,
        CartCommand::Remove { slug } => remove(&cart, &slug, ctx),
        CartCommand::Set { slug, quantity } => set(&cart, &slug, quantity, ctx)?,
        CartCommand::Clear => {
            let snapshot = cart.clear();
            ctx.output.success("Cart cleared");
            snapshot
        }
    };

    print_cart(&snapshot, ctx);
    Ok(())
}

fn add(cart: &CartHandle, slug: &str, quantity: i64, ctx: &Context) -> Result<CartSnapshot> {
    let product = ProductSlug::new(slug);
    let snapshot = cart
        .add_item(&product, quantity)
        .with_context(|| format!("Could not add '{}'", slug))?;

    ctx.output.success(&format!(
        "Added {} x {} (now {})",
        quantity,
        slug,
        snapshot.quantity_of(&product)
    ));
    Ok(snapshot)
}

fn remove(cart: &CartHandle, slug: &str, ctx: &Context) -> CartSnapshot {
    let product = ProductSlug::new(slug);
    let had_item = cart.snapshot().quantity_of(&product) > 0;
    let snapshot = cart.remove_item(&product);

    if had_item {
        ctx.output.success(&format!("Removed {}", slug));
    } else {
        ctx.output.info(&format!("'{}' was not in the cart", slug));
    }
    snapshot
}

fn set(cart: &CartHandle, slug: &str, quantity: i64, ctx: &Context) -> Result<CartSnapshot> {
    let product = ProductSlug::new(slug);
    let snapshot = cart
        .set_quantity(&product, quantity)
        .with_context(|| format!("Could not set quantity of '{}'", slug))?;

    if quantity == 0 {
        ctx.output.success(&format!("Removed {}", slug));
    } else {
        ctx.output.success(&format!("Set {} to {}", slug, quantity));
    }
    Ok(snapshot)
}

fn print_cart(snapshot: &CartSnapshot, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(snapshot);
        return;
    }

    ctx.output.header("Cart");

    if snapshot.is_empty() {
        ctx.output.info("Your cart is empty.");
    } else {
        let widths = [28, 32, 6, 14];
        ctx.output.table_row(&["PRODUCT", "NAME", "QTY", "UNIT PRICE"], &widths);
        for item in &snapshot.items {
            let price = match item.unit_price {
                Some(Price::Fixed { amount }) => amount.display(),
                Some(Price::OnRequest) | None => "Request Quote".to_string(),
            };
            ctx.output.table_row(
                &[
                    item.product.as_str(),
                    &item.name,
                    &item.quantity.to_string(),
                    &price,
                ],
                &widths,
            );
        }
    }

    let totals = &snapshot.totals;
    println!();
    ctx.output.kv("Items", &totals.total_items.to_string());
    ctx.output.kv("Products", &totals.unique_items.to_string());
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    if totals.has_quote_items() {
        let slugs: Vec<&str> = totals.quote_required.iter().map(|s| s.as_str()).collect();
        ctx.output.kv("Quote required", &slugs.join(", "));
    }
    ctx.output.kv("Storage", &persistence_badge(&snapshot.persistence));

    if let PersistenceStatus::Degraded { reason } = &snapshot.persistence {
        ctx.output
            .warn(&format!("Cart changes were not saved and will be lost on exit: {}", reason));
    }
}
