//! Line-item updates shared by both container collections.
//!
//! Every write touches one document and carries the occupied-total deltas in
//! the same update, so a line and its totals can never drift apart.

use chrono::Utc;
use database::mongodb::{id_filter, uuid_to_bson};
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::Collection;
use uuid::Uuid;

use crate::models::Load;

/// Names of the occupied-total fields in a container document
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadFields {
    pub capacity: &'static str,
    pub volume: &'static str,
    pub cost: &'static str,
}

fn now() -> Bson {
    to_bson(&Utc::now()).unwrap_or(Bson::Null)
}

fn load_inc(fields: LoadFields, load: Load) -> Document {
    let mut inc = Document::new();
    inc.insert(fields.capacity, load.weight);
    inc.insert(fields.volume, load.volume);
    inc.insert(fields.cost, load.cost);
    inc
}

/// `$inc` of an existing line plus the totals
pub(crate) fn increment_line(fields: LoadFields, quantity: i64, load: Load) -> Document {
    let mut inc = load_inc(fields, load);
    inc.insert("products.$.quantity", quantity);
    doc! { "$inc": inc, "$set": { "updated_at": now() } }
}

/// `$push` of a new line plus the totals
pub(crate) fn push_line(fields: LoadFields, product: &Uuid, quantity: i64, load: Load) -> Document {
    doc! {
        "$push": { "products": { "product": uuid_to_bson(product), "quantity": quantity } },
        "$inc": load_inc(fields, load),
        "$set": { "updated_at": now() },
    }
}

/// `$pull` of the whole line minus the totals
pub(crate) fn pull_line(fields: LoadFields, product: &Uuid, load: Load) -> Document {
    doc! {
        "$pull": { "products": { "product": uuid_to_bson(product) } },
        "$inc": load_inc(fields, load.negated()),
        "$set": { "updated_at": now() },
    }
}

fn with_line(id: &Uuid, product: &Uuid) -> Document {
    let mut filter = id_filter(id);
    filter.insert("products.product", uuid_to_bson(product));
    filter
}

fn without_line(id: &Uuid, product: &Uuid) -> Document {
    let mut filter = id_filter(id);
    filter.insert("products.product", doc! { "$ne": uuid_to_bson(product) });
    filter
}

fn line_above(id: &Uuid, product: &Uuid, quantity: i64) -> Document {
    let mut filter = id_filter(id);
    filter.insert(
        "products",
        doc! { "$elemMatch": { "product": uuid_to_bson(product), "quantity": { "$gt": quantity } } },
    );
    filter
}

/// Increments the product's line, or pushes a new one. False when the container is missing.
pub(crate) async fn deposit<T: Send + Sync>(
    collection: &Collection<T>,
    fields: LoadFields,
    id: Uuid,
    product: Uuid,
    quantity: i64,
    load: Load,
) -> mongodb::error::Result<bool> {
    let increment = increment_line(fields, quantity, load);

    let result = collection
        .update_one(with_line(&id, &product), increment.clone())
        .await?;
    if result.matched_count > 0 {
        return Ok(true);
    }

    let result = collection
        .update_one(without_line(&id, &product), push_line(fields, &product, quantity, load))
        .await?;
    if result.matched_count > 0 {
        return Ok(true);
    }

    // A concurrent deposit pushed the line between the two attempts.
    let result = collection
        .update_one(with_line(&id, &product), increment)
        .await?;
    Ok(result.matched_count > 0)
}

/// Decrements the product's line, or pulls it once `quantity` covers it.
/// False when the container or the line is missing.
pub(crate) async fn withdraw<T: Send + Sync>(
    collection: &Collection<T>,
    fields: LoadFields,
    id: Uuid,
    product: Uuid,
    quantity: i64,
    load: Load,
) -> mongodb::error::Result<bool> {
    let result = collection
        .update_one(
            line_above(&id, &product, quantity),
            increment_line(fields, -quantity, load.negated()),
        )
        .await?;
    if result.matched_count > 0 {
        return Ok(true);
    }

    let result = collection
        .update_one(with_line(&id, &product), pull_line(fields, &product, load))
        .await?;
    Ok(result.matched_count > 0)
}
