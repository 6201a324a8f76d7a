use super::*;
use crate::error::CatalogError;

fn product_line(n: u32, title: &str) -> String {
    format!(
        r#"{{"id":"gid://shopify/Product/{n}","title":"{title}","vendor":"Acme","productType":"Widgets","updatedAt":"2026-02-01T10:00:00Z","featuredImage":{{"url":"https://cdn.example.com/{n}.png"}}}}"#
    )
}

fn variant_line(n: u32, parent: u32, sku: &str, barcode: &str, item: u32) -> String {
    format!(
        r#"{{"id":"gid://shopify/ProductVariant/{n}","__parentId":"gid://shopify/Product/{parent}","title":"Default","sku":"{sku}","barcode":"{barcode}","inventoryQuantity":7,"inventoryItem":{{"id":"gid://shopify/InventoryItem/{item}"}}}}"#
    )
}

fn inventory_level_line(n: u32, item: u32, committed: i32) -> String {
    format!(
        r#"{{"id":"gid://shopify/InventoryLevel/{n}","__parentId":"gid://shopify/InventoryItem/{item}","quantities":[{{"name":"committed","quantity":{committed}}}]}}"#
    )
}

#[test]
fn reconstructs_one_product_with_variant_and_committed_inventory() {
    let stream = [
        product_line(1, "P1"),
        variant_line(1, 1, "ABC", "123", 1),
        inventory_level_line(1, 1, 3),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");

    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.shopify_id, "gid://shopify/Product/1");
    assert_eq!(product.title, "P1");
    assert_eq!(product.image_url, "https://cdn.example.com/1.png");
    assert_eq!(product.variants.len(), 1);

    let variant = &product.variants[0];
    assert_eq!(variant.sku, "ABC");
    assert_eq!(variant.barcode, "123");
    assert_eq!(variant.inventory_quantity, 7);
    assert_eq!(variant.committed_inventory, 3);
    assert_eq!(variant.parent_id, "gid://shopify/Product/1");
}

#[test]
fn stream_order_does_not_matter_for_assembly() {
    // Children before their parents: the arena pass must still link them.
    let stream = [
        inventory_level_line(1, 1, 2),
        variant_line(1, 1, "ABC", "123", 1),
        inventory_level_line(2, 1, 5),
        product_line(1, "P1"),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variants[0].committed_inventory, 7);
}

#[test]
fn committed_aggregation_is_order_independent() {
    let forward = [
        product_line(1, "P1"),
        variant_line(1, 1, "ABC", "", 1),
        inventory_level_line(1, 1, 1),
        inventory_level_line(2, 1, 4),
        inventory_level_line(3, 1, 2),
    ]
    .join("\n");
    let reversed = [
        inventory_level_line(3, 1, 2),
        inventory_level_line(2, 1, 4),
        inventory_level_line(1, 1, 1),
        variant_line(1, 1, "ABC", "", 1),
        product_line(1, "P1"),
    ]
    .join("\n");

    let a = parse_export(&forward).expect("forward parses");
    let b = parse_export(&reversed).expect("reversed parses");
    assert_eq!(a[0].variants[0].committed_inventory, 7);
    assert_eq!(b[0].variants[0].committed_inventory, 7);
}

#[test]
fn non_committed_quantities_are_ignored() {
    let stream = [
        product_line(1, "P1"),
        variant_line(1, 1, "ABC", "", 1),
        r#"{"id":"gid://shopify/InventoryLevel/1","__parentId":"gid://shopify/InventoryItem/1","quantities":[{"name":"available","quantity":50},{"name":"committed","quantity":3},{"name":"on_hand","quantity":60}]}"#.to_owned(),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products[0].variants[0].committed_inventory, 3);
}

#[test]
fn variant_with_unknown_parent_is_dropped_without_affecting_others() {
    let stream = [
        product_line(1, "P1"),
        variant_line(1, 1, "ABC", "123", 1),
        variant_line(2, 99, "ORPHAN", "", 2),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variants.len(), 1);
    assert_eq!(products[0].variants[0].sku, "ABC");
}

#[test]
fn zero_variant_product_gets_a_synthetic_placeholder() {
    let stream = product_line(1, "Bare");

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variants.len(), 1);

    let placeholder = &products[0].variants[0];
    assert_eq!(placeholder.sku, "");
    assert_eq!(placeholder.barcode, "");
    assert_eq!(placeholder.inventory_quantity, 0);
    assert_eq!(placeholder.committed_inventory, 0);
    assert_eq!(placeholder.parent_id, "gid://shopify/Product/1");
}

#[test]
fn variant_missing_sku_and_barcode_is_kept_with_empty_fields() {
    let stream = [
        product_line(1, "P1"),
        format!(
            r#"{{"id":"gid://shopify/ProductVariant/1","__parentId":"gid://shopify/Product/1","title":"Default","inventoryQuantity":2,"inventoryItem":{{"id":"gid://shopify/InventoryItem/1"}}}}"#
        ),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");
    let variant = &products[0].variants[0];
    assert_eq!(variant.sku, "");
    assert_eq!(variant.barcode, "");
    assert_eq!(variant.inventory_quantity, 2);
}

#[test]
fn first_seen_order_is_preserved_for_products_and_variants() {
    let stream = [
        product_line(2, "Second"),
        product_line(1, "First"),
        variant_line(3, 1, "B", "", 3),
        variant_line(2, 2, "C", "", 2),
        variant_line(1, 1, "A", "", 1),
    ]
    .join("\n");

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products[0].title, "Second");
    assert_eq!(products[1].title, "First");
    // Variants attach in first-seen order within their product.
    assert_eq!(products[1].variants[0].sku, "B");
    assert_eq!(products[1].variants[1].sku, "A");
    assert_eq!(products[0].variants[0].sku, "C");
}

#[test]
fn malformed_line_aborts_the_whole_parse() {
    let stream = [product_line(1, "P1"), "{not json".to_owned()].join("\n");

    let err = parse_export(&stream).expect_err("parse should fail");
    assert!(
        matches!(err, CatalogError::MalformedRecord { line: 2, .. }),
        "expected MalformedRecord on line 2, got {err:?}"
    );
}

#[test]
fn blank_lines_are_skipped() {
    let stream = format!("{}\n\n{}\n", product_line(1, "P1"), variant_line(1, 1, "ABC", "", 1));

    let products = parse_export(&stream).expect("stream should parse");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].variants.len(), 1);
}
