//! Tests for listing module - oracle file and location listings.

use omni_repair::{LocationDescriptor, parse_file_listing, parse_location_listing};
use omni_types::Symbol;

#[test]
fn test_file_listing_from_prose() {
    let text = "The bug is in the cart module.\n\n```\napp/cart.py\napp/tax.py\n\napp/cart.py\n```\n\nAlso see ```docs```.";
    assert_eq!(parse_file_listing(text), vec!["app/cart.py", "app/tax.py"]);
}

#[test]
fn test_file_listing_without_fence_is_empty() {
    assert!(parse_file_listing("app/cart.py\napp/tax.py").is_empty());
}

#[test]
fn test_location_listing_groups_by_file() {
    let text = "```\napp/cart.py\nfunction: total\nfunction: Cart.add\nclass: Cart\n\napp/tax.py\nvariable: RATES\nline: 24\n```";
    let files = parse_location_listing(text);

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file, "app/cart.py");
    assert_eq!(
        files[0].descriptors,
        vec![
            LocationDescriptor::Symbol(Symbol::function("total")),
            LocationDescriptor::Symbol(Symbol::function("Cart.add")),
            LocationDescriptor::Symbol(Symbol::class("Cart")),
        ]
    );
    assert_eq!(files[1].file, "app/tax.py");
    assert_eq!(
        files[1].descriptors,
        vec![
            LocationDescriptor::Symbol(Symbol::variable("RATES")),
            LocationDescriptor::Line(24),
        ]
    );
}

#[test]
fn test_location_listing_skips_noise() {
    let text = "```text\nfunction: orphan\napp/cart.py\nmodule: cart\nline: twelve\nmethod: Cart.add\napp/cart.py\nline: 3\n```";
    let files = parse_location_listing(text);

    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].descriptors,
        vec![
            LocationDescriptor::Symbol(Symbol::function("Cart.add")),
            LocationDescriptor::Line(3),
        ]
    );
}

#[test]
fn test_file_with_no_entries_is_kept_empty() {
    let files = parse_location_listing("```\napp/cart.py\n```");
    assert_eq!(files.len(), 1);
    assert!(files[0].descriptors.is_empty());
}
