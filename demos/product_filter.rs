//! Explains why a product did or didn't match a tag-based filter, using
//! `lookup`/`uncertain_lookup` to pull per-product facts out of a catalog.

use auditree::prelude::*;

struct Catalog {
    tags: hashbrown::HashMap<i32, LookupMap>,
}

impl Catalog {
    fn facts_for(&self, product_id: i32) -> &LookupMap {
        self.tags.get(&product_id).expect("unknown product id")
    }
}

/// `(Red or Blue) and not Expensive`, explained in terms of one product's
/// facts.
fn matches_filter(facts: &LookupMap) -> Result<Expr, auditree::EvalError> {
    let red = lookup(facts, "red")?;
    let blue = lookup(facts, "blue")?;
    let expensive = uncertain_lookup(facts, "expensive", Value::Bool(false));
    let color_match = red.or_(blue)?;
    let not_expensive = not(expensive)?;
    color_match.and_(not_expensive)
}

fn main() {
    let mut tags = hashbrown::HashMap::new();
    for (id, red, blue, expensive) in [
        (1, true, false, true),
        (2, true, false, false),
        (3, false, true, false),
        (4, false, true, true),
        (5, false, false, false),
    ] {
        let mut facts = LookupMap::new();
        facts.insert("red".into(), Value::Bool(red));
        facts.insert("blue".into(), Value::Bool(blue));
        facts.insert("expensive".into(), Value::Bool(expensive));
        tags.insert(id, facts);
    }
    let catalog = Catalog { tags };

    let mut matching = Vec::new();
    for id in 1..=5 {
        let decision = matches_filter(catalog.facts_for(id)).unwrap();
        let simplified = simplify(decision.node());
        println!("product {id}: {}", render(&simplified));
        if matches!(decision.value(), Value::Bool(true)) {
            matching.push(id);
        }
    }

    println!("matching products: {matching:?}");
    assert_eq!(matching, vec![2, 3]);
}
