//! Explains a tiered-discount decision using the `If/elif_/else_` state
//! machine: which purchase-amount bracket fired, and why the others didn't.

use auditree::prelude::*;

/// `if total >= 1000 { 0.20 } elif total >= 500 { 0.10 } elif total >= 100 {
/// 0.05 } else { 0.0 }`, built left-to-right through the typed conditional
/// grammar.
fn discount_for(total: f64) -> Expr {
    let amount = float(Binding::named("total", total)).unwrap();

    let tier1 = amount.clone().gte(Binding::named("gold_threshold", 1000.0)).unwrap();
    let tier2 = amount.clone().gte(Binding::named("silver_threshold", 500.0)).unwrap();
    let tier3 = amount.gte(Binding::named("bronze_threshold", 100.0)).unwrap();

    if_(tier1)
        .unwrap()
        .then(float(Binding::named("gold_rate", 0.20)).unwrap())
        .elif_(tier2)
        .unwrap()
        .then(float(Binding::named("silver_rate", 0.10)).unwrap())
        .elif_(tier3)
        .unwrap()
        .then(float(Binding::named("bronze_rate", 0.05)).unwrap())
        .else_(float(Binding::named("no_rate", 0.0)).unwrap())
}

fn main() {
    for total in [1500.0, 750.0, 250.0, 40.0] {
        let decision = discount_for(total);
        let simplified = simplify(decision.node());
        println!("${total:>7.2}: {}", render(&simplified));
    }
}
