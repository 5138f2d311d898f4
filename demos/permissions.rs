//! Explains, not just computes, a permission decision: why a user can or
//! cannot perform an action, in terms of the roles and flags that mattered.

use auditree::prelude::*;

struct User {
    name: &'static str,
    roles: &'static [&'static str],
    banned: bool,
    readonly: bool,
}

fn has_role(user: &User, role: &str) -> Expr {
    boolean(Binding::named(role, user.roles.contains(&role))).unwrap()
}

fn flag(name: &str, value: bool) -> Expr {
    boolean(Binding::named(name, value)).unwrap()
}

fn can_view(user: &User) -> Expr {
    let roles = any_of([
        has_role(user, "Admin"),
        has_role(user, "Editor"),
        has_role(user, "Viewer"),
    ])
    .unwrap();
    let not_banned = not(flag("Banned", user.banned)).unwrap();
    roles.and_(not_banned).unwrap()
}

fn can_edit(user: &User) -> Expr {
    let roles = any_of([has_role(user, "Admin"), has_role(user, "Editor")]).unwrap();
    let not_readonly = not(flag("ReadOnly", user.readonly)).unwrap();
    let not_banned = not(flag("Banned", user.banned)).unwrap();
    all_of([roles, not_readonly, not_banned]).unwrap()
}

fn can_delete(user: &User) -> Expr {
    let is_admin = has_role(user, "Admin");
    let not_banned = not(flag("Banned", user.banned)).unwrap();
    is_admin.and_(not_banned).unwrap()
}

fn explain(label: &str, decision: &Expr) {
    let simplified = simplify(decision.node());
    println!("  {label}: {}", render(&simplified));
}

fn main() {
    let users = [
        User {
            name: "User A (banned editor)",
            roles: &["Editor"],
            banned: true,
            readonly: false,
        },
        User {
            name: "User B (read-only editor)",
            roles: &["Editor"],
            banned: false,
            readonly: true,
        },
        User {
            name: "User C (admin)",
            roles: &["Admin"],
            banned: false,
            readonly: false,
        },
    ];

    for user in &users {
        println!("{}", user.name);
        explain("view", &can_view(user));
        explain("edit", &can_edit(user));
        explain("delete", &can_delete(user));
        println!();
    }
}
