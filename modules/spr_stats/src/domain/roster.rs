use crate::contract::model::User;

/// First names carried by system and seed accounts.
const SYSTEM_FIRST_NAMES: [&str; 3] = ["Administrator", "User", "System"];

fn is_system_account(user: &User) -> bool {
    user.first_name
        .as_deref()
        .is_some_and(|name| SYSTEM_FIRST_NAMES.contains(&name))
}

/// Drop system/seed accounts, keeping order. Matching is exact and case-sensitive.
pub fn sanitize(users: &[User]) -> Vec<User> {
    users
        .iter()
        .filter(|u| !is_system_account(u))
        .cloned()
        .collect()
}
