//! Default accounts. Seeded accounts carry no password hash.

use crate::model::{seeded_at, Address, NotificationPreferences, Role, User, UserId, UserStatus};

pub fn users() -> Vec<User> {
    vec![
        account(1, "Store Admin", "admin@retrojersey.shop", Role::Admin, Vec::new()),
        account(2, "Olga Smirnova", "manager@retrojersey.shop", Role::Manager, Vec::new()),
        account(
            3,
            "Ivan Petrov",
            "ivan.petrov@example.com",
            Role::Customer,
            vec![Address {
                label: "Home".into(),
                city: "Moscow".into(),
                street: "Tverskaya 12, apt. 5".into(),
                postal_code: "125009".into(),
                is_default: true,
            }],
        ),
    ]
}

fn account(id: u64, name: &str, email: &str, role: Role, addresses: Vec<Address>) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        role,
        status: UserStatus::Active,
        joined_at: seeded_at(id as i64),
        updated_at: seeded_at(id as i64),
        last_login: None,
        addresses,
        notifications: NotificationPreferences::default(),
        password_hash: None,
    }
}
