//! Sample order history for the seeded customer.

use crate::model::{
    seeded_at, Address, Order, OrderId, OrderLine, OrderStatus, ProductId, ProductSnapshot, UserId,
};

pub fn orders() -> Vec<Order> {
    let address = Address {
        label: "Home".into(),
        city: "Moscow".into(),
        street: "Tverskaya 12, apt. 5".into(),
        postal_code: "125009".into(),
        is_default: true,
    };
    vec![
        order(
            30,
            OrderStatus::Delivered,
            &address,
            vec![line(1, "Argentina 1986 Home", "Argentina", 5990.0, "L", 1)],
        ),
        order(
            45,
            OrderStatus::Cancelled,
            &address,
            vec![
                line(6, "AC Milan 1989 Home", "AC Milan", 4490.0, "M", 1),
                line(8, "Ajax 1995 Away", "Ajax", 3990.0, "M", 1),
            ],
        ),
    ]
}

fn order(day: i64, status: OrderStatus, address: &Address, items: Vec<OrderLine>) -> Order {
    let placed = seeded_at(day);
    let subtotal: f64 = items.iter().map(OrderLine::total).sum();
    Order {
        id: OrderId::from_millis(placed.timestamp_millis()),
        user_id: Some(UserId(3)),
        items,
        total: subtotal + 300.0 + (subtotal * 0.2).round(),
        status,
        address: address.clone(),
        payment_method: "card".into(),
        created_at: placed,
        updated_at: placed,
    }
}

fn line(id: u64, name: &str, team: &str, price: f64, size: &str, quantity: u32) -> OrderLine {
    OrderLine {
        product: ProductSnapshot {
            id: ProductId(id),
            name: name.to_string(),
            team: team.to_string(),
            price,
            image: String::new(),
            stock: 0,
        },
        size: size.to_string(),
        quantity,
        unit_price: price,
    }
}
