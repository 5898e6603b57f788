//! Default catalog written on first start or when the stored one is unusable.

use crate::model::{seeded_at, Product, ProductId, ProductStatus};

struct Row {
    name: &'static str,
    team: &'static str,
    color: &'static str,
    price: f64,
    cost: f64,
    stock: u32,
    sold: u32,
    rating: f32,
    category: &'static str,
    featured: bool,
    image: &'static str,
}

const NATIONAL: &str = "National teams";
const CLUB: &str = "Clubs";

const ROWS: [Row; 8] = [
    Row {
        name: "Argentina 1986 Home",
        team: "Argentina",
        color: "Sky blue",
        price: 5990.0,
        cost: 2400.0,
        stock: 12,
        sold: 48,
        rating: 4.9,
        category: NATIONAL,
        featured: true,
        image: "/images/products/argentina-1986-home.jpg",
    },
    Row {
        name: "Brazil 1970 Home",
        team: "Brazil",
        color: "Yellow",
        price: 5490.0,
        cost: 2200.0,
        stock: 8,
        sold: 61,
        rating: 4.8,
        category: NATIONAL,
        featured: true,
        image: "/images/products/brazil-1970-home.jpg",
    },
    Row {
        name: "Netherlands 1988 Home",
        team: "Netherlands",
        color: "Orange",
        price: 4990.0,
        cost: 1900.0,
        stock: 3,
        sold: 35,
        rating: 4.7,
        category: NATIONAL,
        featured: false,
        image: "/images/products/netherlands-1988-home.jpg",
    },
    Row {
        name: "Italy 1982 Home",
        team: "Italy",
        color: "Blue",
        price: 4790.0,
        cost: 1850.0,
        stock: 15,
        sold: 22,
        rating: 4.5,
        category: NATIONAL,
        featured: false,
        image: "/images/products/italy-1982-home.jpg",
    },
    Row {
        name: "West Germany 1990 Home",
        team: "Germany",
        color: "White",
        price: 4590.0,
        cost: 1800.0,
        stock: 0,
        sold: 40,
        rating: 4.6,
        category: NATIONAL,
        featured: false,
        image: "/images/products/germany-1990-home.jpg",
    },
    Row {
        name: "AC Milan 1989 Home",
        team: "AC Milan",
        color: "Red and black",
        price: 4490.0,
        cost: 1700.0,
        stock: 10,
        sold: 19,
        rating: 4.4,
        category: CLUB,
        featured: true,
        image: "/images/products/milan-1989-home.jpg",
    },
    Row {
        name: "Manchester United 1999 Home",
        team: "Manchester United",
        color: "Red",
        price: 4290.0,
        cost: 1650.0,
        stock: 20,
        sold: 27,
        rating: 4.3,
        category: CLUB,
        featured: false,
        image: "/images/products/manutd-1999-home.jpg",
    },
    Row {
        name: "Ajax 1995 Away",
        team: "Ajax",
        color: "Blue",
        price: 3990.0,
        cost: 1500.0,
        stock: 6,
        sold: 9,
        rating: 4.1,
        category: CLUB,
        featured: false,
        image: "/images/products/ajax-1995-away.jpg",
    },
];

pub fn products() -> Vec<Product> {
    ROWS.iter()
        .zip(1u64..)
        .map(|(row, id)| Product {
            id: ProductId(id),
            name: row.name.to_string(),
            team: row.team.to_string(),
            color: row.color.to_string(),
            price: row.price,
            cost: Some(row.cost),
            stock: row.stock,
            sold: row.sold,
            rating: row.rating,
            category: row.category.to_string(),
            status: ProductStatus::Active,
            sizes: ["S", "M", "L", "XL"].map(String::from).to_vec(),
            image: row.image.to_string(),
            featured: row.featured,
            created_at: seeded_at(id as i64),
            updated_at: seeded_at(id as i64),
        })
        .collect()
}
