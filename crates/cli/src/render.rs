//! Terminal output for records returned by the backend.

use std::fmt::Write as _;

use forkful_core::{Restaurant, RestaurantSearchResponse, User};
use serde::Serialize;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Print a record in the selected format.
#[allow(clippy::print_stdout)]
pub fn print<T: Serialize>(format: Format, value: &T, text: impl FnOnce(&T) -> String) {
    match format {
        Format::Text => print!("{}", text(value)),
        Format::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to render JSON: {e}"),
        },
    }
}

/// Print a one-off line to stdout.
#[allow(clippy::print_stdout)]
pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(out, "{label:<16}{}", value.unwrap_or("-"));
}

pub fn user(user: &User) -> String {
    let mut out = String::new();
    field(&mut out, "Email", Some(user.email.as_str()));
    field(&mut out, "Name", user.name.as_deref());
    field(&mut out, "Address", user.address_line1.as_deref());
    field(&mut out, "City", user.city.as_deref());
    field(&mut out, "State", user.state.as_deref());
    field(&mut out, "Country", user.country.as_deref());
    field(&mut out, "Zip code", user.zip_code.as_deref());
    out
}

pub fn restaurant(restaurant: &Restaurant) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}, {})",
        restaurant.restaurant_name, restaurant.city, restaurant.country
    );
    let _ = writeln!(
        out,
        "Delivery {} in ~{} min",
        restaurant.delivery_price.to_major(),
        restaurant.estimated_delivery_time
    );
    let _ = writeln!(out, "Cuisines: {}", restaurant.cuisines.join(", "));
    let _ = writeln!(out, "Image: {}", restaurant.image_url);

    if !restaurant.menu_items.is_empty() {
        let _ = writeln!(out, "Menu:");
        for item in &restaurant.menu_items {
            let _ = write!(out, "  {:<24}{:>8}", item.name, item.price.to_major());
            match item.description.as_deref() {
                Some(description) => {
                    let _ = writeln!(out, "  {description}");
                }
                None => out.push('\n'),
            }
        }
    }
    out
}

pub fn search(results: &RestaurantSearchResponse) -> String {
    let mut out = String::new();
    let pagination = results.pagination;
    let _ = writeln!(
        out,
        "{} restaurants found (page {} of {})",
        pagination.total, pagination.page, pagination.pages
    );
    for r in &results.data {
        let _ = writeln!(
            out,
            "  {:<28}{:>6} delivery, ~{} min  [{}]",
            r.restaurant_name,
            r.delivery_price.to_major(),
            r.estimated_delivery_time,
            r.cuisines.join(", ")
        );
    }
    out
}
