//! Grouped sum of a user's shopping cart and its plain-text rendering.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{error::RecipeError, schema::CartPart};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Sums amounts per (name, unit), ordered by name and then unit.
///
/// An empty input means the cart has no entries, which is an error rather
/// than an empty report.
pub fn aggregate(parts: Vec<CartPart>) -> Result<Vec<LineItem>, RecipeError> {
    if parts.is_empty() {
        return Err(RecipeError::EmptyCollection(String::from(
            "Shopping cart is empty",
        )));
    }

    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    parts.into_iter().for_each(|part| {
        *totals
            .entry((part.name, part.measurement_unit))
            .or_insert(0) += i64::from(part.amount);
    });

    Ok(totals
        .into_iter()
        .map(|((name, measurement_unit), amount)| LineItem {
            name,
            measurement_unit,
            amount,
        })
        .collect())
}

pub fn render(username: &str, items: &[LineItem]) -> String {
    let mut shopping_list = format!("Shopping list for {username}:\n");
    for item in items {
        shopping_list.push_str(&format!(
            "\n{} - {}/{}",
            item.name, item.amount, item.measurement_unit
        ));
    }

    shopping_list
}

/// Characters outside a conservative set become `_` so the name is safe to
/// place in a `Content-Disposition` header.
pub fn file_name(username: &str) -> String {
    let safe: String = username
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' | '@' | '+' | '-' => c,
            _ => '_',
        })
        .collect();

    format!("{safe}_shopping_cart.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str, unit: &str, amount: i32) -> CartPart {
        CartPart {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[test]
    fn same_ingredient_is_summed_across_recipes() {
        let items = aggregate(vec![part("Salt", "g", 5), part("Salt", "g", 10)]).unwrap();

        assert_eq!(
            items,
            vec![LineItem {
                name: String::from("Salt"),
                measurement_unit: String::from("g"),
                amount: 15,
            }]
        );
        assert!(render("cook", &items).ends_with("\nSalt - 15/g"));
    }

    #[test]
    fn lines_are_sorted_by_name() {
        let items = aggregate(vec![
            part("Sugar", "g", 100),
            part("Eggs", "pcs", 2),
            part("Milk", "ml", 250),
            part("Eggs", "pcs", 1),
        ])
        .unwrap();

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Eggs", "Milk", "Sugar"]);
        assert_eq!(items[0].amount, 3);
    }

    #[test]
    fn different_units_are_kept_apart() {
        let items = aggregate(vec![part("Butter", "g", 50), part("Butter", "tbsp", 2)]).unwrap();

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let items = aggregate(vec![part("Flour", "g", i32::MAX), part("Flour", "g", i32::MAX)])
            .unwrap();

        assert_eq!(items[0].amount, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn empty_cart_is_an_error() {
        assert!(matches!(
            aggregate(vec![]),
            Err(RecipeError::EmptyCollection(_))
        ));
    }

    #[test]
    fn render_has_header_and_one_line_per_item() {
        let items = aggregate(vec![part("Eggs", "pcs", 2), part("Milk", "ml", 250)]).unwrap();

        assert_eq!(
            render("cook", &items),
            "Shopping list for cook:\n\nEggs - 2/pcs\nMilk - 250/ml"
        );
        assert_eq!(file_name("cook"), "cook_shopping_cart.txt");
    }

    #[test]
    fn file_name_replaces_header_breaking_characters() {
        assert_eq!(file_name("a.b@c+d-e"), "a.b@c+d-e_shopping_cart.txt");
        assert_eq!(
            file_name("x\";\r\nSet-Cookie: y"),
            "x____Set-Cookie__y_shopping_cart.txt"
        );
        assert_eq!(file_name("Шеф"), "____shopping_cart.txt");
    }
}
