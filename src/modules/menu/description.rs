//! Human readable summaries of how a menu item was customised.

use itertools::Itertools;

/// `+Name` for an added extra, `-Name` for anything else. Unnamed
/// modifications are dropped.
pub fn modification_label(ingredient_name: &str, extra: bool) -> Option<String> {
    if ingredient_name.is_empty() {
        return None;
    }

    if extra {
        Some(format!("+{}", ingredient_name))
    } else {
        Some(format!("-{}", ingredient_name))
    }
}

/// Appends the modification labels, in order, to the base description:
/// `"Tomato and mozzarella (+Basil, -Olives)"`.
pub fn describe<I>(base_description: &str, labels: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let labels = labels.into_iter().join(", ");

    match (base_description.is_empty(), labels.is_empty()) {
        (_, true) => base_description.to_string(),
        (true, false) => format!("({})", labels),
        (false, false) => format!("{} ({})", base_description, labels),
    }
}
