//! Naming helpers for generated code
//!
//! Every identifier that ends up in a generated file or a config table is
//! derived here, so the controller, schema, and route generators agree on
//! the same names for one entity.

use inflector::Inflector;

/// Naming conventions used by the generators
pub struct NamingHelpers;

impl NamingHelpers {
    /// Split a name into words
    ///
    /// Words break at every character that is not alphanumeric, between a
    /// lowercase letter and an uppercase one, between letters and digits,
    /// and before the last capital of an acronym that starts a new word
    /// (`HTMLParser` is `HTML` + `Parser`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudgen::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::split_words("HTMLParser"), ["HTML", "Parser"]);
    /// assert_eq!(NamingHelpers::split_words("x-ray v2"), ["x", "ray", "v", "2"]);
    /// ```
    #[must_use]
    pub fn split_words(input: &str) -> Vec<&str> {
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let mut words = Vec::new();
        let mut start: Option<usize> = None;

        for (i, &(offset, c)) in chars.iter().enumerate() {
            if !c.is_alphanumeric() {
                if let Some(begin) = start.take() {
                    words.push(&input[begin..offset]);
                }
                continue;
            }

            if let (Some(begin), Some(&(_, prev))) = (start, i.checked_sub(1).and_then(|p| chars.get(p))) {
                let next = chars.get(i + 1).map(|&(_, n)| n);
                let boundary = (is_lower(prev) && c.is_uppercase())
                    || (prev.is_numeric() != c.is_numeric())
                    || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(is_lower));
                if boundary {
                    words.push(&input[begin..offset]);
                    start = Some(offset);
                }
            }

            if start.is_none() {
                start = Some(offset);
            }
        }

        if let Some(begin) = start {
            words.push(&input[begin..]);
        }
        words
    }

    /// Convert a raw entity name to the `PascalCase` identifier used for
    /// classes, controllers, and file names
    ///
    /// Only the first character of each word is upper-cased; the rest is
    /// kept as typed, so an already converted name is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudgen::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_entity_name("order item"), "OrderItem");
    /// assert_eq!(NamingHelpers::to_entity_name("user_profile"), "UserProfile");
    /// assert_eq!(NamingHelpers::to_entity_name("OrderItem"), "OrderItem");
    /// assert_eq!(NamingHelpers::to_entity_name("HTMLParser"), "HTMLParser");
    /// ```
    #[must_use]
    pub fn to_entity_name(input: &str) -> String {
        Self::split_words(input).into_iter().map(upper_first).collect()
    }

    /// Convert a raw entity name to the `snake_case` segment used in URLs
    ///
    /// Derived from the entity name, so both always describe the same words.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudgen::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_route_segment("order item"), "order_item");
    /// assert_eq!(NamingHelpers::to_route_segment("OrderItem"), "order_item");
    /// assert_eq!(NamingHelpers::to_route_segment("HTMLParser"), "html_parser");
    /// ```
    #[must_use]
    pub fn to_route_segment(input: &str) -> String {
        Self::split_words(&Self::to_entity_name(input))
            .into_iter()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Human-readable title, used in comments of generated blocks
    ///
    /// # Examples
    ///
    /// ```
    /// # use crudgen::helpers::NamingHelpers;
    /// assert_eq!(NamingHelpers::to_title("order_item"), "Order Item");
    /// ```
    #[must_use]
    pub fn to_title(input: &str) -> String {
        Self::split_words(input)
            .into_iter()
            .map(upper_first)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `camelCase` form, used for local variables in generated code
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        Self::split_words(input)
            .into_iter()
            .enumerate()
            .map(|(i, word)| if i == 0 { word.to_lowercase() } else { upper_first(word) })
            .collect()
    }

    /// Controller identifier for an entity (`OrderItemController`)
    #[must_use]
    pub fn to_controller_name(entity_name: &str) -> String {
        format!("{entity_name}Controller")
    }

    /// SQL table name (`order_items`)
    #[must_use]
    pub fn to_table_name(input: &str) -> String {
        Self::to_route_segment(input).to_plural()
    }
}

fn is_lower(c: char) -> bool {
    c.is_alphabetic() && !c.is_uppercase()
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name() {
        assert_eq!(NamingHelpers::to_entity_name("order item"), "OrderItem");
        assert_eq!(NamingHelpers::to_entity_name("  post "), "Post");
        assert_eq!(NamingHelpers::to_entity_name("user-profile"), "UserProfile");
        assert_eq!(NamingHelpers::to_entity_name("userProfile"), "UserProfile");
        assert_eq!(NamingHelpers::to_entity_name("!!!"), "");
    }

    #[test]
    fn test_entity_name_keeps_acronyms() {
        assert_eq!(NamingHelpers::to_entity_name("x-ray"), "XRay");
        assert_eq!(NamingHelpers::to_entity_name("XRay"), "XRay");
        assert_eq!(NamingHelpers::to_entity_name("HTMLParser"), "HTMLParser");
        assert_eq!(NamingHelpers::to_entity_name("ABTest"), "ABTest");
        assert_eq!(NamingHelpers::to_entity_name("order2 item"), "Order2Item");
    }

    #[test]
    fn test_entity_name_and_segment_agree() {
        for (raw, entity, segment) in [
            ("HTMLParser", "HTMLParser", "html_parser"),
            ("ABTest", "ABTest", "ab_test"),
            ("x-ray", "XRay", "x_ray"),
            ("user.profile", "UserProfile", "user_profile"),
        ] {
            assert_eq!(NamingHelpers::to_entity_name(raw), entity, "{raw}");
            assert_eq!(NamingHelpers::to_route_segment(raw), segment, "{raw}");
            assert_eq!(NamingHelpers::to_route_segment(entity), segment, "{raw}");
        }
    }

    #[test]
    fn test_split_words() {
        assert_eq!(NamingHelpers::split_words("  order   item "), ["order", "item"]);
        assert_eq!(NamingHelpers::split_words("orderItem"), ["order", "Item"]);
        assert_eq!(NamingHelpers::split_words("ABTest"), ["AB", "Test"]);
        assert_eq!(NamingHelpers::split_words("v2beta"), ["v", "2", "beta"]);
        assert!(NamingHelpers::split_words("-_-").is_empty());
    }

    #[test]
    fn test_route_segment() {
        assert_eq!(NamingHelpers::to_route_segment("order item"), "order_item");
        assert_eq!(NamingHelpers::to_route_segment("UserProfile"), "user_profile");
        assert_eq!(NamingHelpers::to_route_segment("post"), "post");
    }

    #[test]
    fn test_title() {
        assert_eq!(NamingHelpers::to_title("order item"), "Order Item");
        assert_eq!(NamingHelpers::to_title("UserProfile"), "User Profile");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(NamingHelpers::to_camel_case("order item"), "orderItem");
    }

    #[test]
    fn test_controller_and_table() {
        assert_eq!(NamingHelpers::to_controller_name("Post"), "PostController");
        assert_eq!(NamingHelpers::to_table_name("Category"), "categories");
        assert_eq!(NamingHelpers::to_table_name("order item"), "order_items");
    }
}
