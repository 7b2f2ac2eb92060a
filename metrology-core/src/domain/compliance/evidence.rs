// metrology-core/src/domain/compliance/evidence.rs

use crate::domain::catalog::Product;

/// Lowercased view of a product used by the text-matching rules.
/// All matching is case-insensitive substring matching.
pub struct Evidence<'a> {
    product: &'a Product,
    description: String,
    name: String,
}

impl<'a> Evidence<'a> {
    pub fn of(product: &'a Product) -> Self {
        Self {
            product,
            description: product
                .description
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default(),
            name: product.name.to_lowercase(),
        }
    }

    /// A structured declaration exists under any of `keys`.
    pub fn has_field(&self, keys: &[&str]) -> bool {
        self.product.has_raw(keys)
    }

    /// The description mentions any of `terms`.
    pub fn mentions(&self, terms: &[&str]) -> bool {
        contains_any(&self.description, terms)
    }

    pub fn name_mentions(&self, terms: &[&str]) -> bool {
        contains_any(&self.name, terms)
    }

    pub fn declares(&self, keys: &[&str], terms: &[&str]) -> bool {
        self.has_field(keys) || self.mentions(terms)
    }
}

/// `terms` must already be lowercase.
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    terms.iter().any(|t| haystack.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let mut product = Product::new("p1", "amz", "LED Television 43in");
        product.description = Some("Made In India. 1 Year WARRANTY".into());
        let evidence = Evidence::of(&product);

        assert!(evidence.mentions(&["made in"]));
        assert!(evidence.mentions(&["warranty"]));
        assert!(evidence.name_mentions(&["television"]));
        assert!(!evidence.mentions(&["best before"]));
    }

    #[test]
    fn test_missing_description_is_absent_not_an_error() {
        let product = Product::new("p1", "amz", "Mystery box");
        let evidence = Evidence::of(&product);
        assert!(!evidence.mentions(&["made in", "ingredients"]));
        assert!(!evidence.has_field(&["brand"]));
    }
}
