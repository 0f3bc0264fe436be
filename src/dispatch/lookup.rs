use crate::catalog::{Catalog, ProductRecord};
use crate::error::{ComparatorError, Result};

/// Resolves both identifiers, naming every one that is missing.
pub(super) fn resolve_pair<'c>(
    catalog: &'c Catalog,
    asin_a: &str,
    asin_b: &str,
) -> Result<(&'c ProductRecord, &'c ProductRecord)> {
    match (catalog.find(asin_a), catalog.find(asin_b)) {
        (Some(a), Some(b)) => Ok((a, b)),
        (a, b) => {
            let missing = [(asin_a, a.is_none()), (asin_b, b.is_none())]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(asin, _)| asin)
                .collect::<Vec<_>>();
            Err(ComparatorError::NotFound(format!(
                "product not found: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_each_missing_identifier() {
        let catalog = Catalog::parse(r#"[{"asin":"A1"}]"#).unwrap();
        let err = resolve_pair(&catalog, "Z1", "Z2").unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "product not found: Z1, Z2");

        let err = resolve_pair(&catalog, "a1", "Z2").unwrap_err();
        assert_eq!(err.to_string(), "product not found: Z2");
    }
}
