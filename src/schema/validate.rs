// src/schema/validate.rs

use crate::error::SchemaError;
use crate::schema::columns::REQUIRED;
use tracing::error;

/// Check that every required column is present in `header`.
///
/// Order does not matter and extra columns are ignored. Names are compared
/// exactly after trimming. All missing names come back in one error.
pub fn ensure_required_columns(header: &[String]) -> Result<(), SchemaError> {
    let present: Vec<&str> = header.iter().map(|h| h.trim()).collect();
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|req| !present.contains(*req))
        .map(|req| req.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        error!(?missing, "required columns missing");
        Err(SchemaError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::columns::{BIRTH, IMAGE_URL, SEX};

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_present_in_any_order() {
        let h = header(&[
            "仕切書No",
            " 種類 ",
            "膝蓋骨脱臼",
            "血統書団体名",
            "毛色",
            "生年月日",
            "性別",
        ]);
        assert_eq!(ensure_required_columns(&h), Ok(()));
    }

    #[test]
    fn test_missing_columns_are_aggregated() {
        let without_image = header(&["種類", "毛色", "血統書団体名", "仕切書No"]);
        let with_image = header(&["種類", "毛色", "血統書団体名", "仕切書No", IMAGE_URL]);
        for h in [without_image, with_image] {
            let err = ensure_required_columns(&h).unwrap_err();
            assert_eq!(err.missing, vec![SEX.to_string(), BIRTH.to_string()]);
        }
    }

    #[test]
    fn test_no_case_folding_or_partial_match() {
        let h = header(&["種類", "毛色", "性別", "生年月日", "血統書団体名", "仕切書no"]);
        let err = ensure_required_columns(&h).unwrap_err();
        assert_eq!(err.missing, vec!["仕切書No".to_string()]);
    }

    #[test]
    fn test_empty_header_reports_everything() {
        let err = ensure_required_columns(&[]).unwrap_err();
        assert_eq!(err.missing.len(), REQUIRED.len());
    }
}
