use std::collections::HashMap;

use super::entry::Entry;

/// Validate entries before they reach the scorer.
/// Returns all validation errors at once (not just the first).
///
/// The scorer itself never rejects an entry; this is the boundary check for
/// data that would make the result ambiguous rather than merely untimed.
pub fn validate_entries(entries: &[Entry]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen_ids: HashMap<&str, usize> = HashMap::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.helm.trim().is_empty() {
            errors.push(format!("entries[{}].helm: must not be blank", i));
        }

        let entry_id = entry.entry_id.trim();
        if entry_id.is_empty() {
            errors.push(format!("entries[{}].entryId: must not be blank", i));
        } else if let Some(first) = seen_ids.insert(entry_id, i) {
            errors.push(format!(
                "entries[{}].entryId: duplicate entry id '{}' (also entries[{}])",
                i, entry_id, first
            ));
        }

        if entry.py == 0 {
            errors.push(format!(
                "entries[{}].py: class handicap for '{}' must be positive",
                i, entry.dinghy
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FinishCode;

    #[test]
    fn test_valid_entries() {
        let entries = vec![
            Entry::new("SPR001", "Alice", "LASER", 1100).with_finish(3, 2400),
            Entry::new("SPR002", "Cara", "LASER", 1100).with_code(FinishCode::Dnf),
        ];
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(validate_entries(&[]).is_ok());
    }

    #[test]
    fn test_blank_helm() {
        let entries = vec![Entry::new("SPR001", "  ", "LASER", 1100)];
        let errors = validate_entries(&entries).unwrap_err();
        assert!(errors[0].contains("entries[0].helm"));
    }

    #[test]
    fn test_duplicate_entry_id() {
        let entries = vec![
            Entry::new("SPR001", "Alice", "LASER", 1100),
            Entry::new("SPR001", "Cara", "LASER", 1100),
        ];
        let errors = validate_entries(&entries).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("entries[1].entryId"));
        assert!(errors[0].contains("also entries[0]"));
    }

    #[test]
    fn test_collects_all_errors() {
        let entries = vec![
            Entry::new("", "", "LASER", 0), // Three errors
            Entry::new("SPR002", "Cara", "LASER", 1100),
        ];
        let errors = validate_entries(&entries).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
