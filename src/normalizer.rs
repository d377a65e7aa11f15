use crate::config::ManufacturerMapping;

/// Resolves a model name to the manufacturer that sells it.
///
/// Aliases are tried first, case-insensitively, manufacturer by manufacturer
/// in mapping order. If none hit, the manufacturer identifiers themselves are
/// tried as case-sensitive substrings. `None` means the model is untracked.
pub fn match_manufacturer<'m>(
    model_name: &str,
    mapping: &'m ManufacturerMapping,
) -> Option<&'m str> {
    let title = model_name.to_lowercase();

    for entry in mapping.entries() {
        for keyword in &entry.aliases {
            // an empty keyword would claim every model
            if keyword.is_empty() {
                continue;
            }
            if title.contains(&keyword.to_lowercase()) {
                return Some(&entry.manufacturer);
            }
        }
    }

    mapping
        .entries()
        .iter()
        .find(|entry| {
            !entry.manufacturer.is_empty() && model_name.contains(entry.manufacturer.as_str())
        })
        .map(|entry| entry.manufacturer.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &[&str])]) -> ManufacturerMapping {
        pairs
            .iter()
            .map(|(m, aliases)| (*m, aliases.iter().copied()))
            .collect()
    }

    #[test]
    fn alias_resolves_to_manufacturer() {
        let m = mapping(&[("比亚迪汽车", &["海鸥"])]);
        assert_eq!(match_manufacturer("比亚迪海鸥", &m), Some("比亚迪汽车"));
    }

    #[test]
    fn unknown_model_is_absent() {
        let m = mapping(&[("比亚迪汽车", &["海鸥"]), ("吉利汽车", &["星愿"])]);
        assert_eq!(match_manufacturer("未知车型X", &m), None);
    }

    #[test]
    fn alias_match_ignores_case() {
        let m = mapping(&[("特斯拉中国", &["model y"])]);
        assert_eq!(match_manufacturer("Model Y", &m), Some("特斯拉中国"));
    }

    #[test]
    fn first_registered_manufacturer_wins() {
        let m = mapping(&[("上汽通用五菱", &["宏光"]), ("上汽大众", &["宏光", "朗逸"])]);
        assert_eq!(match_manufacturer("宏光MINIEV", &m), Some("上汽通用五菱"));

        let flipped = mapping(&[("上汽大众", &["宏光", "朗逸"]), ("上汽通用五菱", &["宏光"])]);
        assert_eq!(match_manufacturer("宏光MINIEV", &flipped), Some("上汽大众"));
    }

    #[test]
    fn aliases_outrank_identifier_fallback() {
        // "问界" is both the first identifier and the second manufacturer's alias
        let m = mapping(&[("问界", &[]), ("赛力斯汽车", &["问界"])]);
        assert_eq!(match_manufacturer("问界M7", &m), Some("赛力斯汽车"));
    }

    #[test]
    fn identifier_fallback_is_case_sensitive() {
        let m = mapping(&[("Tesla", &[])]);
        assert_eq!(match_manufacturer("Tesla Model 3", &m), Some("Tesla"));
        assert_eq!(match_manufacturer("tesla model 3", &m), None);
    }

    #[test]
    fn empty_alias_never_matches() {
        let m = mapping(&[("A", &[""]), ("B", &["秦"])]);
        assert_eq!(match_manufacturer("秦PLUS", &m), Some("B"));
    }

    #[test]
    fn empty_mapping_fails_closed() {
        assert_eq!(match_manufacturer("比亚迪海鸥", &ManufacturerMapping::default()), None);
    }

    #[test]
    fn repeated_calls_agree() {
        let m = mapping(&[("比亚迪汽车", &["海鸥", "秦"]), ("吉利汽车", &["星愿"])]);
        let first = match_manufacturer("吉利星愿", &m);
        for _ in 0..10 {
            assert_eq!(match_manufacturer("吉利星愿", &m), first);
        }
    }
}
