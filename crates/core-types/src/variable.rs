/// Returns the base sector of a hierarchical variable path, i.e. the path with
/// its last `|`-delimited segment removed.
///
/// `"Secondary Energy|Electricity|Coal"` has base sector
/// `"Secondary Energy|Electricity"`. A path without any `|` separator is its
/// own base sector.
pub fn base_sector(variable: &str) -> &str {
    match variable.rfind('|') {
        Some(idx) => &variable[..idx],
        None => variable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_last_segment() {
        assert_eq!(
            base_sector("Secondary Energy|Electricity|Coal"),
            "Secondary Energy|Electricity"
        );
        assert_eq!(base_sector("Secondary Energy|Electricity"), "Secondary Energy");
    }

    #[test]
    fn top_level_path_is_its_own_base() {
        assert_eq!(base_sector("Secondary Energy"), "Secondary Energy");
    }
}
