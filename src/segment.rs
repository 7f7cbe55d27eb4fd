//! Message segmentation.
//!
//! One inbound message can carry several independent order clauses:
//! one per line, or several per line separated by commas/semicolons.

/// Split a message into trimmed, non-empty clauses, preserving
/// source order. Lazy: nothing is allocated for the clauses
/// themselves.
pub fn clauses(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split([',', ';']))
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_lines_and_delimiters() {
        let got: Vec<&str> = clauses("A.1kg X, B.2kg Y\nC.3 Z").collect();
        assert_eq!(got, ["A.1kg X", "B.2kg Y", "C.3 Z"]);
    }

    #[test]
    fn test_order_preserved() {
        let got: Vec<&str> = clauses("A.1kg X; B.2kg Y").collect();
        assert_eq!(got, ["A.1kg X", "B.2kg Y"]);
    }

    #[test]
    fn test_empty_fragments_dropped() {
        let got: Vec<&str> = clauses("  ,, ;\n\nA.1 X,  ").collect();
        assert_eq!(got, ["A.1 X"]);
    }

    #[test]
    fn test_empty_message_yields_nothing() {
        assert_eq!(clauses("").count(), 0);
    }
}
