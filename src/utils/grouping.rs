//! Output grouping: converted text in blocks of five symbols.

/// Number of symbols per output group.
const GROUP_SIZE: usize = 5;

/// Returns `msg` with whitespace removed and a single space inserted after
/// every five remaining characters. The last group may be shorter.
///
/// # Examples
///
/// ```
/// use enigma::utils::grouping::group_by_five;
///
/// assert_eq!(group_by_five("QVPQSOKOILPUBKJ ZPISFXDW"), "QVPQS OKOIL PUBKJ ZPISF XDW");
/// assert_eq!(group_by_five(""), "");
/// ```
pub fn group_by_five(msg: &str) -> String {
    let mut output = String::with_capacity(msg.len() + msg.len() / GROUP_SIZE);
    let mut count = 0;
    for ch in msg.chars().filter(|c| !c.is_whitespace()) {
        if count == GROUP_SIZE {
            output.push(' ');
            count = 0;
        }
        output.push(ch);
        count += 1;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple_has_no_trailing_space() {
        assert_eq!(group_by_five("ABCDEFGHIJ"), "ABCDE FGHIJ");
    }

    #[test]
    fn test_short_message() {
        assert_eq!(group_by_five("ABC"), "ABC");
    }

    #[test]
    fn test_regroups_existing_spaces_and_keeps_punctuation() {
        assert_eq!(group_by_five("AB CD\tEF, GH"), "ABCDE F,GH");
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(group_by_five("   "), "");
    }
}
