//! Codec for `tag_list`: a comma-separated string on the wire, a list of
//! option strings locally.
//!
//! Commas inside an option are not escaped, so an option containing `,`
//! comes back as two options. The wire format is kept as the CRM stores it.

/// Trim each option and join with `,`. Empty options are kept as-is.
pub fn encode<S: AsRef<str>>(options: &[S]) -> String {
    options
        .iter()
        .map(|option| option.as_ref().trim())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split on `,`, trim each piece, drop pieces that end up empty.
pub fn decode(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append a trimmed option. Whitespace-only input is ignored; returns
/// whether the option was added.
pub fn push_option(options: &mut Vec<String>, raw: &str) -> bool {
    let option = raw.trim();
    if option.is_empty() {
        return false;
    }
    options.push(option.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_trims_and_drops_empty_pieces() {
        assert_eq!(decode(" Yes , No,,Maybe ,  "), vec!["Yes", "No", "Maybe"]);
        assert!(decode("").is_empty());
    }

    #[test]
    fn encode_trims_each_option() {
        assert_eq!(encode(&[" Red", "Green ", "Blue"]), "Red,Green,Blue");
    }

    #[test]
    fn encode_keeps_explicit_empty_options() {
        assert_eq!(encode(&["a", "", "b"]), "a,,b");
    }

    #[test]
    fn options_survive_encode_then_decode() {
        let options = vec!["Strongly agree".to_string(), "Neutral".to_string(), "Disagree".to_string()];
        assert_eq!(decode(&encode(&options)), options);
    }

    #[test]
    fn canonical_csv_survives_decode_then_encode() {
        let csv = "one,two,three";
        assert_eq!(encode(&decode(csv)), csv);
    }

    #[test]
    fn spaced_csv_is_normalized() {
        assert_eq!(encode(&decode("one, two")), "one,two");
    }

    #[test]
    fn commas_inside_an_option_split_it() {
        let options = ["a,b"];
        assert_eq!(decode(&encode(&options)), vec!["a", "b"]);
    }

    #[test]
    fn push_option_ignores_blank_input() {
        let mut options = Vec::new();
        assert!(push_option(&mut options, "  Yes "));
        assert!(!push_option(&mut options, "   "));
        assert_eq!(options, vec!["Yes"]);
    }
}
