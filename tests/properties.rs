//! Property tests for key normalization and config patching.

use proptest::prelude::*;

use trapnode::credentials::Credential;
use trapnode::error::NodeError;
use trapnode::patcher::{section_pattern, ConfigDocument};

fn hex_key() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}"
}

/// Random upper/lowercasing, optional prefix, whitespace sprinkled anywhere.
fn disguise(key: &str, upper: &[bool], gaps: &[u8], prefix: bool) -> String {
    let mut out = String::new();
    if prefix {
        out.push_str(if upper[0] { "0X" } else { "0x" });
    }
    for (i, c) in key.chars().enumerate() {
        match gaps[i] % 8 {
            0 => out.push(' '),
            1 => out.push('\n'),
            2 => out.push('\t'),
            _ => {}
        }
        out.push(if upper[i] { c.to_ascii_uppercase() } else { c });
    }
    out.push_str("\r\n");
    out
}

proptest! {
    #[test]
    fn prop_disguised_keys_normalize(
        key in hex_key(),
        upper in prop::collection::vec(any::<bool>(), 64),
        gaps in prop::collection::vec(any::<u8>(), 64),
        prefix in any::<bool>(),
    ) {
        let credential = Credential::parse(&disguise(&key, &upper, &gaps, prefix)).unwrap();
        prop_assert_eq!(credential.expose(), key.as_str());
    }

    #[test]
    fn prop_wrong_length_rejected(key in "[0-9a-fA-F]{0,63}|[0-9a-fA-F]{65,80}") {
        prop_assert!(matches!(
            Credential::parse(&key),
            Err(NodeError::InvalidCredentialFormat)
        ));
    }

    #[test]
    fn prop_non_hex_rejected(key in hex_key(), pos in 0usize..64, bad in "[g-zG-Z]") {
        let mut chars: Vec<char> = key.chars().collect();
        chars[pos] = bad.chars().next().unwrap();
        let key: String = chars.into_iter().collect();
        prop_assert!(Credential::parse(&key).is_err());
    }

    #[test]
    fn prop_set_replaces_in_place(
        before in prop::collection::vec("[a-z]{1,6} = \"[a-z0-9]{0,8}\"", 0..6),
        after in prop::collection::vec("[a-z]{1,6} = \"[a-z0-9]{0,8}\"", 0..6),
        value in "[a-z0-9:/.]{0,20}",
    ) {
        let before: Vec<String> = before
            .into_iter()
            .filter(|l| !l.starts_with("target "))
            .collect();
        let mut lines = before.clone();
        lines.push("target = \"old\"".to_string());
        lines.extend(after);
        let doc = ConfigDocument::parse(&format!("{}\n", lines.join("\n")));

        let patched = doc.set("target", value.as_str());

        prop_assert_eq!(patched.lines().len(), lines.len());
        prop_assert_eq!(&patched.lines()[before.len()], &format!("target = \"{}\"", value));
        for (i, line) in lines.iter().enumerate() {
            if i != before.len() {
                prop_assert_eq!(&patched.lines()[i], line);
            }
        }
    }

    #[test]
    fn prop_set_appends_missing_key(
        lines in prop::collection::vec("[a-m]{1,6} = [0-9]{1,4}", 0..8),
    ) {
        let text = if lines.is_empty() { String::new() } else { format!("{}\n", lines.join("\n")) };
        let patched = ConfigDocument::parse(&text).set("zeta", "x").render();
        prop_assert_eq!(patched, format!("{}zeta = \"x\"\n", text));
    }

    #[test]
    fn prop_section_patch_stays_inside_section(
        head in prop::collection::vec("[a-z]{1,6} = [0-9]{1,3}", 0..4),
        body in prop::collection::vec("[a-z]{1,6} = [0-9]{1,3}", 0..4),
        tail in prop::collection::vec("[a-z]{1,6} = [0-9]{1,3}", 0..4),
        key in "[a-z]{1,6}",
    ) {
        let mut lines = head.clone();
        lines.push("[traps.target]".to_string());
        lines.extend(body.iter().cloned());
        lines.push("[traps.other]".to_string());
        lines.extend(tail.iter().cloned());
        let doc = ConfigDocument::parse(&lines.join("\n"));

        let section = section_pattern("traps.target").unwrap();
        let patched = doc.set_in_section(&section, &key, "v").unwrap();
        let out = patched.lines();

        // Everything before the header and from the next header on is unchanged.
        prop_assert_eq!(&out[..head.len() + 1], &lines[..head.len() + 1]);
        let other = out.iter().position(|l| l == "[traps.other]").unwrap();
        prop_assert_eq!(&out[other..], &lines[head.len() + 1 + body.len()..]);

        let expected = format!("{} = \"v\"", key);
        prop_assert!(out[head.len() + 1..other].contains(&expected));
    }
}
