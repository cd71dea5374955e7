//! Scrubbing secrets out of captured output.

const MASK: &str = "****";

/// Replaces every occurrence of known secret values.
#[derive(Debug, Default)]
pub struct Redactor<'a> {
    secrets: Vec<&'a str>,
}

impl<'a> Redactor<'a> {
    pub fn new(secrets: Vec<&'a str>) -> Self {
        let mut secrets: Vec<&str> = secrets.into_iter().filter(|s| !s.is_empty()).collect();
        // Longest first so a secret containing another is masked whole.
        secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
        Self { secrets }
    }

    /// Mask every case-insensitive occurrence of each secret.
    pub fn scrub(&self, line: &str) -> String {
        let mut out = line.to_string();
        for secret in &self.secrets {
            let needle = secret.to_ascii_lowercase();
            let mut start = 0;
            while let Some(rel) = out.to_ascii_lowercase()[start..].find(&needle) {
                let pos = start + rel;
                out.replace_range(pos..pos + needle.len(), MASK);
                start = pos + MASK.len();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub() {
        let redactor = Redactor::new(vec!["abc123", ""]);
        assert_eq!(redactor.scrub("key=abc123 again abc123"), "key=**** again ****");
        assert_eq!(redactor.scrub("key=0xABC123"), "key=0x****");
        assert_eq!(redactor.scrub("nothing here"), "nothing here");
    }

    #[test]
    fn test_empty_redactor() {
        assert_eq!(Redactor::default().scrub("abc"), "abc");
    }
}
