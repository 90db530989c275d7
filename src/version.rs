//! Lenient semantic version parsing for branch and tag labels (`v1.4`, `v1.4.6`, `2.0.0-rc.1`).
//!
//! Unlike strict SemVer, one or two numeric segments are accepted and padded with zeros,
//! and a leading `v` is ignored.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::BuildError;

#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    segments: Vec<u64>,
    pre: Option<String>,
}

impl Version {
    pub fn parse(label: &str) -> Result<Version, BuildError> {
        let invalid = |detail: &str| BuildError::parse(format!("version {label:?}"), detail);

        let s = label.trim();
        let s = s.strip_prefix('v').unwrap_or(s);
        let s = match s.split_once('+') {
            Some((head, meta)) if !meta.is_empty() => head,
            Some(_) => return Err(invalid("empty build metadata")),
            None => s,
        };
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return Err(invalid("empty pre-release")),
            None => (s, None),
        };
        if core.is_empty() {
            return Err(invalid("missing numeric segments"));
        }

        let mut segments = Vec::new();
        for part in core.split('.') {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("segments must be numeric"));
            }
            let n = part
                .parse::<u64>()
                .map_err(|e| invalid(&e.to_string()))?;
            segments.push(n);
        }
        while segments.len() < 3 {
            segments.push(0);
        }

        Ok(Version {
            original: label.to_string(),
            segments,
            pre,
        })
    }

    pub fn major(&self) -> u64 {
        self.segments[0]
    }

    fn minor(&self) -> u64 {
        self.segments[1]
    }

    /// Same major and minor numbers.
    pub fn same_minor(&self, other: &Version) -> bool {
        self.major() == other.major() && self.minor() == other.minor()
    }
}

fn compare_pre(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // A release sorts after any of its pre-releases.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let mut ia = a.split('.');
            let mut ib = b.split('.');
            loop {
                match (ia.next(), ib.next()) {
                    (None, None) => return Ordering::Equal,
                    (None, Some(_)) => return Ordering::Less,
                    (Some(_), None) => return Ordering::Greater,
                    (Some(x), Some(y)) => {
                        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                            (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                            (Ok(_), Err(_)) => Ordering::Less,
                            (Err(_), Ok(_)) => Ordering::Greater,
                            (Err(_), Err(_)) => x.cmp(y),
                        };
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                }
            }
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let n = self.segments.len().max(other.segments.len());
        for i in 0..n {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        compare_pre(&self.pre, &other.pre)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn test_parse_short_forms_pad_with_zero() {
        assert_eq!(v("v1.4"), v("1.4.0"));
        assert_eq!(v("v2"), v("2.0.0"));
        assert_eq!(v("v1.4").major(), 1);
        assert_eq!(v("v1.4").minor(), 4);
    }

    #[test]
    fn test_parse_rejects_branch_names() {
        for bad in ["master", "v", "", "v1..2", "1.x", "feature/foo", "v1.4-", "1.0+"] {
            assert!(Version::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_ordering() {
        assert!(v("v1.5") > v("v1.4.6"));
        assert!(v("v1.4") < v("v1.4.6"));
        assert!(v("v1.10") > v("v1.9"));
        assert!(v("v2.0.0-rc.1") < v("v2.0.0"));
        assert!(v("v2.0.0-rc.2") > v("v2.0.0-rc.1"));
        assert!(v("v2.0.0-rc.10") > v("v2.0.0-rc.9"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert_eq!(v("1.2.3+build.5"), v("1.2.3"));
    }

    #[test]
    fn test_same_minor() {
        assert!(v("v1.4").same_minor(&v("v1.4.6")));
        assert!(!v("v1.5").same_minor(&v("v1.4.6")));
        assert!(!v("v2.4").same_minor(&v("v1.4.6")));
    }

    #[test]
    fn test_display_keeps_original_label() {
        assert_eq!(v("v1.4").to_string(), "v1.4");
    }
}
