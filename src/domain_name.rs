//! Validated DNS domain names
//!
//! Labels are stored top-level domain first (`com`, `test`, ...) and rendered
//! in the usual root-to-leaf reading order (`...test.com`).

use crate::{Result, SubdomainError};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a single label (RFC 1035)
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a rendered domain name
pub const MAX_DOMAIN_NAME_LEN: usize = 253;

/// Ordered sequence of labels, checked against RFC 1035 limits on every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainName {
    /// Labels, top-level domain at index 0
    labels: Vec<String>,
}

impl DomainName {
    /// Create an empty domain name
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Parse a dotted name such as `tunnel.example.com`
    ///
    /// A single trailing `.` (fully qualified form) is accepted. Every label
    /// goes through [`DomainName::add_label`], so the same limits apply.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_suffix('.').unwrap_or(text);
        let mut name = Self::new();
        if text.is_empty() {
            return Ok(name);
        }

        for label in text.rsplit('.') {
            name.add_label(label)?;
        }
        Ok(name)
    }

    /// Append a label below the current lowest one
    ///
    /// Fails with `InvalidLabel` for an empty or over-long label and with
    /// `InvalidDomainName` if the rendered name would pass 253 characters.
    /// Nothing is modified on failure.
    pub fn add_label(&mut self, label: &str) -> Result<()> {
        check_label(label)?;

        // A lone label can never pass the limit, so `self` is non-empty here
        let new_len = self.len_with(label.len());
        if new_len > MAX_DOMAIN_NAME_LEN {
            return Err(SubdomainError::InvalidDomainName {
                name: format!("{}.{}", label, self),
                len: new_len,
            });
        }

        self.labels.push(label.to_string());
        Ok(())
    }

    /// Replace the top-level domain, or set it if the name is empty
    pub fn set_top_level_domain(&mut self, tld: &str) -> Result<()> {
        check_label(tld)?;

        if self.labels.is_empty() {
            self.labels.push(tld.to_string());
            return Ok(());
        }

        let new_len = self.len() - self.labels[0].len() + tld.len();
        if new_len > MAX_DOMAIN_NAME_LEN {
            let mut rendered: Vec<&str> = self.labels[1..].iter().rev().map(String::as_str).collect();
            rendered.push(tld);
            return Err(SubdomainError::InvalidDomainName {
                name: rendered.join("."),
                len: new_len,
            });
        }

        self.labels[0] = tld.to_string();
        Ok(())
    }

    /// Independent copy; extending it never touches `self`
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Rendered length in characters, separators included
    pub fn len(&self) -> usize {
        if self.labels.is_empty() {
            return 0;
        }
        self.labels.iter().map(String::len).sum::<usize>() + self.labels.len() - 1
    }

    /// Rendered length after appending a label of `label_len` characters
    pub fn len_with(&self, label_len: usize) -> usize {
        if self.labels.is_empty() {
            label_len
        } else {
            self.len() + 1 + label_len
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels in rendering order (leftmost first)
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().rev().map(String::as_str)
    }
}

fn check_label(label: &str) -> Result<()> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(SubdomainError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = SubdomainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
