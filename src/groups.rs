use anyhow::{bail, Result};
use regex::Regex;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug)]
struct Group {
    name: String,
    regex: Regex,
}

/// Brand group configuration.
///
/// Brands matching a group's regular expression are reported under the
/// group's name instead of their own, so that `Apple`, `apple` and
/// `Apple Inc.` can be counted as one brand.
#[derive(Debug, Default)]
pub struct Groups(Vec<Group>);

impl Groups {
    /// Reads brand group configuration from `path`.
    ///
    /// The configuration file consists of group specifications, one per line,
    /// in the following format:
    ///
    /// ```txt
    /// GROUP_NAME | GROUP_REGEX
    /// ```
    ///
    /// Blank lines are ignored. `GROUP_REGEX` can be any regular expression
    /// supported by [`regex::Regex`].
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * The file cannot be opened
    /// * The file cannot be read
    /// * There is a line with an invalid format (no `|` character)
    /// * `GROUP_REGEX` is an invalid regular expression
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut groups = Self::default();
        let file = BufReader::new(File::open(&path)?);
        for line in file.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let Some((name, regex_str)) = line.split_once(" | ") else {
                bail!(
                    "reading {:?}: bad line format (missing |): {line}",
                    path.as_ref(),
                );
            };
            groups.add(name.trim(), regex_str.trim())?;
        }
        Ok(groups)
    }

    /// Adds a new group.
    ///
    /// # Errors
    ///
    /// Returns any errors from compiling `regex_str` with [`Regex::new`].
    pub fn add(&mut self, name: &str, regex_str: &str) -> Result<()> {
        self.0.push(Group {
            name: name.to_string(),
            regex: Regex::new(regex_str)?,
        });
        Ok(())
    }

    /// Returns the group for `brand`, if any.
    ///
    /// Groups are tried in the order they were added; the first match wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ratings::Groups;
    /// let mut groups = Groups::default();
    /// groups.add("Apple", "(?i)^apple").unwrap();
    /// assert_eq!(groups.brand_group("apple inc."), Some("Apple"));
    /// assert_eq!(groups.brand_group("samsung"), None);
    /// ```
    #[must_use]
    pub fn brand_group(&self, brand: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|g| g.regex.is_match(brand))
            .map(|g| g.name.as_str())
    }

    /// Returns the name `brand` should be reported under.
    #[must_use]
    pub fn display_name<'a>(&'a self, brand: &'a str) -> &'a str {
        self.brand_group(brand).unwrap_or(brand)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
