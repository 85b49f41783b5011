use std::fmt::{self, Display};

/// One value in a report.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Count(usize),
    /// There was nothing to compute the value from.
    NoData,
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad here so that alignment flags apply to the whole value.
        let text = match self {
            Value::Number(n) => format!("{n:.2}"),
            Value::Count(n) => n.to_string(),
            Value::NoData => "no data".to_string(),
        };
        f.pad(&text)
    }
}

/// The result of a report: an ordered list of labelled values.
///
/// To get a printable table, use its [`Display`] implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    label_heading: String,
    value_heading: String,
    entries: Vec<(String, Value)>,
}

impl Output {
    /// Creates an empty output whose table columns are titled
    /// `label_heading` and `value_heading`.
    #[must_use]
    pub fn new(label_heading: &str, value_heading: &str) -> Self {
        Self {
            label_heading: label_heading.to_string(),
            value_heading: value_heading.to_string(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, label: impl Into<String>, value: Value) {
        self.entries.push((label.into(), value));
    }

    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: Value) -> Self {
        self.push(label, value);
        self
    }

    /// Returns the value of the first entry labelled `label`, if any.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the text to print for this output: the table, or a notice if
    /// there are no entries.
    #[must_use]
    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!("{EMPTY_NOTICE}\n");
        }
        self.to_string()
    }
}

/// Printed instead of a table when a report has no entries.
pub const EMPTY_NOTICE: &str = "Report is empty: no data to display";

impl Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .entries
            .iter()
            .map(|(label, _)| label.len())
            .chain([self.label_heading.len()])
            .max()
            .unwrap_or_default();
        let values: Vec<String> = self.entries.iter().map(|(_, v)| v.to_string()).collect();
        let value_width = values
            .iter()
            .map(String::len)
            .chain([self.value_heading.len()])
            .max()
            .unwrap_or_default();
        writeln!(
            f,
            "{:width$}  {:>value_width$}",
            self.label_heading, self.value_heading
        )?;
        let length = width + value_width + 2;
        writeln!(f, "{:-<length$}", "")?;
        for ((label, _), value) in self.entries.iter().zip(values) {
            writeln!(f, "{label:width$}  {value:>value_width$}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_display_rounds_numbers() {
        assert_eq!(Value::Number(4.333_333).to_string(), "4.33");
        assert_eq!(Value::Number(3.0).to_string(), "3.00");
        assert_eq!(Value::Count(7).to_string(), "7");
        assert_eq!(Value::NoData.to_string(), "no data");
        assert_eq!(format!("{:>8}", Value::Count(7)), "       7");
    }

    #[test]
    fn get_fn_finds_value_by_label() {
        let output = Output::new("Brand", "Average rating")
            .with("apple", Value::Number(4.8))
            .with("samsung", Value::Number(4.5));
        assert_eq!(output.get("samsung"), Some(&Value::Number(4.5)));
        assert_eq!(output.get("sony"), None);
        assert_eq!(output.labels(), vec!["apple", "samsung"]);
    }

    #[test]
    fn display_formats_aligned_table() {
        let output = Output::new("Brand", "Rating")
            .with("apple", Value::Number(4.8))
            .with("xiaomi", Value::Number(4.333));
        let want = "\
Brand   Rating
--------------
apple     4.80
xiaomi    4.33
";
        assert_eq!(output.to_string(), want);
    }

    #[test]
    fn render_fn_prints_notice_for_empty_output() {
        let output = Output::new("Brand", "Average rating");
        assert_eq!(output.render(), "Report is empty: no data to display\n");
    }

    #[test]
    fn render_fn_prints_table_for_non_empty_output() {
        let output = Output::new("Report", "Value").with("rows", Value::Count(2));
        assert_eq!(output.render(), output.to_string());
        assert!(output.render().ends_with("rows        2\n"));
    }

    #[test]
    fn display_of_empty_output_shows_headings_only() {
        let output = Output::new("Report", "Value");
        assert!(output.is_empty());
        assert_eq!(output.to_string(), "Report  Value\n-------------\n");
    }
}
