use std::io::{self, Write};

use crate::domain::CoverageRule;

const HEADER: [&str; 3] = ["name", "attribute_id", "attribute_values"];

/// Renders coverage rules as an aligned, human-readable table.
///
/// Each criterion of each rule gets its own row holding the rule name, the
/// attribute id, and the accepted values joined by `|`. For example:
///
/// ```text
/// name                  attribute_id          attribute_values
/// rule1                 attridA               attrv2|verylongdutattributevalue
/// rule1                 longdutattributeid    attrv70
/// rule2withalongname    attridB               attrv3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSummary {
    padding: usize,
}

impl Default for TextSummary {
    fn default() -> Self {
        Self::with_padding(4)
    }
}

impl TextSummary {
    /// A summary whose columns are separated by at least `padding` spaces.
    #[must_use]
    pub const fn with_padding(padding: usize) -> Self {
        Self { padding }
    }

    /// Writes the summary of `rules` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write<W: Write>(&self, mut writer: W, rules: &[CoverageRule]) -> io::Result<()> {
        let rows: Vec<[String; 3]> = rules
            .iter()
            .flat_map(|rule| {
                rule.dut_criteria.iter().map(|criterion| {
                    [
                        rule.name.clone(),
                        criterion.attribute_id.to_string(),
                        criterion
                            .values
                            .iter()
                            .map(String::as_str)
                            .collect::<Vec<_>>()
                            .join("|"),
                    ]
                })
            })
            .collect();

        // The last column is not padded.
        let mut widths = [0; 2];
        for (idx, width) in widths.iter_mut().enumerate() {
            *width = rows
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(HEADER[idx].len()))
                .max()
                .unwrap_or(0)
                + self.padding;
        }

        let header = HEADER.map(str::to_string);
        for [name, attribute_id, values] in std::iter::once(&header).chain(&rows) {
            writeln!(
                writer,
                "{name:<name_width$}{attribute_id:<id_width$}{values}",
                name_width = widths[0],
                id_width = widths[1],
            )?;
        }

        writer.flush()
    }
}

/// Writes a summary of `rules` to `writer`, with the default padding.
///
/// See [`TextSummary`] for the format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text_summary<W: Write>(writer: W, rules: &[CoverageRule]) -> io::Result<()> {
    TextSummary::default().write(writer, rules)
}
