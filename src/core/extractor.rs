// LicUsage - core/extractor.rs
//
// Block scanner for `display license resource usage` output.
// Core layer: accepts decoded text, never touches the filesystem.
//
// The scan runs in two phases. The grammar phase walks the document line by
// line and collects site blocks: a `<site>` prompt, the command signature,
// a dashed rule / column header / dashed rule sequence, and the three rows
// that follow. The normalisation phase turns each block into three
// `UsageRecord`s. Everything outside a block is ignored.

use crate::core::model::UsageRecord;
use crate::util::constants;
use crate::util::error::ExtractError;

/// Grammar parameters for the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Command literal that must follow the site prompt.
    pub command: String,

    /// Identifiers allowed in the `| inc` output filter. A filter matches
    /// when every `|`-separated part is one of these.
    pub license_items: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            command: constants::DEFAULT_COMMAND.to_string(),
            license_items: constants::DEFAULT_LICENSE_ITEMS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// A matched region: the site label and its three raw data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SiteBlock<'a> {
    pub site: &'a str,
    /// `(1-based line number, verbatim row)` in source order.
    pub rows: Vec<(usize, &'a str)>,
}

impl SiteBlock<'_> {
    /// Split each row into its three columns and build the records.
    ///
    /// A row with any other token count fails the whole extraction.
    fn into_records(self) -> Result<Vec<UsageRecord>, ExtractError> {
        let mut records = Vec::with_capacity(constants::ROWS_PER_BLOCK);
        for (line_number, row) in self.rows {
            let tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.len() != constants::TOKENS_PER_ROW {
                return Err(ExtractError::LineShape {
                    site: self.site.to_string(),
                    line_number,
                    line: preview(row),
                    tokens: tokens.len(),
                });
            }
            records.push(UsageRecord::from_tokens(
                self.site, tokens[0], tokens[1], tokens[2],
            ));
        }
        Ok(records)
    }
}

/// Extract usage records using the default grammar.
pub fn extract(raw_text: &str) -> Result<Vec<UsageRecord>, ExtractError> {
    extract_with(raw_text, &ExtractorConfig::default())
}

/// Extract usage records from a decoded log.
///
/// Returns the records of every matched site block in document order, three
/// per block. A document with no blocks yields an empty vector.
pub fn extract_with(
    raw_text: &str,
    config: &ExtractorConfig,
) -> Result<Vec<UsageRecord>, ExtractError> {
    let blocks = find_blocks(raw_text, config);
    let block_count = blocks.len();

    let mut records = Vec::with_capacity(block_count * constants::ROWS_PER_BLOCK);
    for block in blocks {
        records.extend(block.into_records()?);
    }

    tracing::info!(
        blocks = block_count,
        records = records.len(),
        "Extraction complete"
    );
    Ok(records)
}

// =============================================================================
// Grammar phase
// =============================================================================

/// Outcome of searching for the column header after a command line.
enum TableSearch {
    /// Index of the first line after the closing dashed rule.
    Found(usize),
    /// Another command appeared first; resume scanning at this index.
    Interrupted(usize),
    /// The text ended before a complete header.
    Exhausted,
}

/// Collect every non-overlapping site block in document order.
pub(crate) fn find_blocks<'a>(
    raw_text: &'a str,
    config: &ExtractorConfig,
) -> Vec<SiteBlock<'a>> {
    let lines: Vec<&str> = raw_text.lines().collect();
    let mut blocks = Vec::new();
    let mut pending_site: Option<&str> = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];

        // The nearest prompt before the command names the site.
        let site = match site_header(line) {
            Some((site, rest)) => {
                pending_site = Some(site);
                if !has_command_signature(rest, config) {
                    idx += 1;
                    continue;
                }
                site
            }
            None => match pending_site {
                Some(site) if has_command_signature(line, config) => site,
                _ => {
                    idx += 1;
                    continue;
                }
            },
        };
        pending_site = None;

        let first_row = match locate_table(&lines, idx + 1, config) {
            TableSearch::Found(first_row) => first_row,
            TableSearch::Interrupted(resume) => {
                tracing::debug!(
                    site,
                    line = idx + 1,
                    "Command output has no usage table before the next command; skipping"
                );
                idx = resume;
                continue;
            }
            TableSearch::Exhausted => {
                tracing::debug!(site, line = idx + 1, "No usage table after command");
                break;
            }
        };

        let rows = capture_rows(&lines, first_row);
        if rows.len() < constants::ROWS_PER_BLOCK {
            tracing::debug!(
                site,
                rows = rows.len(),
                "Usage table truncated by end of text; skipping"
            );
            break;
        }

        // Line numbers are 1-based, so this is the index after the last row.
        let resume = rows[rows.len() - 1].0;
        tracing::debug!(site, line = idx + 1, "Matched site block");
        blocks.push(SiteBlock { site, rows });
        idx = resume;
    }

    blocks
}

/// Return the text inside the first non-empty `<...>` on the line and the
/// remainder of the line after the closing `>`.
fn site_header(line: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    while let Some(open) = line[offset..].find('<') {
        let start = offset + open + 1;
        let close = start + line[start..].find('>')?;
        if close > start {
            return Some((&line[start..close], &line[close + 1..]));
        }
        offset = start;
    }
    None
}

/// True when `text` contains the command followed by a `| inc <filter>`
/// whose parts are all accepted license identifiers.
fn has_command_signature(text: &str, config: &ExtractorConfig) -> bool {
    if config.command.is_empty() {
        return false;
    }
    let Some(pos) = text.find(config.command.as_str()) else {
        return false;
    };
    let after = &text[pos + config.command.len()..];

    after
        .match_indices('|')
        .any(|(pipe, _)| filter_matches(&after[pipe + 1..], config))
}

/// Check the text after a `|` for `inc <id>[|<id>...]`.
fn filter_matches(text: &str, config: &ExtractorConfig) -> bool {
    let Some(rest) = text.trim_start().strip_prefix(constants::FILTER_KEYWORD) else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let Some(filter) = rest.split_whitespace().next() else {
        return false;
    };
    filter
        .split('|')
        .all(|part| config.license_items.iter().any(|item| item == part))
}

/// Search forward for dashed rule, column header, dashed rule.
fn locate_table(lines: &[&str], from: usize, config: &ExtractorConfig) -> TableSearch {
    let mut last_header: Option<usize> = None;
    let mut i = from;

    while i < lines.len() {
        let line = lines[i];
        if site_header(line).is_some() {
            last_header = Some(i);
        }
        if has_command_signature(line, config) {
            return TableSearch::Interrupted(last_header.unwrap_or(i));
        }

        if is_dashed_rule(line) {
            let Some(h) = next_non_blank(lines, i + 1) else {
                return TableSearch::Exhausted;
            };
            if is_column_header(lines[h]) {
                let Some(r) = next_non_blank(lines, h + 1) else {
                    return TableSearch::Exhausted;
                };
                if is_dashed_rule(lines[r]) {
                    return TableSearch::Found(r + 1);
                }
                i = h + 1;
                continue;
            }
        }
        i += 1;
    }

    TableSearch::Exhausted
}

/// Take up to three non-blank lines starting at `from`.
fn capture_rows<'a>(lines: &[&'a str], from: usize) -> Vec<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .filter(|(_, l)| !l.trim().is_empty())
        .take(constants::ROWS_PER_BLOCK)
        .map(|(i, l)| (i + 1, *l))
        .collect()
}

fn next_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| !lines[i].trim().is_empty())
}

/// A line containing a run of at least `MIN_RULE_DASHES` consecutive dashes.
/// Other text on the line does not disqualify it.
fn is_dashed_rule(line: &str) -> bool {
    line.split(|c| c != '-')
        .any(|run| run.len() >= constants::MIN_RULE_DASHES)
}

fn is_column_header(line: &str) -> bool {
    line.split_whitespace()
        .eq(constants::COLUMN_HEADER.iter().copied())
}

/// Truncate a line for error messages and debug output.
fn preview(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() <= constants::DEBUG_MAX_LINE_PREVIEW {
        trimmed.to_string()
    } else {
        let mut out: String = trimmed
            .chars()
            .take(constants::DEBUG_MAX_LINE_PREVIEW)
            .collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMAND: &str =
        "display license resource usage | inc LCR9S9KNBSL0Q|LCR9S9KNEVN0P|LCR9S9KNL3V0P";

    fn block(site: &str, rows: [&str; 3]) -> String {
        format!(
            "<{site}>{COMMAND}\n\
             Info: collecting license data, please wait.\n\
             ----------------------------------------------------\n\
             FeatureName     ConfigureItemName     ResourceUsage\n\
             ----------------------------------------------------\n\
             {}\n{}\n{}\n\
             ----------------------------------------------------\n",
            rows[0], rows[1], rows[2]
        )
    }

    fn ne001() -> String {
        block(
            "NE001",
            [
                "FeatureA ItemA 3/5",
                "FeatureB ItemB 2/5",
                "FeatureC ItemC 1/1",
            ],
        )
    }

    #[test]
    fn test_single_block_yields_three_records() {
        let records = extract(&ne001()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.site == "NE001"));

        let used: Vec<_> = records.iter().map(|r| r.used).collect();
        let total: Vec<_> = records.iter().map(|r| r.total).collect();
        assert_eq!(used, vec![Some(3.0), Some(2.0), Some(1.0)]);
        assert_eq!(total, vec![Some(5.0), Some(5.0), Some(1.0)]);

        assert_eq!(records[0].feature_name, "FeatureA");
        assert_eq!(records[1].configure_item_name, "ItemB");
        assert_eq!(records[2].resource_usage, "1/1");
    }

    #[test]
    fn test_two_blocks_keep_document_order() {
        let text = format!(
            "{}<NE001>display clock\n2024-01-01 10:00:00\n{}",
            ne001(),
            block("NE002", ["F1 I1 0/4", "F2 I2 4/4", "F3 I3 1/2"])
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 6);
        let sites: Vec<_> = records.iter().map(|r| r.site.as_str()).collect();
        assert_eq!(
            sites,
            vec!["NE001", "NE001", "NE001", "NE002", "NE002", "NE002"]
        );
        assert_eq!(records[3].feature_name, "F1");
    }

    #[test]
    fn test_empty_and_irrelevant_input_yield_nothing() {
        assert!(extract("").unwrap().is_empty());
        assert!(extract("irrelevant text with no markers")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = ne001();
        assert_eq!(extract(&text).unwrap(), extract(&text).unwrap());
    }

    #[test]
    fn test_output_is_a_multiple_of_three_sharing_sites() {
        let text = format!(
            "noise\n{}more noise\n{}{}",
            block("A", ["f a 1/1", "f b 1/1", "f c 1/1"]),
            block("B", ["f a 1/1", "f b 1/1", "f c 1/1"]),
            block("C", ["f a 1/1", "f b 1/1", "f c 1/1"]),
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len() % 3, 0);
        for triple in records.chunks(3) {
            assert!(triple.iter().all(|r| r.site == triple[0].site));
        }
    }

    #[test]
    fn test_non_numeric_usage_is_recorded_as_missing() {
        let text = block("NE009", ["FA IA abc/10", "FB IB 5/10", "FC IC 1/-"]);
        let records = extract(&text).unwrap();
        assert_eq!(records[0].used, None);
        assert_eq!(records[0].total, Some(10.0));
        assert_eq!(records[1].used, Some(5.0));
        assert_eq!(records[2].total, None);
        assert_eq!(records[0].resource_usage, "abc/10");
    }

    #[test]
    fn test_missing_command_signature_is_not_matched() {
        let text = ne001().replace(COMMAND, "display license resource usage");
        assert!(extract(&text).unwrap().is_empty());

        let text = ne001().replace("LCR9S9KNBSL0Q", "SOMETHINGELSE");
        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_single_license_item_filter_is_accepted() {
        let text = ne001().replace(
            "LCR9S9KNBSL0Q|LCR9S9KNEVN0P|LCR9S9KNL3V0P",
            "LCR9S9KNBSL0Q",
        );
        assert_eq!(extract(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_misspelled_or_reordered_header_is_not_matched() {
        let misspelled = ne001().replace("ConfigureItemName", "ConfigItemName");
        assert!(extract(&misspelled).unwrap().is_empty());

        let reordered = ne001().replace(
            "FeatureName     ConfigureItemName",
            "ConfigureItemName     FeatureName",
        );
        assert!(extract(&reordered).unwrap().is_empty());
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let text = ne001().replace("FeatureName", "featurename");
        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_short_dash_rule_is_not_a_rule() {
        let text = ne001().replace(
            "----------------------------------------------------\nFeatureName",
            "----\nFeatureName",
        );
        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_dash_run_after_other_text_counts_as_rule() {
        let text = format!(
            "<NE001>{COMMAND}\nheader-----\nFeatureName ConfigureItemName ResourceUsage\n-----\n\
             a b 1/2\nc d 2/2\ne f 1/1\n"
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].resource_usage, "1/1");
    }

    #[test]
    fn test_two_token_row_fails_whole_extraction() {
        let text = format!(
            "{}{}",
            ne001(),
            block("NE002", ["F1 I1 1/2", "F2 2/2", "F3 I3 1/2"])
        );
        let err = extract(&text).unwrap_err();
        match err {
            ExtractError::LineShape {
                site,
                tokens,
                line,
                line_number,
            } => {
                assert_eq!(site, "NE002");
                assert_eq!(tokens, 2);
                assert_eq!(line, "F2 2/2");
                assert_eq!(line_number, 16);
            }
        }
    }

    #[test]
    fn test_four_token_row_fails_whole_extraction() {
        let text = block("NE003", ["F1 I1 1/2 extra", "F2 I2 2/2", "F3 I3 1/2"]);
        assert!(matches!(
            extract(&text),
            Err(ExtractError::LineShape { tokens: 4, .. })
        ));
    }

    #[test]
    fn test_prompt_on_its_own_line_before_command() {
        let text = format!(
            "<NE010>\n{COMMAND}\n-----------\nFeatureName ConfigureItemName ResourceUsage\n-----------\n\
             a b 1/2\nc d 2/2\ne f 0/2\n"
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].site, "NE010");
    }

    #[test]
    fn test_nearest_prompt_names_the_site() {
        let text = format!(
            "<OLD>display version\nVRP V800\n<NE011>\n{COMMAND}\n\
             ------\nFeatureName ConfigureItemName ResourceUsage\n------\n\
             a b 1/2\nc d 2/2\ne f 0/2\n"
        );
        let records = extract(&text).unwrap();
        assert!(records.iter().all(|r| r.site == "NE011"));
    }

    #[test]
    fn test_blank_lines_between_rows_are_tolerated() {
        let text = format!(
            "<NE012>{COMMAND}\n------\n\nFeatureName ConfigureItemName ResourceUsage\n\n------\n\n\
             a b 1/2\n\nc d 2/2\n   \ne f 0/2\n"
        );
        assert_eq!(extract(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_noise_rule_before_real_header_is_skipped() {
        let text = format!(
            "<NE013>{COMMAND}\n-----------\nSome banner text\n-----------\n\
             FeatureName ConfigureItemName ResourceUsage\n-----------\n\
             a b 1/2\nc d 2/2\ne f 0/2\n"
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].feature_name, "a");
    }

    #[test]
    fn test_almost_block_does_not_steal_next_blocks_table() {
        let broken = ne001().replace("FeatureName", "FeatureNam");
        let text = format!(
            "{broken}{}",
            block("NE002", ["F1 I1 1/2", "F2 I2 2/2", "F3 I3 1/2"])
        );
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.site == "NE002"));
    }

    #[test]
    fn test_table_truncated_at_end_of_text_is_ignored() {
        let text = format!(
            "<NE014>{COMMAND}\n------\nFeatureName ConfigureItemName ResourceUsage\n------\n\
             a b 1/2\nc d 2/2\n"
        );
        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_table_cut_short_by_next_prompt_fails_whole_extraction() {
        let text = format!(
            "<NE001>{COMMAND}\n------\nFeatureName ConfigureItemName ResourceUsage\n------\n\
             a b 1/2\nc d 2/2\n<NE001>quit\n"
        );
        assert_eq!(
            extract(&text),
            Err(ExtractError::LineShape {
                site: "NE001".to_string(),
                line_number: 7,
                line: "<NE001>quit".to_string(),
                tokens: 1,
            })
        );
    }

    #[test]
    fn test_repeated_site_is_not_deduplicated() {
        let text = format!("{}{}", ne001(), ne001());
        let records = extract(&text).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0], records[3]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = ne001().replace('\n', "\r\n");
        assert_eq!(extract(&text).unwrap().len(), 3);
    }

    #[test]
    fn test_custom_license_items() {
        let config = ExtractorConfig {
            license_items: vec!["LCRCUSTOM01".to_string()],
            ..ExtractorConfig::default()
        };
        let text = ne001().replace(
            "LCR9S9KNBSL0Q|LCR9S9KNEVN0P|LCR9S9KNL3V0P",
            "LCRCUSTOM01",
        );
        assert_eq!(extract_with(&text, &config).unwrap().len(), 3);
        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_site_header_takes_first_bracket_pair() {
        assert_eq!(
            site_header("<NE001>display x <other>"),
            Some(("NE001", "display x <other>"))
        );
        assert_eq!(site_header("<>  <HOST-7>"), Some(("HOST-7", "")));
        assert_eq!(site_header("no prompt here"), None);
        assert_eq!(site_header("<unterminated"), None);
    }

    #[test]
    fn test_dashed_rule_detection() {
        assert!(is_dashed_rule("-----"));
        assert!(is_dashed_rule("  ------------   -------  "));
        assert!(is_dashed_rule("header-----"));
        assert!(is_dashed_rule("Info: ------ done"));
        assert!(!is_dashed_rule("----"));
        assert!(!is_dashed_rule("--- abc ---"));
        assert!(!is_dashed_rule("-- -- -- --"));
        assert!(!is_dashed_rule(""));
    }

    #[test]
    fn test_find_blocks_captures_rows_verbatim() {
        let text = block("NE001", ["  FeatureA   ItemA 3/5", "FeatureB ItemB 2/5", "FeatureC ItemC 1/1"]);
        let blocks = find_blocks(&text, &ExtractorConfig::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].site, "NE001");
        assert_eq!(blocks[0].rows[0], (6, "  FeatureA   ItemA 3/5"));
    }
}
