// src/cleaner.rs
//
// Heuristic removal of report boilerplate. The rules are an ordered
// table so each one can be tested in isolation; the only stateful part
// is the totaliser section, which swallows lines until the next worker
// line appears.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// What happens to a line matched by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Remove just this line.
    Drop,
    /// Remove this line and everything after it until the next worker line.
    BeginSkip,
}

/// One entry in the ordered filter table. First match wins.
struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    action: Action,
}

/// Report header fragments that never belong to a data block.
const HEADER_KEYWORDS: &[&str] = &[
    "Relação Anual",
    "COOPERATIVA",
    "Rubrica",
    "TRABALHADOR",
    "Página",
];

/// The month-columns header row repeated on every report page.
const MONTH_HEADER: &str = "JAN FEV MAR ABR MAI JUN JUL AGO SET OUT NOV DEZ TOTAL";

const RULES: &[Rule] = &[
    // Checked first: a totaliser line often carries header keywords
    // too, and only this rule opens the skip section.
    Rule {
        name: "totaliser",
        matches: |line| line.contains("TOTALIZA"),
        action: Action::BeginSkip,
    },
    Rule {
        name: "page-marker",
        matches: |line| line.starts_with("--- Page"),
        action: Action::Drop,
    },
    Rule {
        name: "report-header",
        matches: |line| HEADER_KEYWORDS.iter().any(|kw| line.contains(kw)),
        action: Action::Drop,
    },
    Rule {
        name: "separator",
        matches: |line| line.starts_with('_'),
        action: Action::Drop,
    },
    Rule {
        name: "blank",
        matches: |line| line.trim().is_empty(),
        action: Action::Drop,
    },
    Rule {
        name: "month-header",
        matches: |line| line.contains(MONTH_HEADER),
        action: Action::Drop,
    },
    Rule {
        name: "dashes-only",
        matches: |line| line.trim().chars().all(|c| c == '-' || c == ' '),
        action: Action::Drop,
    },
];

static WORKER_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{6}").unwrap());

/// A worker line carries a 6-digit code and is not a rubric row
/// (rubric identifiers start with 239).
fn is_worker_line(line: &str) -> bool {
    WORKER_CODE_RE.is_match(line) && !line.trim_start().starts_with("239")
}

/// Remove boilerplate, leaving only lines that belong to data blocks.
/// Best-effort and lossy by design.
pub fn clean(text: &str) -> Vec<String> {
    let mut kept = Vec::new();
    let mut skipping = false;

    for line in text.lines() {
        if let Some(rule) = RULES.iter().find(|r| (r.matches)(line)) {
            if rule.action == Action::BeginSkip {
                skipping = true;
            }
            debug!(rule = rule.name, "dropped line");
            continue;
        }

        if skipping {
            if is_worker_line(line) {
                skipping = false;
            } else {
                continue;
            }
        }

        kept.push(line.to_string());
    }

    kept
}

/// Cleaning disabled: every input line is passed through untouched,
/// for documents that are already clean.
pub fn passthrough(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_page_markers_and_headers() {
        let text = "--- Page 1 ---\n\
                    Relação Anual de Produtividade\n\
                    COOPERATIVA DE TRABALHO\n\
                    Abadia Pereira da Silva 101559 Tecnico de enfermagem\n\
                    Página 1 de 9";
        let kept = clean(text);
        assert_eq!(
            kept,
            vec!["Abadia Pereira da Silva 101559 Tecnico de enfermagem"]
        );
    }

    #[test]
    fn drops_blank_separator_and_dash_lines() {
        let text = "____________________\n\n   \n-----  -----\ndata line 123456 kept";
        assert_eq!(clean(text), vec!["data line 123456 kept"]);
    }

    #[test]
    fn drops_month_header_row() {
        let text = "JAN FEV MAR ABR MAI JUN JUL AGO SET OUT NOV DEZ TOTAL\nkept line";
        assert_eq!(clean(text), vec!["kept line"]);
    }

    #[test]
    fn totaliser_skips_until_next_worker_line() {
        let text = "TOTALIZAÇÃO DO TRABALHADOR\n\
                    some summary row 1,23\n\
                    another summary row\n\
                    Joana Souza 102233 Enfermeira\n\
                    PRODUTIVIDADE 0001 - COOPERADOS";
        let kept = clean(text);
        assert_eq!(
            kept,
            vec![
                "Joana Souza 102233 Enfermeira",
                "PRODUTIVIDADE 0001 - COOPERADOS",
            ]
        );
    }

    #[test]
    fn totaliser_with_header_keyword_still_opens_skip() {
        // "TRABALHADOR" is also a header keyword; the totaliser rule
        // must win or the skip section never engages.
        let text = "TOTALIZAÇÃO DO TRABALHADOR\n\
                    summary row without code\n\
                    Joana Souza 102233 Enfermeira";
        assert_eq!(clean(text), vec!["Joana Souza 102233 Enfermeira"]);
    }

    #[test]
    fn rubric_row_does_not_end_totaliser_skip() {
        let text = "TOTALIZA\n239001 RENDIMENTO 1,00\nMaria Lima 102233 Auxiliar";
        assert_eq!(clean(text), vec!["Maria Lima 102233 Auxiliar"]);
    }

    #[test]
    fn passthrough_keeps_everything() {
        let text = "--- Page 1 ---\n\nanything at all";
        assert_eq!(
            passthrough(text),
            vec!["--- Page 1 ---", "", "anything at all"]
        );
    }
}
