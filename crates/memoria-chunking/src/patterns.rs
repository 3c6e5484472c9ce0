// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled pattern tables used by the classifier, scorer, and segmenter.
//!
//! Every table is built once on first use and shared read-only afterwards.
//! Groups are plain `Vec<Regex>`; callers only ever ask whether *any* member
//! of a group matches.

use std::sync::LazyLock;

use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

fn compile_labelled(patterns: &[(&'static str, &str)]) -> Vec<(&'static str, Regex)> {
    patterns
        .iter()
        .map(|(label, p)| (*label, Regex::new(p).unwrap()))
        .collect()
}

/// Returns true if any pattern in `group` matches `text`.
pub(crate) fn matches_any(group: &[Regex], text: &str) -> bool {
    group.iter().any(|re| re.is_match(text))
}

/// Someone is stuck.
pub(crate) static PROBLEM: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(error|failed|issue|problem|bug|broken)",
        r"(?i)(not working|doesn't work|can't|unable to)",
        r"(?i)(exception|stack trace|traceback)",
        r"(?i)(help.*with|how.*to|need.*to)",
    ])
});

/// Something got resolved.
pub(crate) static SOLUTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(fixed|solved|resolved|implemented)",
        r"(?i)(here's.*fix|solution.*is|to solve)",
        r"(?i)(working.*now|successfully|completed)",
        r"(?i)(let me.*implement|i'll.*create|let's.*add)",
    ])
});

/// Code was written or changed.
pub(crate) static CODE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(function|class|method|variable)",
        r"(?i)(import|require|include)",
        r"(?i)(```|`.*`)",
        r"(?i)(file.*modified|changes.*to|updated.*file)",
    ])
});

pub(crate) static HIGH_IMPACT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(decided to|chose|switched from .* to|migrated from)",
        r"(?i)(architectural decision|design choice|went with)",
        r"(?i)(breaking change|major refactor|significant update)",
        r"(?i)(critical|important|significant|major)",
        r"(?i)(production|deployment|release|launch)",
        r"(?i)(security|vulnerability|exploit|authentication)",
    ])
});

pub(crate) static REUSABLE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(pattern|template|boilerplate|reusable)",
        r"(?i)(common.*approach|standard.*way|typical.*solution)",
        r"(?i)(utility|helper|library|framework)",
        r"(?i)(best practice|recommended|guideline)",
        r"(?i)(config|configuration|setup|initialization)",
    ])
});

/// Pitfalls worth remembering.
pub(crate) static GOTCHA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(watch out|careful|gotcha|common mistake|pitfall)",
        r"(?i)(troubleshooting|debugging tip|lesson learned)",
        r"(?i)(make sure to|don't forget|important note)",
        r"(?i)(avoid|never|don't.*do|warning)",
        r"(?i)(edge case|corner case|exception|special case)",
        r"(?i)(tricky|subtle|unexpected|surprising)",
    ])
});

pub(crate) static ARCHITECTURAL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(architecture|design|structure|organization)",
        r"(?i)(microservice|monolith|distributed|centralized)",
        r"(?i)(database|storage|persistence|cache)",
        r"(?i)(api|interface|contract|protocol)",
        r"(?i)(scalability|performance|reliability|availability)",
        r"(?i)(technology.*stack|tech.*choice|framework.*selection)",
    ])
});

pub(crate) static PERFORMANCE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(performance|optimization|speed|latency)",
        r"(?i)(memory.*usage|cpu.*usage|resource.*consumption)",
        r"(?i)(benchmark|profiling|monitoring|metrics)",
        r"(?i)(bottleneck|slow.*down|inefficient)",
        r"(?i)(caching|indexing|query.*optimization)",
    ])
});

/// Technology tags, matched on ASCII word boundaries against lower-cased content.
pub(crate) static TECH_TAGS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    compile_labelled(&[
        ("go", r"(?-u:\b)go(?-u:\b)|(?-u:\b)golang(?-u:\b)"),
        ("typescript", r"(?-u:\b)typescript(?-u:\b)|(?-u:\b)ts(?-u:\b)"),
        ("javascript", r"(?-u:\b)javascript(?-u:\b)|(?-u:\b)js(?-u:\b)"),
        ("python", r"(?-u:\b)python(?-u:\b)|(?-u:\b)py(?-u:\b)"),
        ("docker", r"(?-u:\b)docker(?-u:\b)|(?-u:\b)container(?-u:\b)"),
        ("git", r"(?-u:\b)git(?-u:\b)|(?-u:\b)commit(?-u:\b)|(?-u:\b)branch(?-u:\b)"),
        ("api", r"(?-u:\b)api(?-u:\b)|(?-u:\b)endpoint(?-u:\b)|(?-u:\b)rest(?-u:\b)"),
        ("database", r"(?-u:\b)database(?-u:\b)|(?-u:\b)db(?-u:\b)|(?-u:\b)sql(?-u:\b)"),
        ("test", r"(?-u:\b)test(?-u:\b)|(?-u:\b)testing(?-u:\b)|(?-u:\b)spec(?-u:\b)"),
        ("bug", r"(?-u:\b)bug(?-u:\b)|(?-u:\b)error(?-u:\b)|(?-u:\b)issue(?-u:\b)"),
        ("feature", r"(?-u:\b)feature(?-u:\b)|(?-u:\b)new(?-u:\b)|(?-u:\b)add(?-u:\b)"),
        ("refactor", r"(?-u:\b)refactor(?-u:\b)|(?-u:\b)cleanup(?-u:\b)|(?-u:\b)improve(?-u:\b)"),
    ])
});

/// Framework names, matched as plain substrings.
pub(crate) const FRAMEWORKS: &[&str] = &[
    "react", "vue", "angular", "express", "fastapi", "django", "flask",
];

/// Concept labels; boundaries are ASCII-only like the tag table.
pub(crate) static TECHNICAL_CONCEPTS: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| {
        compile_labelled(&[
            ("docker", r"(?i)(?-u:\b)(docker|container|image|dockerfile)(?-u:\b)"),
            ("kubernetes", r"(?i)(?-u:\b)(kubernetes|k8s|pod|service|deployment)(?-u:\b)"),
            ("database", r"(?i)(?-u:\b)(database|sql|nosql|postgres|mysql|mongodb)(?-u:\b)"),
            ("api", r"(?i)(?-u:\b)(api|rest|graphql|endpoint|http)(?-u:\b)"),
            ("security", r"(?i)(?-u:\b)(security|auth|jwt|oauth|ssl|tls)(?-u:\b)"),
            ("testing", r"(?i)(?-u:\b)(test|testing|unittest|integration|e2e)(?-u:\b)"),
            ("performance", r"(?i)(?-u:\b)(performance|optimization|cache|memory|cpu)(?-u:\b)"),
            ("monitoring", r"(?i)(?-u:\b)(monitoring|logging|metrics|observability)(?-u:\b)"),
        ])
    });

/// Words counted toward technical density.
pub(crate) const TECHNICAL_WORDS: &[&str] = &[
    "function", "class", "method", "api", "database", "server", "client", "config", "deploy",
    "test",
];

/// Lines that open a new conversation segment.
pub(crate) static SEGMENT_BOUNDARY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(Human|Assistant|User|AI|Claude):",
        r"^###|^---|^===",
        r"^\d+\.\s",
        r"^(Step|Task|Problem|Solution)[\s:]",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        for group in [
            &*PROBLEM,
            &*SOLUTION,
            &*CODE,
            &*HIGH_IMPACT,
            &*REUSABLE,
            &*GOTCHA,
            &*ARCHITECTURAL,
            &*PERFORMANCE,
            &*SEGMENT_BOUNDARY,
        ] {
            assert!(!group.is_empty());
        }
        assert_eq!(TECH_TAGS.len(), 12);
        assert_eq!(TECHNICAL_CONCEPTS.len(), 8);
    }

    #[test]
    fn boundary_markers() {
        for line in [
            "Human: hi",
            "Claude: hello",
            "### Setup",
            "---",
            "1. first",
            "Step 2",
            "Solution: restart",
        ] {
            assert!(matches_any(&SEGMENT_BOUNDARY, line), "{line}");
        }
        for line in ["  Human: indented", "human: lower", "1.5 liters", "Steps taken"] {
            assert!(!matches_any(&SEGMENT_BOUNDARY, line), "{line}");
        }
    }

    #[test]
    fn tech_tags_respect_word_boundaries() {
        let (_, go) = &TECH_TAGS[0];
        assert!(go.is_match("written in go today"));
        assert!(!go.is_match("going nowhere"));
    }

    #[test]
    fn non_ascii_letters_do_not_join_words() {
        let (_, go) = &TECH_TAGS[0];
        assert!(go.is_match("égo"));
        let (_, api) = &TECHNICAL_CONCEPTS[3];
        assert!(api.is_match("ñapi"));
        assert!(!api.is_match("rapid"));
    }
}
