//! Paired marks that are opened but never closed, or closed but never opened.

use jiaodui_model::{Category, IssueLocation, PayloadField, ProofreadingIssue, Severity};

use crate::{EVIDENCE_RADIUS, EvalContext, Rule, RuleError, RuleMeta};

const PAIRS: [(char, char); 5] = [('“', '”'), ('‘', '’'), ('《', '》'), ('（', '）'), ('【', '】')];

/// Checks balance of paired full-width marks, one paragraph at a time.
///
/// Quotations commonly span sentences but not paragraphs, so the stacks are
/// reset at every line break.
pub struct UnpairedMarksRule {
    meta: RuleMeta,
}

impl UnpairedMarksRule {
    pub fn new() -> Self {
        let meta = RuleMeta::new("C-PUNCT-UNPAIRED", Category::C)
            .with_subcategory("paired-mark")
            .with_severity(Severity::Warning)
            .with_confidence(0.85)
            .with_priority(45)
            .with_description("Unbalanced paired punctuation");
        Self { meta }
    }

    fn unmatched_in_paragraph(paragraph: &str, base: usize, out: &mut Vec<(usize, char)>) {
        let mut stacks: Vec<Vec<usize>> = vec![Vec::new(); PAIRS.len()];

        let mut prev = None;
        let mut chars = paragraph.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            let next = chars.peek().map(|&(_, next)| next);
            let before = prev.replace(c);
            if c == '’' && is_apostrophe(before, next) {
                continue;
            }

            for (pair, (open, close)) in PAIRS.iter().enumerate() {
                if c == *open {
                    stacks[pair].push(base + idx);
                } else if c == *close && stacks[pair].pop().is_none() {
                    out.push((base + idx, c));
                }
            }
        }

        for (pair, stack) in stacks.iter().enumerate() {
            out.extend(stack.iter().map(|&pos| (pos, PAIRS[pair].0)));
        }
    }
}

/// `’` between two Latin letters, as in "it’s", is an apostrophe.
fn is_apostrophe(before: Option<char>, after: Option<char>) -> bool {
    before.is_some_and(|c| c.is_ascii_alphabetic()) && after.is_some_and(|c| c.is_ascii_alphabetic())
}

impl Default for UnpairedMarksRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for UnpairedMarksRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RuleMeta {
        &mut self.meta
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Vec<ProofreadingIssue>, RuleError> {
        let text = ctx.content();
        let mut unmatched = Vec::new();
        let mut base = 0;

        for paragraph in text.as_str().split_inclusive('\n') {
            Self::unmatched_in_paragraph(paragraph, base, &mut unmatched);
            base += paragraph.len();
        }
        unmatched.sort_unstable();

        let issues = unmatched
            .into_iter()
            .map(|(start, mark)| {
                let end = start + mark.len_utf8();
                self.meta
                    .issue(format!("成对标点“{mark}”缺少与之配对的另一半"))
                    .with_location(IssueLocation::span(
                        PayloadField::Content,
                        text.char_offset(start),
                        1,
                    ))
                    .with_evidence(text.window(start, end, EVIDENCE_RADIUS))
            })
            .collect();

        Ok(issues)
    }

    fn definition(&self) -> String {
        let pairs: String = PAIRS.iter().flat_map(|(open, close)| [*open, *close]).collect();
        format!("unpaired:{pairs}")
    }
}
