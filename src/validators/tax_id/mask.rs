//! Positional masks for tax identifiers.
//!
//! Mask syntax: `#` digit, `A` ASCII letter, optionally followed by `{n}`
//! to size the slot. Any other character is a literal separator that is
//! inserted automatically.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Digit,
    Alpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SlotKind,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskToken {
    Literal(char),
    Segment(Segment),
}

pub(super) fn parse_mask(mask: &str) -> Vec<MaskToken> {
    let chars: Vec<char> = mask.chars().collect();
    let mut tokens = Vec::<MaskToken>::new();
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];
        let kind = match ch {
            '#' => Some(SlotKind::Digit),
            'A' => Some(SlotKind::Alpha),
            _ => None,
        };

        if let Some(kind) = kind {
            let (len, next_idx) = parse_quantifier(&chars, idx + 1);
            tokens.push(MaskToken::Segment(Segment { kind, len }));
            idx = next_idx;
            continue;
        }

        tokens.push(MaskToken::Literal(ch));
        idx += 1;
    }

    tokens
}

fn parse_quantifier(chars: &[char], idx: usize) -> (usize, usize) {
    if chars.get(idx) != Some(&'{') {
        return (1, idx);
    }
    let digits: String = chars[idx + 1..]
        .iter()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    let close = idx + 1 + digits.len();
    match digits.parse::<usize>() {
        Ok(len) if chars.get(close) == Some(&'}') => (len, close + 1),
        _ => (1, idx),
    }
}

pub(super) fn token_accepts(kind: SlotKind, ch: char) -> bool {
    match kind {
        SlotKind::Digit => ch.is_ascii_digit(),
        SlotKind::Alpha => ch.is_ascii_alphabetic(),
    }
}

/// Appends `ch` at the end of `sequence` if the slot at that position takes it.
///
/// A literal slot at the end is filled with its separator and `ch` is
/// dropped. Filling the last slot of a segment also appends the separator
/// that follows it. Characters the slot does not accept, and characters past
/// the end of the mask, leave the sequence unchanged.
pub(super) fn push_char(tokens: &[MaskToken], ch: char, sequence: &[char]) -> Vec<char> {
    let mut out = sequence.to_vec();
    let len = out.len();
    let mut start = 0usize;

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            MaskToken::Literal(literal) => {
                if len == start {
                    out.push(*literal);
                    return out;
                }
                start += 1;
            }
            MaskToken::Segment(segment) => {
                let end = start + segment.len;
                if len < end {
                    if token_accepts(segment.kind, ch) {
                        out.push(ch);
                        if out.len() == end
                            && let Some(MaskToken::Literal(next)) = tokens.get(idx + 1)
                        {
                            out.push(*next);
                        }
                    }
                    return out;
                }
                start = end;
            }
        }
    }

    out
}

/// Placeholder string for the mask: `_` per slot, literals as-is.
pub(super) fn template(tokens: &[MaskToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            MaskToken::Literal(ch) => out.push(*ch),
            MaskToken::Segment(segment) => {
                out.extend(std::iter::repeat_n('_', segment.len));
            }
        }
    }
    out
}

/// Typed characters over the template; extra characters are appended.
pub(super) fn overlay(template: &str, sequence: &[char]) -> String {
    let placeholders: Vec<char> = template.chars().collect();
    let len = placeholders.len().max(sequence.len());
    (0..len)
        .filter_map(|idx| sequence.get(idx).or_else(|| placeholders.get(idx)).copied())
        .collect()
}
