//! Word level diff between an expected and an actual value.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Present in the actual value only.
    Added,
    /// Present in the expected value only.
    Removed,
    Common,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Common => "common",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub value: String,
}

/// Splits in words and runs of whitespace, whitespace is kept so that segments concatenate
/// back to the original strings.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in s.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&s[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < s.len() {
        tokens.push(&s[start..]);
    }
    tokens
}

fn push(segments: &mut Vec<Segment>, kind: SegmentKind, token: &str) {
    if let Some(last) = segments.last_mut() {
        if last.kind == kind {
            last.value.push_str(token);
            return;
        }
    }
    segments.push(Segment {
        kind,
        value: token.to_string(),
    });
}

/// Longest common subsequence over the tokens of both strings. Removed segments come before
/// the added ones they are replaced by.
pub fn diff_words(expected: &str, actual: &str) -> Vec<Segment> {
    let a = tokenize(expected);
    let b = tokenize(actual);

    // lcs[i][j] is the length of the longest common subsequence of a[i..] and b[j..].
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut segments = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            push(&mut segments, SegmentKind::Common, a[i]);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            push(&mut segments, SegmentKind::Removed, a[i]);
            i += 1;
        } else {
            push(&mut segments, SegmentKind::Added, b[j]);
            j += 1;
        }
    }
    for token in &a[i..] {
        push(&mut segments, SegmentKind::Removed, token);
    }
    for token in &b[j..] {
        push(&mut segments, SegmentKind::Added, token);
    }
    segments
}
