//! Stack-based header tracking over a single forward scan.
//!
//! Markdown headers form a hierarchy without explicit closers: a header at
//! level N implicitly closes every open header at level N or deeper. The
//! tracker maintains that hierarchy as a stack whose levels strictly
//! increase from bottom to top, and treats fenced code blocks as opaque so
//! a `# comment` inside a fence never becomes structure.

/// One entry of the active header stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Number of leading `#` markers. Levels beyond the conventional six
    /// are tracked as-is rather than clamped.
    pub level: usize,
    /// Header title with surrounding whitespace trimmed.
    pub text: String,
}

/// What one scanned line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Regular content. Fence markers and everything inside a fenced block
    /// land here.
    Content,
    /// A header outside any fence. The stack has already been updated;
    /// `rendered` is the normalized header line that opens the new section.
    Header { rendered: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Backtick,
    Tilde,
}

/// Tracks header nesting and fence state while scanning lines.
#[derive(Debug, Clone, Default)]
pub struct HeaderTracker {
    stack: Vec<HeaderEntry>,
    fence: Option<Fence>,
}

impl HeaderTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its trailing newline) to the tracker.
    ///
    /// On a header line this pops every stack entry at the same or deeper
    /// level, pushes the new header, and reports it as
    /// [`LineOutcome::Header`]. An H2 arriving after an H3 therefore
    /// discards both the H3 and the previous H2.
    pub fn observe(&mut self, line: &str) -> LineOutcome {
        use regex::Regex;
        use std::sync::LazyLock;

        // One or more `#` markers, whitespace, then a non-empty title.
        static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+(.+)").unwrap());

        let stripped = line.trim_start();
        if stripped.starts_with("```") {
            self.toggle_fence(Fence::Backtick);
            return LineOutcome::Content;
        }
        if stripped.starts_with("~~~") {
            self.toggle_fence(Fence::Tilde);
            return LineOutcome::Content;
        }

        if self.fence.is_none()
            && let Some(caps) = HEADER_RE.captures(line)
        {
            let level = caps[1].len();
            let text = caps[2].trim().to_string();
            while self.stack.last().is_some_and(|top| top.level >= level) {
                self.stack.pop();
            }
            let rendered = format!("{} {}\n", "#".repeat(level), text);
            self.stack.push(HeaderEntry { level, text });
            return LineOutcome::Header { rendered };
        }

        LineOutcome::Content
    }

    fn toggle_fence(&mut self, kind: Fence) {
        match self.fence {
            None => self.fence = Some(kind),
            Some(open) if open == kind => self.fence = None,
            // A mismatched marker inside an open fence is plain content.
            Some(_) => {}
        }
    }

    /// Slash-delimited path of the active stack, bottom to top: `/A/B/`,
    /// or `/` when no header is active.
    pub fn path(&self) -> String {
        if self.stack.is_empty() {
            return "/".to_string();
        }
        let mut path = String::from("/");
        for entry in &self.stack {
            path.push_str(&entry.text);
            path.push('/');
        }
        path
    }

    /// The active stack, bottom to top.
    pub fn stack(&self) -> &[HeaderEntry] {
        &self.stack
    }

    /// Whether the scan position is inside a fenced code block.
    pub fn in_fence(&self) -> bool {
        self.fence.is_some()
    }
}
