//! Document outline
//!
//! Builds a heading tree from raw markdown text. Headings are recognised
//! line by line (ATX style only) and nested with a stack, so the tree is
//! always rebuilt from scratch rather than patched.

// ─────────────────────────────────────────────────────────────────────────────
// OutlineNode
// ─────────────────────────────────────────────────────────────────────────────

/// A single heading and the headings nested under it.
///
/// A child's `level` is always strictly greater than its parent's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Heading text with the `#` marks and closing hashes removed
    pub title: String,
    /// Heading level (1-6 for H1-H6)
    pub level: u8,
    /// Line of the heading in the source text (0-based)
    pub source_line: usize,
    /// Nested headings in document order
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn new(level: u8, title: String, source_line: usize) -> Self {
        Self {
            title,
            level,
            source_line,
            children: Vec::new(),
        }
    }

    /// Number of headings in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::subtree_len).sum::<usize>()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered forest of headings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub roots: Vec<OutlineNode>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of headings in the tree.
    pub fn heading_count(&self) -> usize {
        self.roots.iter().map(OutlineNode::subtree_len).sum()
    }

    /// All nodes in document order (pre-order traversal).
    pub fn flatten(&self) -> Vec<&OutlineNode> {
        fn walk<'a>(nodes: &'a [OutlineNode], out: &mut Vec<&'a OutlineNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut out);
        out
    }

    /// Find the heading whose section contains `line` (0-based).
    ///
    /// Returns `None` if the line is before the first heading.
    pub fn find_section(&self, line: usize) -> Option<&OutlineNode> {
        self.flatten()
            .into_iter()
            .take_while(|node| node.source_line <= line)
            .last()
    }

    /// Get the number of headings at each level.
    pub fn level_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for node in self.flatten() {
            if (1..=6).contains(&node.level) {
                counts[(node.level - 1) as usize] += 1;
            }
        }
        counts
    }

    /// Get a summary string like "3 H1, 5 H2, 2 H3"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .level_counts()
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, count)| format!("{} H{}", count, i + 1))
            .collect();
        if parts.is_empty() {
            "No headings".to_string()
        } else {
            parts.join(", ")
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extract the heading tree from raw markdown text.
///
/// Nesting follows a stack: before a heading is placed, every open heading
/// at the same or a deeper level is closed. A level-3 heading directly
/// after a level-1 heading therefore becomes a child of the level-1 node.
pub fn extract_outline(text: &str) -> Outline {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let Some((level, title)) = parse_heading(line) else {
            continue;
        };

        while stack.last().is_some_and(|top| top.level >= level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::new(level, title, line_idx));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    Outline { roots }
}

/// Pop the innermost open heading and attach it to its parent (or the roots).
fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Parse an ATX heading line.
///
/// A line is a heading iff it starts with 1-6 `#` characters followed by
/// whitespace. Returns `Some((level, title))`.
pub fn parse_heading(line: &str) -> Option<(u8, String)> {
    let hash_count = line.bytes().take_while(|&b| b == b'#').count();
    if hash_count == 0 || hash_count > 6 {
        return None;
    }

    let rest = &line[hash_count..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    // Optional closing sequence: "## Title ##"
    let title = rest.trim();
    let title = match title.trim_end_matches('#') {
        stripped if stripped.is_empty() || stripped.ends_with(char::is_whitespace) => {
            stripped.trim_end()
        }
        _ => title,
    };

    Some((hash_count as u8, title.to_string()))
}

/// Whether `line` is a heading line.
pub fn is_heading(line: &str) -> bool {
    parse_heading(line).is_some()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extraction Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_document() {
        let outline = extract_outline("");
        assert!(outline.is_empty());
        assert_eq!(outline.heading_count(), 0);
    }

    #[test]
    fn test_nested_scenario() {
        let outline = extract_outline("# A\n## B\n# C");

        assert_eq!(titles(&outline.roots), vec!["A", "C"]);
        let a = &outline.roots[0];
        assert_eq!(a.level, 1);
        assert_eq!(a.source_line, 0);
        assert_eq!(titles(&a.children), vec!["B"]);
        assert_eq!(a.children[0].level, 2);
        assert_eq!(a.children[0].source_line, 1);
        assert!(a.children[0].children.is_empty());

        let c = &outline.roots[1];
        assert_eq!(c.level, 1);
        assert_eq!(c.source_line, 2);
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_skipped_level_nests_under_shallower_ancestor() {
        let outline = extract_outline("# Top\n### Deep\n## Mid");
        assert_eq!(outline.roots.len(), 1);
        let top = &outline.roots[0];
        assert_eq!(titles(&top.children), vec!["Deep", "Mid"]);
        assert_eq!(top.children[0].level, 3);
    }

    #[test]
    fn test_document_starting_below_h1() {
        let outline = extract_outline("### Three\n## Two\n# One");
        assert_eq!(titles(&outline.roots), vec!["Three", "Two", "One"]);
    }

    #[test]
    fn test_siblings_keep_document_order() {
        let outline = extract_outline("# A\n## B1\n## B2\n### C\n## B3");
        let a = &outline.roots[0];
        assert_eq!(titles(&a.children), vec!["B1", "B2", "B3"]);
        assert_eq!(titles(&a.children[1].children), vec!["C"]);
    }

    #[test]
    fn test_child_level_strictly_greater_than_parent() {
        fn check(node: &OutlineNode) {
            for child in &node.children {
                assert!(child.level > node.level);
                check(child);
            }
        }
        let text = "## x\n# a\n#### b\n### c\n###### d\n## e\n# f\n### g";
        for root in &extract_outline(text).roots {
            check(root);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "# Intro\ntext\n## Setup\n### Linux\n## Usage\n# End";
        assert_eq!(extract_outline(text), extract_outline(text));
    }

    #[test]
    fn test_all_heading_levels() {
        let text = "# 1\n## 2\n### 3\n#### 4\n##### 5\n###### 6";
        let outline = extract_outline(text);
        assert_eq!(outline.heading_count(), 6);
        assert_eq!(outline.level_counts(), [1, 1, 1, 1, 1, 1]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Heading Line Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_not_a_heading_no_space() {
        assert!(parse_heading("#NotAHeading").is_none());
        assert!(parse_heading("#").is_none());
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert!(parse_heading("####### too deep").is_none());
    }

    #[test]
    fn test_indented_line_is_not_a_heading() {
        assert!(parse_heading("  # indented").is_none());
    }

    #[test]
    fn test_tab_after_hashes() {
        assert_eq!(parse_heading("##\tTabbed"), Some((2, "Tabbed".to_string())));
    }

    #[test]
    fn test_closing_hashes_removed() {
        assert_eq!(parse_heading("## Title ##"), Some((2, "Title".to_string())));
        // Hashes glued to a word are part of the title
        assert_eq!(parse_heading("# C#"), Some((1, "C#".to_string())));
    }

    #[test]
    fn test_empty_heading() {
        assert_eq!(parse_heading("# "), Some((1, String::new())));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outline Helper Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_flatten_document_order() {
        let outline = extract_outline("# A\n## B\n### C\n# D");
        let flat: Vec<&str> = outline.flatten().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(flat, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_find_section() {
        let text = "intro\n# A\ntext\n## B\nmore\n# C";
        let outline = extract_outline(text);
        assert!(outline.find_section(0).is_none());
        assert_eq!(outline.find_section(2).map(|n| n.title.as_str()), Some("A"));
        assert_eq!(outline.find_section(4).map(|n| n.title.as_str()), Some("B"));
        assert_eq!(outline.find_section(99).map(|n| n.title.as_str()), Some("C"));
    }

    #[test]
    fn test_summary() {
        let outline = extract_outline("# H1\n## H2\n## H2\n### H3");
        assert_eq!(outline.summary(), "1 H1, 2 H2, 1 H3");
        assert_eq!(extract_outline("plain").summary(), "No headings");
    }
}
