//! Emoji picker data
//!
//! A fixed palette grouped into categories. The picker shows one category
//! at a time and inserts the chosen emoji at the cursor.

/// A named group of emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiCategory {
    pub name: &'static str,
    pub emojis: &'static [&'static str],
}

const CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "Faces",
        emojis: &[
            "😀", "😃", "😄", "😁", "😅", "😂", "🤣", "😊", "😇", "🙂", "😉", "😌", "😍", "🥰",
            "😘",
        ],
    },
    EmojiCategory {
        name: "Gestures",
        emojis: &[
            "👍", "👎", "👌", "✌️", "🤞", "🤝", "👏", "🙌", "👐", "🤲", "💪", "🙏",
        ],
    },
    EmojiCategory {
        name: "Symbols",
        emojis: &[
            "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "⭐", "🌟", "✨", "💫", "🔥", "💯",
        ],
    },
    EmojiCategory {
        name: "Arrows",
        emojis: &["➡️", "⬅️", "⬆️", "⬇️", "↗️", "↘️", "↙️", "↖️", "↕️", "↔️"],
    },
    EmojiCategory {
        name: "Checks",
        emojis: &["✅", "❌", "⭕", "❗", "❓", "💡", "📌", "🔔", "📢", "🎯"],
    },
    EmojiCategory {
        name: "Other",
        emojis: &[
            "📁", "📂", "📄", "📝", "✏️", "📊", "📈", "📉", "🗓️", "⏰", "🔗", "🔒", "🔓",
        ],
    },
];

/// All categories, in picker order.
pub fn emoji_categories() -> &'static [EmojiCategory] {
    CATEGORIES
}

/// Look up a category by name (case-insensitive).
pub fn find_category(name: &str) -> Option<&'static EmojiCategory> {
    CATEGORIES
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(name))
}

/// Whether `emoji` is in the palette.
pub fn is_known_emoji(emoji: &str) -> bool {
    CATEGORIES
        .iter()
        .any(|category| category.emojis.contains(&emoji))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_six_categories() {
        let names: Vec<_> = emoji_categories().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["Faces", "Gestures", "Symbols", "Arrows", "Checks", "Other"]
        );
        assert!(emoji_categories().iter().all(|c| !c.emojis.is_empty()));
    }

    #[test]
    fn test_no_duplicates() {
        let mut seen = HashSet::new();
        for category in emoji_categories() {
            for emoji in category.emojis {
                assert!(seen.insert(*emoji), "duplicate emoji {}", emoji);
            }
        }
    }

    #[test]
    fn test_find_category() {
        assert_eq!(find_category("checks").map(|c| c.emojis[0]), Some("✅"));
        assert!(find_category("Animals").is_none());
    }

    #[test]
    fn test_is_known_emoji() {
        assert!(is_known_emoji("🔥"));
        assert!(is_known_emoji("✏️"));
        assert!(!is_known_emoji("x"));
    }
}
