use std::sync::LazyLock;

use regex::Regex;

pub fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((idx, _)) => &s[..idx],
    }
}

static PIXIV_LINK_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:https?:\/\/)?(?:www\.)?pixiv\.net\/(?:(?:en\/)?artworks\/|i\/|member_illust\.php\?(?:[^#]*&)?illust_id=))?([0-9]+)\/?(?:[#\?&].*)?$")
        .expect("Pixiv link regex construct failed.")
});

/// Accepts a bare illust id or any of the artwork link shapes pixiv hands out.
pub fn parse_illust_id(input: &str) -> Option<u64> {
    PIXIV_LINK_ID_REGEX
        .captures(input.trim())?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}
