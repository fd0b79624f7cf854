//! Keyword classification of group names
//!
//! A pure, ordered rule list mapping a name to the collection or category it
//! most likely belongs to. The first matching rule wins. Used by the offline
//! backfill tool only; nothing on the serving path calls it.

use regex_lite::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Whether a tag names a collection or a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Collection,
    Category,
}

/// Classification outcome, named after the seeded collections and
/// categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryTag {
    Idol,
    Family,
    Dorm,
    ThreePeople,
    FourPeople,
    FivePeople,
    SixPeople,
    Risque,
    Abstract,
    Cute,
    Literary,
    Prank,
    Funny,
}

impl CategoryTag {
    /// Display name of the collection or category this tag resolves to
    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::Idol => "爱豆群名大全",
            CategoryTag::Family => "家庭群名大全",
            CategoryTag::Dorm => "寝室群名",
            CategoryTag::ThreePeople => "三人群名大全",
            CategoryTag::FourPeople => "四人群名大全",
            CategoryTag::FivePeople => "五人群名大全",
            CategoryTag::SixPeople => "六人群名大全",
            CategoryTag::Risque => "污妖",
            CategoryTag::Abstract => "抽象",
            CategoryTag::Cute => "可爱",
            CategoryTag::Literary => "文艺",
            CategoryTag::Prank => "恶搞",
            CategoryTag::Funny => "搞笑",
        }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            CategoryTag::Idol
            | CategoryTag::Family
            | CategoryTag::Dorm
            | CategoryTag::ThreePeople
            | CategoryTag::FourPeople
            | CategoryTag::FivePeople
            | CategoryTag::SixPeople => TagKind::Collection,
            _ => TagKind::Category,
        }
    }
}

struct Rule {
    tag: CategoryTag,
    matches: fn(&str) -> bool,
}

fn any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

/// Headcount rule: the word form, or the bare digit unless it is part of
/// the hundred (`300` is a room number, not a group size).
fn headcount(name: &str, word: &str, digit: char, hundred: &str) -> bool {
    name.contains(word) || (name.contains(digit) && !name.contains(hundred))
}

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[^\x{4e00}-\x{9fa5}a-zA-Z0-9\s]").expect("symbol pattern is valid")
    })
}

/// Count of characters that are neither CJK ideographs, ASCII
/// alphanumerics nor whitespace, in UTF-16 units (an emoji outside the
/// BMP counts twice).
pub fn symbol_count(name: &str) -> usize {
    symbol_pattern()
        .find_iter(name)
        .map(|m| m.as_str().encode_utf16().count())
        .sum()
}

const RULES: &[Rule] = &[
    Rule {
        tag: CategoryTag::Idol,
        matches: |n| {
            any(n, &["粉丝", "后援会", "偶像", "爱豆", "tfboys", "tf"])
                || (n.contains("老婆") && any(n, &["杨洋", "鹿晗"]))
                || (n.contains("少女") && any(n, &["时代", "snh48"]))
        },
    },
    Rule {
        tag: CategoryTag::Family,
        matches: |n| {
            any(n, &[
                "家庭", "父子", "母子", "兄弟", "姐妹", "爸爸", "妈妈", "爷爷", "奶奶",
                "一家", "相亲相爱", "亲情",
            ])
        },
    },
    Rule {
        tag: CategoryTag::Dorm,
        matches: |n| any(n, &["寝室", "宿舍", "室友", "舍友", "203", "302", "404"]),
    },
    Rule {
        tag: CategoryTag::ThreePeople,
        matches: |n| headcount(n, "三人", '3', "300"),
    },
    Rule {
        tag: CategoryTag::FourPeople,
        matches: |n| headcount(n, "四人", '4', "400"),
    },
    Rule {
        tag: CategoryTag::FivePeople,
        matches: |n| headcount(n, "五人", '5', "500"),
    },
    Rule {
        tag: CategoryTag::SixPeople,
        matches: |n| headcount(n, "六人", '6', "600"),
    },
    Rule {
        tag: CategoryTag::Risque,
        matches: |n| {
            any(n, &[
                "污", "摸胸", "奶", "胸", "臀", "骚", "约炮", "sex", "做爱", "阴茎", "阴部",
                "屄", "逼", "操", "肏", "日",
            ]) || (n.contains('干') && !n.contains("干净"))
        },
    },
    Rule {
        tag: CategoryTag::Abstract,
        matches: |n| {
            any(n, &[
                "抽象", "难懂", "无厘头", "怪", "奇", "异", "魑魅魍魉", "饕餮", "蟾蜍", "乱码",
            ]) || (n.contains("符号") && n.encode_utf16().count() < 10)
                || symbol_count(n) > 3
        },
    },
    Rule {
        tag: CategoryTag::Cute,
        matches: |n| {
            any(n, &[
                "萌", "可爱", "小", "宝宝", "宝贝", "贝贝", "喵", "汪", "兔", "熊", "猪",
                "奶糖", "甜甜", "糖", "棉花糖",
            ]) || (n.contains("少女") && !n.contains("时代"))
        },
    },
    Rule {
        tag: CategoryTag::Literary,
        matches: |n| {
            any(n, &[
                "文艺", "诗", "花", "云", "雨", "风", "月", "星", "夜", "梦", "情", "心",
                "时光", "青春", "回忆", "岁月", "流年", "人生", "红尘", "繁华", "似锦", "木槿",
                "昔年", "粲然",
            ])
        },
    },
    Rule {
        tag: CategoryTag::Prank,
        matches: |n| any(n, &["恶搞", "整蛊", "嘲讽", "黑", "喷", "怼", "吐槽", "骂"]),
    },
    Rule {
        tag: CategoryTag::Funny,
        matches: |n| {
            any(n, &[
                "笑", "逗", "欢乐", "哈哈", "嘿嘿", "嘻嘻", "乐", "开心", "快乐", "高兴", "喜悦",
            ])
        },
    },
];

/// Classify a group name. Matching is case-insensitive; `None` when no
/// rule applies.
pub fn classify(name: &str) -> Option<CategoryTag> {
    let name = name.to_lowercase();
    RULES.iter().find(|rule| (rule.matches)(&name)).map(|rule| rule.tag)
}

/// Like [`classify`], falling back to [`CategoryTag::Funny`]
pub fn classify_or_default(name: &str) -> CategoryTag {
    classify(name).unwrap_or(CategoryTag::Funny)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_take_precedence() {
        // "宝宝" alone would be Cute, but family rules come first.
        assert_eq!(classify("相亲相爱一家人宝宝群"), Some(CategoryTag::Family));
        assert_eq!(classify("TFBOYS后援会"), Some(CategoryTag::Idol));
        assert_eq!(classify("404宿舍"), Some(CategoryTag::Dorm));
    }

    #[test]
    fn test_headcount_rules() {
        assert_eq!(classify("三人行必有我师"), Some(CategoryTag::ThreePeople));
        assert_eq!(classify("4个憨憨"), Some(CategoryTag::FourPeople));
        assert_eq!(classify("六人成团"), Some(CategoryTag::SixPeople));
        // 300 is excluded from the three-person rule but still contains no
        // other trigger.
        assert_eq!(classify("斯巴达300勇士"), None);
    }

    #[test]
    fn test_category_rules() {
        assert_eq!(classify("喵星人集合"), Some(CategoryTag::Cute));
        assert_eq!(classify("岁月静好"), Some(CategoryTag::Literary));
        assert_eq!(classify("吐槽大会"), Some(CategoryTag::Prank));
        assert_eq!(classify("哈哈哈哈"), Some(CategoryTag::Funny));
        // "心" is a literary keyword and that rule runs first.
        assert_eq!(classify("开开心心"), Some(CategoryTag::Literary));
        assert_eq!(classify("干净整洁"), None);
        assert_eq!(classify("干饭人"), Some(CategoryTag::Risque));
    }

    #[test]
    fn test_symbol_heavy_names_are_abstract() {
        assert_eq!(symbol_count("@#$%"), 4);
        assert_eq!(symbol_count("普通 群名 abc"), 0);
        assert_eq!(classify("@#$%^"), Some(CategoryTag::Abstract));
        assert_eq!(classify("@#$"), None);
    }

    #[test]
    fn test_astral_symbols_count_as_two_units() {
        assert_eq!(symbol_count("😀"), 2);
        assert_eq!(symbol_count("@😀"), 3);
        assert_eq!(classify("@😀"), None);
        assert_eq!(classify("😀😀"), Some(CategoryTag::Abstract));
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(classify("没有关键词"), None);
        assert_eq!(classify_or_default("没有关键词"), CategoryTag::Funny);
    }

    #[test]
    fn test_tag_kinds() {
        assert_eq!(CategoryTag::Dorm.kind(), TagKind::Collection);
        assert_eq!(CategoryTag::Funny.kind(), TagKind::Category);
        assert_eq!(CategoryTag::Abstract.label(), "抽象");
    }
}
