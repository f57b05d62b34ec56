//! バイアスカテゴリ定義

/// 選択可能なバイアスカテゴリ（送信値, 表示名）
pub const BIAS_CATEGORIES: &[(&str, &str)] = &[
    ("age", "Age Discrimination"),
    ("gender", "Gender"),
    ("race", "Race & Ethnicity"),
    ("class", "Class & Socioeconomic Status"),
    ("ableism", "Ableism"),
];

/// 旧バージョンで使われていた値の別名
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("ageism", "age"),
    ("genderism", "gender"),
    ("colorism", "race"),
];

/// 表示名を取得（未知の値はそのまま返す）
pub fn display_name(bias_type: &str) -> String {
    let key = bias_type.trim().to_lowercase();
    let canonical = LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, value)| *value)
        .unwrap_or(key.as_str());

    BIAS_CATEGORIES
        .iter()
        .find(|(value, _)| *value == canonical)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| bias_type.to_string())
}

/// 送信値の一覧
pub fn category_values() -> impl Iterator<Item = &'static str> {
    BIAS_CATEGORIES.iter().map(|(value, _)| *value)
}
