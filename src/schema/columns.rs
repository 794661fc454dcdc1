// src/schema/columns.rs

/// 種類 (species)
pub const SPECIES: &str = "種類";
/// 毛色 (coat color)
pub const COLOR: &str = "毛色";
/// 性別 (sex)
pub const SEX: &str = "性別";
/// 生年月日 (birth date)
pub const BIRTH: &str = "生年月日";
/// 血統書団体名 (pedigree registry)
pub const PEDIGREE_ORG: &str = "血統書団体名";
/// 仕切書No (invoice identifier, the image lookup source)
pub const IDENTIFIER: &str = "仕切書No";
/// 画像URL (optional explicit image)
pub const IMAGE_URL: &str = "画像URL";

/// Columns every catalog must carry, in reporting order.
pub const REQUIRED: [&str; 6] = [SPECIES, COLOR, SEX, BIRTH, PEDIGREE_ORG, IDENTIFIER];

/// Recognized supplementary trait/defect columns. Any of them may be absent.
pub const TRAITS: [&str; 7] = [
    "臍ヘルニア",
    "膝蓋骨脱臼",
    "停留睾丸",
    "泉門開存",
    "咬合",
    "心雑音",
    "その他",
];
