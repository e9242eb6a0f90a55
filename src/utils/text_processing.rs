// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 卡片文本处理
//!
//! 空白规范化与容错的数字解析

use once_cell::sync::Lazy;
use regex::Regex;

// Optional sign, optional thousands groups, optional fraction.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?").expect("static number pattern")
});

/// 折叠连续空白并去除首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 提取文本中的第一个数字
///
/// 容忍前后的符号与单位，例如 `"4.2 stars"`、`"★ 3.67"`、`"1,234 reviews"`
pub fn first_number(text: &str) -> Option<f64> {
    let matched = NUMBER.find(text)?;
    matched.as_str().replace(',', "").parse::<f64>().ok()
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
