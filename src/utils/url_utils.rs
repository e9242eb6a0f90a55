// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将卡片中的链接解析为绝对地址
///
/// 空链接和片段链接（`#...`）视为无效
pub fn resolve_link(base_url: &Url, href: &str) -> Result<Url, ParseError> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return Err(ParseError::EmptyHost);
    }
    base_url.join(href)
}

/// 判断地址的主机名是否与期望值一致（忽略大小写）
pub fn host_matches(url: &Url, expected_host: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(expected_host))
}
