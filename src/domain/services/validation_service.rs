// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ValidationSettings;
use crate::domain::models::professor::ProfessorRecord;
use crate::domain::models::raw_record::{FieldValue, RawRecord};
use crate::utils::errors::ConfigurationError;
use crate::utils::text_processing::{normalize_whitespace, round2};
use crate::utils::url_utils::host_matches;
use regex::Regex;
use thiserror::Error;
use url::Url;

/// 拒绝原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectionReason {
    #[error("name missing")]
    NameMissing,
    #[error("name length {0} outside allowed range")]
    NameLength(usize),
    #[error("department missing")]
    DepartmentMissing,
    #[error("department {0:?} does not match naming convention")]
    DepartmentPattern(String),
    #[error("rating {0} outside allowed range")]
    RatingOutOfRange(f64),
    #[error("review count {0} is negative")]
    NegativeReviewCount(f64),
    #[error("review count {0} is not integral")]
    NonIntegralReviewCount(f64),
    #[error("review count {0} is too large")]
    ReviewCountTooLarge(f64),
    #[error("url missing")]
    UrlMissing,
    #[error("url {0:?} is malformed")]
    UrlMalformed(String),
    #[error("url {0:?} does not match expected host/path")]
    UrlPattern(String),
}

/// 单条记录校验失败
#[derive(Error, Debug, Clone, PartialEq)]
#[error("record {card_id} rejected: {}", join_reasons(.reasons))]
pub struct RecordValidationError {
    pub card_id: String,
    pub reasons: Vec<RejectionReason>,
}

fn join_reasons(reasons: &[RejectionReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 校验结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationOutcome {
    pub reasons: Vec<RejectionReason>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// 记录校验器
///
/// 纯函数式校验：同一条原始记录总是得到相同的结果
pub struct RecordValidator {
    min_rating: f64,
    max_rating: f64,
    min_name_length: usize,
    max_name_length: usize,
    department_pattern: Regex,
    expected_host: String,
    url_path_pattern: Regex,
}

impl RecordValidator {
    pub fn new(settings: &ValidationSettings) -> Result<Self, ConfigurationError> {
        let department_pattern = Regex::new(&settings.department_pattern).map_err(|source| {
            ConfigurationError::InvalidPattern {
                field: "validation.department_pattern",
                source,
            }
        })?;
        let url_path_pattern = Regex::new(&settings.url_path_pattern).map_err(|source| {
            ConfigurationError::InvalidPattern {
                field: "validation.url_path_pattern",
                source,
            }
        })?;

        Ok(Self {
            min_rating: settings.min_rating,
            max_rating: settings.max_rating,
            min_name_length: settings.min_name_length,
            max_name_length: settings.max_name_length,
            department_pattern,
            expected_host: settings.expected_host.clone(),
            url_path_pattern,
        })
    }

    /// 检查原始记录，返回全部拒绝原因
    pub fn check(&self, raw: &RawRecord) -> ValidationOutcome {
        let mut reasons = Vec::new();

        match &raw.name {
            FieldValue::Present(name) => {
                let length = clean_name(name).chars().count();
                if length == 0 {
                    reasons.push(RejectionReason::NameMissing);
                } else if length < self.min_name_length || length > self.max_name_length {
                    reasons.push(RejectionReason::NameLength(length));
                }
            }
            _ => reasons.push(RejectionReason::NameMissing),
        }

        match &raw.department {
            FieldValue::Present(department) => {
                let department = normalize_department(department);
                if department.is_empty() {
                    reasons.push(RejectionReason::DepartmentMissing);
                } else if !self.department_pattern.is_match(&department) {
                    reasons.push(RejectionReason::DepartmentPattern(department));
                }
            }
            _ => reasons.push(RejectionReason::DepartmentMissing),
        }

        if let FieldValue::Present(rating) = raw.rating {
            if !(self.min_rating..=self.max_rating).contains(&rating) {
                reasons.push(RejectionReason::RatingOutOfRange(rating));
            }
        }

        if let FieldValue::Present(count) = raw.review_count {
            if count < 0.0 {
                reasons.push(RejectionReason::NegativeReviewCount(count));
            } else if count.fract() != 0.0 {
                reasons.push(RejectionReason::NonIntegralReviewCount(count));
            } else if count >= u64::MAX as f64 {
                reasons.push(RejectionReason::ReviewCountTooLarge(count));
            }
        }

        match &raw.url {
            FieldValue::Present(url) => match Url::parse(url) {
                Ok(parsed) => {
                    if !host_matches(&parsed, &self.expected_host)
                        || !self.url_path_pattern.is_match(parsed.path())
                    {
                        reasons.push(RejectionReason::UrlPattern(url.clone()));
                    }
                }
                Err(_) => reasons.push(RejectionReason::UrlMalformed(url.clone())),
            },
            FieldValue::Unparseable(raw_href) => {
                reasons.push(RejectionReason::UrlMalformed(raw_href.clone()))
            }
            FieldValue::Missing => reasons.push(RejectionReason::UrlMissing),
        }

        ValidationOutcome { reasons }
    }

    /// 校验并生成最终记录
    ///
    /// 未评分或评分无法解析时 `rating` 为 `None`，评价数同理
    pub fn validate(&self, raw: RawRecord) -> Result<ProfessorRecord, RecordValidationError> {
        let outcome = self.check(&raw);

        match (outcome.is_valid(), raw.name, raw.department, raw.url) {
            (
                true,
                FieldValue::Present(name),
                FieldValue::Present(department),
                FieldValue::Present(url),
            ) => Ok(ProfessorRecord {
                name: clean_name(&name),
                department: normalize_department(&department),
                rating: raw.rating.as_present().copied().map(round2),
                review_count: raw.review_count.as_present().map(|count| *count as u64),
                url,
                scraped_at: raw.scraped_at,
            }),
            _ => Err(RecordValidationError {
                card_id: raw.card_id,
                reasons: outcome.reasons,
            }),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c.is_whitespace() || matches!(c, ',' | '.' | '\'' | '-')
}

/// 姓名清洗：去掉字母、空白和 `, . ' -` 以外的字符并折叠空白
pub fn clean_name(name: &str) -> String {
    normalize_whitespace(&name.chars().filter(|c| is_name_char(*c)).collect::<String>())
}

/// 院系名称规范化：折叠空白并转为大写
pub fn normalize_department(department: &str) -> String {
    normalize_whitespace(department).to_uppercase()
}
