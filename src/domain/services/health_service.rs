// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MonitorSettings;
use crate::domain::models::professor::ScrapeResult;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// 健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// 数据新鲜且完整
    Healthy,
    /// 数据新鲜但可能不完整
    Warning,
    /// 数据过期或不可用
    Critical,
}

impl HealthStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Warning => 1,
            HealthStatus::Critical => 2,
        }
    }
}

/// 健康检查发现的问题
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Stale { age_hours: i64 },
    LowProfessorCount { total: usize },
    ModerateProfessorCount { total: usize },
    LowRatingCoverage { coverage: f64 },
    LowDepartmentCoverage { coverage: f64 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Stale { age_hours } => write!(f, "data is {} hours old", age_hours),
            Finding::LowProfessorCount { total } => {
                write!(f, "low professor count ({}); scraper may not be working", total)
            }
            Finding::ModerateProfessorCount { total } => {
                write!(f, "moderate professor count ({}); some data may be missing", total)
            }
            Finding::LowRatingCoverage { coverage } => {
                write!(f, "many professors missing ratings ({:.1}% covered)", coverage * 100.0)
            }
            Finding::LowDepartmentCoverage { coverage } => write!(
                f,
                "many professors missing department info ({:.1}% covered)",
                coverage * 100.0
            ),
        }
    }
}

/// 健康报告
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub scraped_at: DateTime<Utc>,
    pub age_seconds: i64,
    pub is_fresh: bool,
    pub total_professors: usize,
    pub with_ratings: usize,
    pub with_reviews: usize,
    pub with_departments: usize,
    pub departments_count: usize,
    pub avg_rating: f64,
    /// 以评分整数部分为键
    pub rating_distribution: BTreeMap<u32, usize>,
    pub findings: Vec<Finding>,
    pub status: HealthStatus,
}

/// 评估已写出的抓取结果
pub fn assess(result: &ScrapeResult, now: DateTime<Utc>, settings: &MonitorSettings) -> HealthReport {
    // 时间戳晚于当前时间（时钟偏差）时按零计
    let age = (now - result.scraped_at).max(Duration::zero());
    let is_fresh = age <= Duration::hours(settings.max_age_hours);

    let professors = &result.professors;
    let total = professors.len();
    let ratings: Vec<f64> = professors.iter().filter_map(|p| p.rating).collect();
    let with_reviews = professors
        .iter()
        .filter(|p| p.review_count.is_some_and(|count| count > 0))
        .count();
    let departments: HashSet<&str> = professors
        .iter()
        .map(|p| p.department.trim())
        .filter(|d| !d.is_empty())
        .collect();
    let with_departments = professors
        .iter()
        .filter(|p| !p.department.trim().is_empty())
        .count();

    let mut rating_distribution = BTreeMap::new();
    for rating in &ratings {
        *rating_distribution.entry(rating.floor() as u32).or_insert(0) += 1;
    }

    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    let mut findings = Vec::new();
    if !is_fresh {
        findings.push(Finding::Stale {
            age_hours: age.num_hours(),
        });
    }
    if total < settings.low_count_threshold {
        findings.push(Finding::LowProfessorCount { total });
    } else if total < settings.healthy_count_threshold {
        findings.push(Finding::ModerateProfessorCount { total });
    }
    let rating_coverage = coverage(ratings.len(), total);
    if rating_coverage < settings.min_coverage {
        findings.push(Finding::LowRatingCoverage {
            coverage: rating_coverage,
        });
    }
    let department_coverage = coverage(with_departments, total);
    if department_coverage < settings.min_coverage {
        findings.push(Finding::LowDepartmentCoverage {
            coverage: department_coverage,
        });
    }

    let status = if !is_fresh {
        HealthStatus::Critical
    } else if total >= settings.healthy_count_threshold {
        HealthStatus::Healthy
    } else {
        HealthStatus::Warning
    };

    HealthReport {
        scraped_at: result.scraped_at,
        age_seconds: age.num_seconds(),
        is_fresh,
        total_professors: total,
        with_ratings: ratings.len(),
        with_reviews,
        with_departments,
        departments_count: departments.len(),
        avg_rating,
        rating_distribution,
        findings,
        status,
    }
}

fn coverage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn percent(count: usize, total: usize) -> f64 {
    coverage(count, total) * 100.0
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_professors;
        writeln!(f, "PolyRatings scraper health report")?;
        writeln!(f, "  total professors:     {}", total)?;
        writeln!(f, "  last scraped:         {}", self.scraped_at.to_rfc3339())?;
        writeln!(
            f,
            "  data age:             {}h {}m ({})",
            self.age_seconds / 3600,
            (self.age_seconds % 3600) / 60,
            if self.is_fresh { "fresh" } else { "stale" }
        )?;
        writeln!(
            f,
            "  with ratings:         {} ({:.1}%)",
            self.with_ratings,
            percent(self.with_ratings, total)
        )?;
        writeln!(
            f,
            "  with reviews:         {} ({:.1}%)",
            self.with_reviews,
            percent(self.with_reviews, total)
        )?;
        writeln!(
            f,
            "  with departments:     {} ({:.1}%)",
            self.with_departments,
            percent(self.with_departments, total)
        )?;
        writeln!(f, "  unique departments:   {}", self.departments_count)?;
        writeln!(f, "  average rating:       {:.2}", self.avg_rating)?;
        writeln!(f, "  rating distribution:")?;
        for (bucket, count) in &self.rating_distribution {
            let share = percent(*count, self.with_ratings);
            writeln!(
                f,
                "    {}: {:4} ({:5.1}%) {}",
                bucket,
                count,
                share,
                "#".repeat((share / 5.0) as usize)
            )?;
        }
        for finding in &self.findings {
            writeln!(f, "  ! {}", finding)?;
        }
        write!(f, "  status: {:?}", self.status)
    }
}
