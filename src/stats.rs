//! 个人资料与排行榜的派生数据

use brickwall_shared::{Course, LeaderboardEntry, ProgressList, SubmissionItem, SubmissionList};

use crate::redirect::auth_entry_path;

// =========================================================
// Profile
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileSummary {
    pub solved: usize,
    pub total_submissions: usize,
    pub successful_submissions: usize,
}

impl ProfileSummary {
    pub fn new(progress: &ProgressList, submissions: &SubmissionList) -> Self {
        Self {
            solved: progress.progress.len(),
            total_submissions: submissions.submissions.len(),
            successful_submissions: submissions.submissions.iter().filter(|s| s.passed).count(),
        }
    }

    /// 成功率，保留一位小数；没有提交时为 `"0"`
    pub fn success_rate_label(&self) -> String {
        if self.total_submissions == 0 {
            return "0".to_string();
        }
        let rate = self.successful_submissions as f64 / self.total_submissions as f64 * 100.0;
        format!("{:.1}", rate)
    }
}

/// 资料页只展示最近的提交
pub const RECENT_SUBMISSIONS: usize = 10;

pub fn recent_submissions(list: &SubmissionList) -> &[SubmissionItem] {
    let end = list.submissions.len().min(RECENT_SUBMISSIONS);
    &list.submissions[..end]
}

// =========================================================
// Leaderboard
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTone {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl RankTone {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => RankTone::Gold,
            2 => RankTone::Silver,
            3 => RankTone::Bronze,
            _ => RankTone::Plain,
        }
    }
}

pub fn rank_badge(rank: u32) -> String {
    match rank {
        1 => "🏆".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{}", n),
    }
}

/// 效率条宽度（百分比），超过 100 的按满格显示
pub fn efficiency_bar_width(rate: f64) -> f64 {
    rate.clamp(0.0, 100.0)
}

pub fn is_current_user(entry: &LeaderboardEntry, email: Option<&str>) -> bool {
    email.is_some_and(|email| entry.email == email)
}

// =========================================================
// Course catalog
// =========================================================

/// 点击课程卡片后的目标地址
///
/// 不可用的课程返回 None（不响应点击）；未登录时先去认证入口并带上回跳地址。
pub fn course_entry_target(course: &Course, signed_in: bool, auth_route: &str) -> Option<String> {
    if !course.is_available {
        return None;
    }
    let path = format!("/courses/{}", course.id);
    if signed_in {
        Some(path)
    } else {
        Some(auth_entry_path(auth_route, Some(&path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwall_shared::{ProgressItem, SubmissionItem};

    fn submission(passed: bool) -> SubmissionItem {
        SubmissionItem {
            challenge_id: 1,
            challenge_name: "Select All Products".into(),
            query: "SELECT * FROM products".into(),
            passed,
            submitted_at: None,
        }
    }

    fn course(id: &str, available: bool) -> Course {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "SQL Fundamentals",
            "is_available": available
        }))
        .unwrap()
    }

    #[test]
    fn test_success_rate() {
        let progress = ProgressList {
            progress: vec![ProgressItem {
                challenge_id: 1,
                challenge_name: "Select All Products".into(),
                level: Default::default(),
                solved_at: None,
                attempts: 3,
            }],
        };
        let submissions = SubmissionList {
            submissions: vec![submission(true), submission(false), submission(false)],
        };
        let summary = ProfileSummary::new(&progress, &submissions);
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.success_rate_label(), "33.3");

        let empty = ProfileSummary::new(&ProgressList { progress: vec![] }, &SubmissionList { submissions: vec![] });
        assert_eq!(empty.success_rate_label(), "0");

        let all = SubmissionList { submissions: vec![submission(true)] };
        assert_eq!(ProfileSummary::new(&progress, &all).success_rate_label(), "100.0");
    }

    #[test]
    fn test_recent_submissions_capped() {
        let list = SubmissionList {
            submissions: (0..15).map(|i| submission(i % 2 == 0)).collect(),
        };
        assert_eq!(recent_submissions(&list).len(), RECENT_SUBMISSIONS);
        assert!(recent_submissions(&SubmissionList { submissions: vec![] }).is_empty());
    }

    #[test]
    fn test_rank_badges() {
        assert_eq!(rank_badge(1), "🏆");
        assert_eq!(rank_badge(2), "🥈");
        assert_eq!(rank_badge(3), "🥉");
        assert_eq!(rank_badge(4), "#4");
        assert_eq!(RankTone::for_rank(2), RankTone::Silver);
        assert_eq!(RankTone::for_rank(10), RankTone::Plain);
    }

    #[test]
    fn test_efficiency_bar_width() {
        assert_eq!(efficiency_bar_width(45.5), 45.5);
        assert_eq!(efficiency_bar_width(150.0), 100.0);
        assert_eq!(efficiency_bar_width(-1.0), 0.0);
    }

    #[test]
    fn test_course_entry_target() {
        assert_eq!(course_entry_target(&course("nosql", false), true, "/landing"), None);
        assert_eq!(
            course_entry_target(&course("sql", true), true, "/landing").as_deref(),
            Some("/courses/sql")
        );
        assert_eq!(
            course_entry_target(&course("sql", true), false, "/landing").as_deref(),
            Some("/landing?redirect=%2Fcourses%2Fsql")
        );
    }
}
