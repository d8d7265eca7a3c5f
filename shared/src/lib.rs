//! Brickwall Academy 共享模型
//!
//! 远程 API 的线上数据结构（请求体 / 响应体），前端与核心库共用。
//! 这里只描述数据的形状，不包含任何业务判断。

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

pub use chrono;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// LocalStorage 中保存 token 的键
pub const STORAGE_TOKEN_KEY: &str = "token";
/// LocalStorage 中保存用户邮箱的键
pub const STORAGE_EMAIL_KEY: &str = "userEmail";

/// 登录页上一次性消费的重定向参数名
pub const REDIRECT_PARAM: &str = "redirect";

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub email: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// =========================================================
// 课程 (Courses)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub solved: u32,
    pub total: u32,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub challenge_count: Option<u32>,
    #[serde(default)]
    pub is_available: bool,
    /// 只有 `GET /courses/{id}` 会带上进度
    #[serde(default)]
    pub progress: Option<CourseProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseList {
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChallenges {
    pub challenges: Vec<ChallengeSummary>,
}

// =========================================================
// 挑战 (Challenges)
// =========================================================

/// 挑战难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Level {
    Basic,
    Intermediate,
    Advanced,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Basic => "Basic",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 列表中的挑战条目
///
/// `solved` / `attempts` / `solved_at` 是本地可乐观修改的部分，
/// 其余字段完全由服务端决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub solved: bool,
    #[serde(default)]
    pub solved_at: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaTable {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub schema_tables: Vec<SchemaTable>,
    #[serde(default)]
    pub solved: Option<bool>,
    #[serde(default)]
    pub attempts: Option<u32>,
    /// 非 SQL 课程的题型（如选择题）
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// 指向另一个挑战的轻量引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextChallengeResponse {
    #[serde(default)]
    pub next_challenge: Option<ChallengeRef>,
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// 提交 (Submission)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Sqlite,
    Duckdb,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 2] = [DatabaseType::Sqlite, DatabaseType::Duckdb];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Duckdb => "duckdb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "SQLite",
            DatabaseType::Duckdb => "DuckDB",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|db| db.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQueryRequest {
    pub user_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<DatabaseType>,
}

/// 结果表中的单元格，服务端可能返回字符串、数字或 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

pub type Row = Vec<Cell>;

/// 一次提交的判定结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionVerdict {
    pub passed: bool,
    #[serde(default)]
    pub result: Vec<Row>,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub expected: Option<Vec<Row>>,
    #[serde(default)]
    pub expected_column_names: Option<Vec<String>>,
    #[serde(default)]
    pub next_challenge: Option<ChallengeRef>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

// =========================================================
// 用户 (Profile / Leaderboard)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub challenge_id: u32,
    pub challenge_name: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub solved_at: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressList {
    pub progress: Vec<ProgressItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub challenge_id: u32,
    pub challenge_name: String,
    #[serde(default)]
    pub query: String,
    pub passed: bool,
    #[serde(default)]
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionList {
    pub submissions: Vec<SubmissionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub email: String,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub challenges_solved: u32,
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub efficiency_rate: f64,
    #[serde(default)]
    pub last_solved: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leaderboard: Vec<LeaderboardEntry>,
}

// =========================================================
// 错误体 (Error Body)
// =========================================================

/// 服务端错误体：`{"detail": "..."}` 或校验失败时的 `{"detail": [{"msg": ...}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ValidationItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub msg: String,
}

impl ErrorBody {
    /// 提取可直接展示给用户的消息，空消息视为没有
    pub fn message(&self) -> Option<String> {
        let msg = match &self.detail {
            ErrorDetail::Message(m) => m.trim().to_string(),
            ErrorDetail::Items(items) => items
                .iter()
                .map(|i| i.msg.trim())
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
        };
        if msg.is_empty() { None } else { Some(msg) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_summary_defaults() {
        let c: ChallengeSummary =
            serde_json::from_str(r#"{"id": 1, "name": "Select All", "level": "Basic"}"#).unwrap();
        assert!(!c.solved);
        assert_eq!(c.attempts, 0);
        assert_eq!(c.level, Level::Basic);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let c: ChallengeRef =
            serde_json::from_str(r#"{"id": 2, "name": "x", "level": "Expert"}"#).unwrap();
        assert_eq!(c.level, Level::Unknown);
    }

    #[test]
    fn test_verdict_with_mixed_cells() {
        let v: SubmissionVerdict = serde_json::from_str(
            r#"{"passed": false,
                "result": [[1, "Laptop", 1200.5, null]],
                "column_names": ["id", "name", "price", "category"],
                "expected": [["1", "Laptop", "1200", "Electronics"]],
                "expected_column_names": ["id", "name", "price", "category"]}"#,
        )
        .unwrap();
        assert_eq!(
            v.result[0],
            vec![
                Cell::Integer(1),
                Cell::Text("Laptop".into()),
                Cell::Float(1200.5),
                Cell::Null
            ]
        );
        assert_eq!(v.result[0][3].to_string(), "NULL");
        assert!(v.next_challenge.is_none());
        assert_eq!(v.expected.as_ref().map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_submit_request_omits_missing_database() {
        let body = SubmitQueryRequest {
            user_query: "SELECT 1".into(),
            database_type: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"user_query":"SELECT 1"}"#
        );

        let body = SubmitQueryRequest {
            user_query: "SELECT 1".into(),
            database_type: Some(DatabaseType::Duckdb),
        };
        assert!(serde_json::to_string(&body)
            .unwrap()
            .contains(r#""database_type":"duckdb""#));
    }

    #[test]
    fn test_error_body_message_forms() {
        let plain: ErrorBody = serde_json::from_str(r#"{"detail": "Invalid SQL syntax"}"#).unwrap();
        assert_eq!(plain.message().as_deref(), Some("Invalid SQL syntax"));

        let items: ErrorBody = serde_json::from_str(
            r#"{"detail": [{"msg": "value is not a valid email address", "loc": ["body", "email"]}]}"#,
        )
        .unwrap();
        assert_eq!(
            items.message().as_deref(),
            Some("value is not a valid email address")
        );

        let blank: ErrorBody = serde_json::from_str(r#"{"detail": "  "}"#).unwrap();
        assert_eq!(blank.message(), None);
    }

    #[test]
    fn test_database_type_parse() {
        assert_eq!(DatabaseType::parse("duckdb"), Some(DatabaseType::Duckdb));
        assert_eq!(DatabaseType::parse("postgres"), None);
    }
}
