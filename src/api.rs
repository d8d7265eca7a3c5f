use brickwall_shared::protocol::{
    GetChallengeRequest, GetCourseRequest, GetLeaderboardRequest, GetProgressRequest,
    GetSubmissionsRequest, ListChallengesRequest, ListCourseChallengesRequest, ListCoursesRequest,
    NextChallengeRequest, SubmitQueryCmd,
};
use brickwall_shared::{
    ChallengeDetail, ChallengeRef, ChallengeSummary, Course, DatabaseType, LeaderboardEntry,
    ProgressList, SubmissionList, SubmissionVerdict, SubmitQueryRequest,
};

use crate::error::{ApiError, ApiResult};
use crate::gateway::Gateway;
use crate::request::HttpClient;
use crate::session::KeyValueStore;

// =========================================================
// 页面兜底文案
// =========================================================

pub const COURSES_LOAD_FAILED: &str = "Failed to load courses.";
pub const COURSE_NOT_FOUND: &str = "Course not found.";
pub const COURSE_LOAD_FAILED: &str = "Failed to load course data.";
pub const CHALLENGES_LOAD_FAILED: &str = "Failed to load challenges.";
pub const DETAIL_LOAD_FAILED: &str = "Failed to load challenge details.";
pub const NEXT_CHALLENGE_FAILED: &str = "Failed to get next challenge.";
pub const SUBMIT_FAILED: &str = "Error occurred";
pub const QUERY_FAILED: &str = "Failed to execute query";
pub const PROFILE_LOAD_FAILED: &str = "Failed to load profile data.";
pub const LEADERBOARD_LOAD_FAILED: &str = "Failed to load leaderboard data.";
pub const HISTORY_LOAD_FAILED: &str = "Failed to load submissions.";

/// 课程页区分 404
pub fn course_error_message(err: &ApiError) -> String {
    if err.is_not_found() {
        COURSE_NOT_FOUND.to_string()
    } else {
        COURSE_LOAD_FAILED.to_string()
    }
}

// =========================================================
// 业务 API
// =========================================================

/// 课程页的首屏数据
#[derive(Debug, Clone, PartialEq)]
pub struct CoursePage {
    pub course: Course,
    pub challenges: Vec<ChallengeSummary>,
}

/// 个人资料页的首屏数据
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePage {
    pub progress: ProgressList,
    pub submissions: SubmissionList,
}

/// 按页面组织的类型化调用，全部经过网关
pub struct BrickwallApi<'a, C, S> {
    gateway: &'a Gateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> BrickwallApi<'a, C, S> {
    pub fn new(gateway: &'a Gateway<C, S>) -> Self {
        Self { gateway }
    }

    pub async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        Ok(self.gateway.send(&ListCoursesRequest).await?.courses)
    }

    /// 课程信息与题目列表并行加载，任一失败即整体失败
    pub async fn load_course_page(&self, course_id: &str) -> ApiResult<CoursePage> {
        let course_req = GetCourseRequest {
            course_id: course_id.to_string(),
        };
        let challenges_req = ListCourseChallengesRequest {
            course_id: course_id.to_string(),
        };
        let (course, challenges) = futures::try_join!(
            self.gateway.send(&course_req),
            self.gateway.send(&challenges_req)
        )?;
        Ok(CoursePage {
            course,
            challenges: challenges.challenges,
        })
    }

    pub async fn list_challenges(&self) -> ApiResult<Vec<ChallengeSummary>> {
        self.gateway.send(&ListChallengesRequest).await
    }

    pub async fn get_challenge(&self, challenge_id: u32) -> ApiResult<ChallengeDetail> {
        self.gateway.send(&GetChallengeRequest { challenge_id }).await
    }

    /// 服务端推荐的下一题；全部完成时为 None
    pub async fn next_challenge(&self) -> ApiResult<Option<ChallengeRef>> {
        let resp = self.gateway.send(&NextChallengeRequest).await?;
        if resp.next_challenge.is_none() {
            log_info!("[Api] No next challenge: {}", resp.message.as_deref().unwrap_or("-"));
        }
        Ok(resp.next_challenge)
    }

    pub async fn submit(
        &self,
        challenge_id: u32,
        user_query: &str,
        database_type: Option<DatabaseType>,
    ) -> ApiResult<SubmissionVerdict> {
        let cmd = SubmitQueryCmd {
            challenge_id,
            body: SubmitQueryRequest {
                user_query: user_query.to_string(),
                database_type,
            },
        };
        self.gateway.send(&cmd).await
    }

    pub async fn load_profile(&self) -> ApiResult<ProfilePage> {
        let submissions_req = GetSubmissionsRequest::default();
        let (progress, submissions) = futures::try_join!(
            self.gateway.send(&GetProgressRequest),
            self.gateway.send(&submissions_req)
        )?;
        Ok(ProfilePage {
            progress,
            submissions,
        })
    }

    pub async fn submissions_for(&self, challenge_id: u32) -> ApiResult<SubmissionList> {
        let req = GetSubmissionsRequest {
            challenge_id: Some(challenge_id),
        };
        self.gateway.send(&req).await
    }

    pub async fn leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        Ok(self.gateway.send(&GetLeaderboardRequest).await?.leaderboard)
    }
}
