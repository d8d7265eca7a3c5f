use crate::{
    AuthResponse, ChallengeDetail, ChallengeSummary, Course, CourseChallenges, CourseList,
    Credentials, Leaderboard, NextChallengeResponse, ProgressList, SubmissionList,
    SubmissionVerdict, SubmitQueryRequest,
};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The JSON body sent with the request (`()` for bodiless requests).
    type Body: Serialize;
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the endpoint requires a bearer token.
    const PROTECTED: bool = true;

    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

// =========================================================
// Auth
// =========================================================

/// `POST /auth/signup`
#[derive(Debug, Clone)]
pub struct SignupRequest(pub Credentials);

impl ApiRequest for SignupRequest {
    type Body = Credentials;
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PROTECTED: bool = false;

    fn path(&self) -> String {
        "/auth/signup".to_string()
    }

    fn body(&self) -> Option<&Credentials> {
        Some(&self.0)
    }
}

/// `POST /auth/login`
#[derive(Debug, Clone)]
pub struct LoginRequest(pub Credentials);

impl ApiRequest for LoginRequest {
    type Body = Credentials;
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PROTECTED: bool = false;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<&Credentials> {
        Some(&self.0)
    }
}

// =========================================================
// Courses
// =========================================================

/// `GET /courses` (public: the catalog is browsable without a session)
#[derive(Debug, Clone)]
pub struct ListCoursesRequest;

impl ApiRequest for ListCoursesRequest {
    type Body = ();
    type Response = CourseList;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PROTECTED: bool = false;

    fn path(&self) -> String {
        "/courses".to_string()
    }
}

/// `GET /courses/{id}`
#[derive(Debug, Clone)]
pub struct GetCourseRequest {
    pub course_id: String,
}

impl ApiRequest for GetCourseRequest {
    type Body = ();
    type Response = Course;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/courses/{}", self.course_id)
    }
}

/// `GET /courses/{id}/challenges`
#[derive(Debug, Clone)]
pub struct ListCourseChallengesRequest {
    pub course_id: String,
}

impl ApiRequest for ListCourseChallengesRequest {
    type Body = ();
    type Response = CourseChallenges;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/courses/{}/challenges", self.course_id)
    }
}

// =========================================================
// Challenges
// =========================================================

/// `GET /challenges`
#[derive(Debug, Clone)]
pub struct ListChallengesRequest;

impl ApiRequest for ListChallengesRequest {
    type Body = ();
    type Response = Vec<ChallengeSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/challenges".to_string()
    }
}

/// `GET /challenges/{id}`
#[derive(Debug, Clone)]
pub struct GetChallengeRequest {
    pub challenge_id: u32,
}

impl ApiRequest for GetChallengeRequest {
    type Body = ();
    type Response = ChallengeDetail;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/challenges/{}", self.challenge_id)
    }
}

/// `GET /challenges/next`
#[derive(Debug, Clone)]
pub struct NextChallengeRequest;

impl ApiRequest for NextChallengeRequest {
    type Body = ();
    type Response = NextChallengeResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/challenges/next".to_string()
    }
}

/// `POST /challenges/{id}/submit`
#[derive(Debug, Clone)]
pub struct SubmitQueryCmd {
    pub challenge_id: u32,
    pub body: SubmitQueryRequest,
}

impl ApiRequest for SubmitQueryCmd {
    type Body = SubmitQueryRequest;
    type Response = SubmissionVerdict;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/challenges/{}/submit", self.challenge_id)
    }

    fn body(&self) -> Option<&SubmitQueryRequest> {
        Some(&self.body)
    }
}

// =========================================================
// User
// =========================================================

/// `GET /user/progress`
#[derive(Debug, Clone)]
pub struct GetProgressRequest;

impl ApiRequest for GetProgressRequest {
    type Body = ();
    type Response = ProgressList;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/user/progress".to_string()
    }
}

/// `GET /user/submissions`, optionally narrowed to one challenge
#[derive(Debug, Clone, Default)]
pub struct GetSubmissionsRequest {
    pub challenge_id: Option<u32>,
}

impl ApiRequest for GetSubmissionsRequest {
    type Body = ();
    type Response = SubmissionList;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.challenge_id {
            Some(id) => format!("/user/submissions?challenge_id={}", id),
            None => "/user/submissions".to_string(),
        }
    }
}

/// `GET /leaderboard`
#[derive(Debug, Clone)]
pub struct GetLeaderboardRequest;

impl ApiRequest for GetLeaderboardRequest {
    type Body = ();
    type Response = Leaderboard;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/leaderboard".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            GetCourseRequest { course_id: "sql".into() }.path(),
            "/courses/sql"
        );
        assert_eq!(
            ListCourseChallengesRequest { course_id: "sql".into() }.path(),
            "/courses/sql/challenges"
        );
        assert_eq!(
            SubmitQueryCmd {
                challenge_id: 7,
                body: SubmitQueryRequest {
                    user_query: "SELECT 1".into(),
                    database_type: None,
                },
            }
            .path(),
            "/challenges/7/submit"
        );
        assert_eq!(
            GetSubmissionsRequest { challenge_id: Some(3) }.path(),
            "/user/submissions?challenge_id=3"
        );
    }

    #[test]
    fn test_auth_endpoints_are_public() {
        assert!(!LoginRequest::PROTECTED);
        assert!(!SignupRequest::PROTECTED);
        assert!(!ListCoursesRequest::PROTECTED);
        assert!(ListChallengesRequest::PROTECTED);
        assert!(GetLeaderboardRequest::PROTECTED);
    }
}
