//! 挑战目录 Reducer
//!
//! 列表由服务端权威数据与本地乐观补丁两部分组成：
//! - 每次提交得到判定后，本地立即 `attempts + 1`，通过时标记 solved
//! - 列表重新拉取时，覆盖拉取发出前的所有补丁，重放拉取期间新产生的补丁
//! - 选择挑战带有票据，过期的详情响应直接丢弃

use std::fmt;

use brickwall_shared::date::now_rfc3339;
use brickwall_shared::{ChallengeDetail, ChallengeRef, ChallengeSummary, SubmissionVerdict};

// =========================================================
// 票据 (Tickets)
// =========================================================

/// 列表拉取票据：记录发出时的补丁版本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    seq: u64,
    revision: u64,
}

/// 选择票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectTicket {
    seq: u64,
    challenge_id: u32,
    revision: u64,
}

impl SelectTicket {
    pub fn challenge_id(&self) -> u32 {
        self.challenge_id
    }
}

/// 提交票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    selection: u64,
    challenge_id: u32,
}

impl SubmitTicket {
    pub fn challenge_id(&self) -> u32 {
        self.challenge_id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Patch {
    revision: u64,
    challenge_id: u32,
    passed: bool,
    at: String,
}

impl Patch {
    fn apply(&self, item: &mut ChallengeSummary) {
        item.attempts += 1;
        if self.passed {
            if !item.solved || item.solved_at.is_none() {
                item.solved_at = Some(self.at.clone());
            }
            item.solved = true;
        }
    }
}

// =========================================================
// 进度
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub solved: usize,
    pub total: usize,
}

impl ProgressSummary {
    pub fn from_items(items: &[ChallengeSummary]) -> Self {
        Self {
            solved: items.iter().filter(|c| c.solved).count(),
            total: items.len(),
        }
    }

    /// 0..=100
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.solved as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} solved", self.solved, self.total)
    }
}

/// 列表项上的尝试次数标签，0 次时不展示
pub fn attempts_label(attempts: u32) -> Option<String> {
    match attempts {
        0 => None,
        1 => Some("1 attempt".to_string()),
        n => Some(format!("{} attempts", n)),
    }
}

// =========================================================
// Reducer
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<ChallengeSummary>,

    // 乐观补丁
    revision: u64,
    patches: Vec<Patch>,

    // 列表拉取
    list_issued: u64,
    list_applied: Option<u64>,
    list_base: u64,

    // 选择 & 提交
    selection_seq: u64,
    selection_revision: u64,
    selected: Option<u32>,
    detail: Option<ChallengeDetail>,
    loading_detail: bool,
    verdict: Option<SubmissionVerdict>,
    error: Option<String>,
    submitting: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn items(&self) -> &[ChallengeSummary] {
        &self.items
    }

    pub fn item(&self, challenge_id: u32) -> Option<&ChallengeSummary> {
        self.items.iter().find(|c| c.id == challenge_id)
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn detail(&self) -> Option<&ChallengeDetail> {
        self.detail.as_ref()
    }

    pub fn is_loading_detail(&self) -> bool {
        self.loading_detail
    }

    pub fn verdict(&self) -> Option<&SubmissionVerdict> {
        self.verdict.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::from_items(&self.items)
    }

    /// 通过后服务端推荐的下一题
    pub fn next_step(&self) -> Option<&ChallengeRef> {
        self.verdict
            .as_ref()
            .filter(|v| v.passed)
            .and_then(|v| v.next_challenge.as_ref())
    }

    /// 页面级内联错误（如 "Failed to get next challenge."）
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    // --- 列表 ---

    pub fn begin_list_fetch(&mut self) -> ListTicket {
        self.list_issued += 1;
        ListTicket {
            seq: self.list_issued,
            revision: self.revision,
        }
    }

    /// 应用权威列表；比已应用列表更早发出的响应被丢弃
    pub fn apply_list(&mut self, ticket: ListTicket, items: Vec<ChallengeSummary>) -> bool {
        if self.list_applied.is_some_and(|applied| ticket.seq < applied) {
            log_warn!("[Catalog] Dropping stale list response #{}", ticket.seq);
            return false;
        }

        self.items = items;
        self.list_applied = Some(ticket.seq);
        self.list_base = self.list_base.max(ticket.revision);
        self.patches.retain(|p| p.revision > ticket.revision);
        for patch in &self.patches {
            if let Some(item) = self.items.iter_mut().find(|c| c.id == patch.challenge_id) {
                patch.apply(item);
            }
        }

        // 新列表到达后选择失效，在途的详情响应也随之作废
        self.clear_selection();
        self.prune_patches();
        true
    }

    fn clear_selection(&mut self) {
        self.selection_seq += 1;
        self.selected = None;
        self.detail = None;
        self.loading_detail = false;
        self.verdict = None;
        self.error = None;
    }

    fn list_pending(&self) -> bool {
        self.list_applied.map_or(self.list_issued > 0, |applied| applied < self.list_issued)
    }

    /// 丢弃不会再被任何在途响应用到的补丁
    ///
    /// 列表响应需要比其票据更新的补丁；当前选择的详情响应需要比选择时更新的补丁。
    fn prune_patches(&mut self) {
        if self.list_pending() {
            return;
        }
        let floor = if self.loading_detail {
            self.selection_revision
        } else {
            self.revision
        };
        self.patches.retain(|p| p.revision > floor);
    }

    // --- 选择 ---

    /// 选择挑战：立即清除判定与错误，旧的详情请求作废
    pub fn select(&mut self, challenge_id: u32) -> SelectTicket {
        self.selection_seq += 1;
        self.selection_revision = self.revision;
        self.selected = Some(challenge_id);
        self.detail = None;
        self.loading_detail = true;
        self.verdict = None;
        self.error = None;
        self.prune_patches();
        SelectTicket {
            seq: self.selection_seq,
            challenge_id,
            revision: self.revision,
        }
    }

    pub fn is_current(&self, ticket: &SelectTicket) -> bool {
        ticket.seq == self.selection_seq
    }

    /// 应用详情响应；返回 false 表示该响应已过期
    pub fn apply_detail(&mut self, ticket: SelectTicket, detail: ChallengeDetail) -> bool {
        if !self.is_current(&ticket) {
            log_info!("[Catalog] Dropping detail for superseded selection {}", ticket.challenge_id);
            return false;
        }

        // 详情中的 solved / attempts 同样是权威数据，但不能早于最近一次列表
        if ticket.revision >= self.list_base {
            self.sync_item(&ticket, &detail);
        }

        self.detail = Some(detail);
        self.loading_detail = false;
        self.prune_patches();
        true
    }

    pub fn detail_failed(&mut self, ticket: SelectTicket, message: impl Into<String>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.loading_detail = false;
        self.error = Some(message.into());
        self.prune_patches();
        true
    }

    fn sync_item(&mut self, ticket: &SelectTicket, detail: &ChallengeDetail) {
        let Some(item) = self.items.iter_mut().find(|c| c.id == ticket.challenge_id) else {
            return;
        };
        if let Some(solved) = detail.solved {
            item.solved = solved;
        }
        if let Some(attempts) = detail.attempts {
            item.attempts = attempts;
        }
        for patch in self
            .patches
            .iter()
            .filter(|p| p.revision > ticket.revision && p.challenge_id == ticket.challenge_id)
        {
            patch.apply(item);
        }
    }

    // --- 提交 ---

    /// 开始提交；没有选中挑战或已有提交在途时返回 None
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if self.submitting {
            return None;
        }
        let challenge_id = self.selected?;
        self.submitting = true;
        self.verdict = None;
        self.error = None;
        Some(SubmitTicket {
            selection: self.selection_seq,
            challenge_id,
        })
    }

    /// 收到判定：无论是否仍选中该题，补丁都会落到列表上
    pub fn apply_verdict(&mut self, ticket: SubmitTicket, verdict: SubmissionVerdict) {
        self.submitting = false;
        self.record_attempt(ticket.challenge_id, verdict.passed, now_rfc3339());
        if ticket.selection == self.selection_seq {
            self.verdict = Some(verdict);
        }
    }

    /// 提交被拒绝（非 401）：不算一次尝试
    pub fn submit_failed(&mut self, ticket: SubmitTicket, message: impl Into<String>) {
        self.submitting = false;
        if ticket.selection == self.selection_seq {
            self.error = Some(message.into());
        }
    }

    /// 会话失效等导致提交中断：只清除在途标记
    pub fn abort_submit(&mut self, _ticket: SubmitTicket) {
        self.submitting = false;
    }

    fn record_attempt(&mut self, challenge_id: u32, passed: bool, at: String) {
        self.revision += 1;
        let patch = Patch {
            revision: self.revision,
            challenge_id,
            passed,
            at,
        };
        if let Some(item) = self.items.iter_mut().find(|c| c.id == challenge_id) {
            patch.apply(item);
        }
        self.patches.push(patch);
        self.prune_patches();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwall_shared::Level;

    fn summary(id: u32, solved: bool, attempts: u32) -> ChallengeSummary {
        ChallengeSummary {
            id,
            name: format!("Challenge {}", id),
            level: Level::Basic,
            solved,
            solved_at: None,
            attempts,
        }
    }

    fn detail(id: u32) -> ChallengeDetail {
        ChallengeDetail {
            id,
            name: format!("Challenge {}", id),
            level: Level::Basic,
            question: "Select everything".into(),
            schema_tables: vec![],
            solved: None,
            attempts: None,
            kind: None,
            options: None,
        }
    }

    fn verdict(passed: bool) -> SubmissionVerdict {
        SubmissionVerdict {
            passed,
            result: vec![],
            column_names: vec![],
            expected: None,
            expected_column_names: None,
            next_challenge: None,
            message: None,
            correct_answer: None,
            explanation: None,
        }
    }

    fn loaded(items: Vec<ChallengeSummary>) -> Catalog {
        let mut catalog = Catalog::new();
        let ticket = catalog.begin_list_fetch();
        catalog.apply_list(ticket, items);
        catalog
    }

    fn submit(catalog: &mut Catalog, id: u32, passed: bool) {
        catalog.select(id);
        let ticket = catalog.begin_submit().unwrap();
        catalog.apply_verdict(ticket, verdict(passed));
    }

    #[test]
    fn test_pass_marks_solved_without_refetch() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        submit(&mut catalog, 1, true);

        let item = catalog.item(1).unwrap();
        assert_eq!(item.attempts, 1);
        assert!(item.solved);
        assert!(item.solved_at.is_some());
        assert_eq!(catalog.progress().to_string(), "1 of 2 solved");
        assert_eq!(catalog.progress().percentage(), 50.0);
    }

    #[test]
    fn test_fail_only_counts_attempt() {
        let mut catalog = loaded(vec![summary(1, false, 2)]);
        submit(&mut catalog, 1, false);

        let item = catalog.item(1).unwrap();
        assert_eq!(item.attempts, 3);
        assert!(!item.solved);
        assert!(item.solved_at.is_none());
        assert_eq!(attempts_label(item.attempts).as_deref(), Some("3 attempts"));
        assert_eq!(attempts_label(1).as_deref(), Some("1 attempt"));
        assert_eq!(attempts_label(0), None);
    }

    #[test]
    fn test_refetch_overrides_earlier_patches() {
        let mut catalog = loaded(vec![summary(1, false, 0)]);
        submit(&mut catalog, 1, false);
        assert_eq!(catalog.item(1).unwrap().attempts, 1);

        // 服务端已计入该次尝试
        let ticket = catalog.begin_list_fetch();
        catalog.apply_list(ticket, vec![summary(1, false, 1)]);
        assert_eq!(catalog.item(1).unwrap().attempts, 1);
    }

    #[test]
    fn test_patches_during_fetch_are_reapplied() {
        let mut catalog = loaded(vec![summary(1, false, 0)]);
        let ticket = catalog.begin_list_fetch();
        submit(&mut catalog, 1, true);

        // 响应在提交之前生成，不包含这次通过
        catalog.apply_list(ticket, vec![summary(1, false, 0)]);
        let item = catalog.item(1).unwrap();
        assert_eq!(item.attempts, 1);
        assert!(item.solved);
    }

    #[test]
    fn test_out_of_order_list_responses() {
        let mut catalog = Catalog::new();
        let older = catalog.begin_list_fetch();
        let newer = catalog.begin_list_fetch();

        assert!(catalog.apply_list(newer, vec![summary(1, true, 4)]));
        assert!(!catalog.apply_list(older, vec![summary(1, false, 0)]));
        assert!(catalog.item(1).unwrap().solved);
    }

    #[test]
    fn test_stale_detail_is_dropped() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        let first = catalog.select(1);
        let second = catalog.select(2);

        assert!(!catalog.apply_detail(first, detail(1)));
        assert!(catalog.detail().is_none());
        assert!(catalog.is_loading_detail());

        assert!(catalog.apply_detail(second, detail(2)));
        assert_eq!(catalog.detail().map(|d| d.id), Some(2));
        assert!(!catalog.detail_failed(first, "Failed to load challenge details."));
        assert_eq!(catalog.error(), None);
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        let pending = catalog.select(1);
        assert!(catalog.is_loading_detail());

        let ticket = catalog.begin_list_fetch();
        catalog.apply_list(ticket, vec![summary(2, false, 0)]);

        assert_eq!(catalog.selected(), None);
        assert!(!catalog.is_loading_detail());
        assert!(catalog.verdict().is_none());
        assert!(catalog.error().is_none());

        // 重新加载之前发出的详情请求作废
        assert!(!catalog.apply_detail(pending, detail(1)));
        assert!(catalog.detail().is_none());
        assert!(catalog.begin_submit().is_none());
    }

    #[test]
    fn test_patches_do_not_accumulate() {
        let mut catalog = loaded(vec![summary(1, false, 0)]);
        for _ in 0..1000 {
            submit(&mut catalog, 1, false);
        }
        assert_eq!(catalog.item(1).unwrap().attempts, 1000);
        // 只剩当前选择的详情请求可能用到的那一个
        assert!(catalog.patches.len() <= 1);

        // 列表拉取在途时补丁保留，响应到达后重新应用
        let ticket = catalog.begin_list_fetch();
        submit(&mut catalog, 1, true);
        submit(&mut catalog, 1, false);
        assert_eq!(
            catalog.patches.iter().filter(|p| p.revision > ticket.revision).count(),
            2
        );

        catalog.apply_list(ticket, vec![summary(1, false, 1000)]);
        let item = catalog.item(1).unwrap();
        assert_eq!(item.attempts, 1002);
        assert!(item.solved);
        assert!(catalog.patches.is_empty());
    }

    #[test]
    fn test_pending_detail_keeps_newer_patches() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        let ticket = catalog.select(1);
        // 详情请求在途时另一处的判定落到了同一题
        let submit_ticket = catalog.begin_submit().unwrap();
        catalog.apply_verdict(submit_ticket, verdict(true));
        assert_eq!(catalog.patches.len(), 1);

        // 详情在提交之前生成
        let mut d = detail(1);
        d.solved = Some(false);
        d.attempts = Some(0);
        catalog.apply_detail(ticket, d);

        let item = catalog.item(1).unwrap();
        assert!(item.solved);
        assert_eq!(item.attempts, 1);
        assert!(catalog.patches.is_empty());
    }

    #[test]
    fn test_detail_syncs_item_progress() {
        let mut catalog = loaded(vec![summary(1, false, 0)]);
        let ticket = catalog.select(1);
        let mut d = detail(1);
        d.solved = Some(true);
        d.attempts = Some(5);
        catalog.apply_detail(ticket, d);

        let item = catalog.item(1).unwrap();
        assert!(item.solved);
        assert_eq!(item.attempts, 5);
    }

    #[test]
    fn test_select_and_submit_clear_verdict_and_error() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        submit(&mut catalog, 1, true);
        assert!(catalog.verdict().is_some());

        catalog.select(2);
        assert!(catalog.verdict().is_none());

        let ticket = catalog.begin_submit().unwrap();
        catalog.submit_failed(ticket, "Invalid SQL syntax");
        assert_eq!(catalog.error(), Some("Invalid SQL syntax"));
        assert_eq!(catalog.item(2).unwrap().attempts, 0);

        catalog.begin_submit().unwrap();
        assert_eq!(catalog.error(), None);
        assert!(catalog.begin_submit().is_none());
    }

    #[test]
    fn test_verdict_after_reselect_still_patches_list() {
        let mut catalog = loaded(vec![summary(1, false, 0), summary(2, false, 0)]);
        catalog.select(1);
        let ticket = catalog.begin_submit().unwrap();
        catalog.select(2);
        catalog.apply_verdict(ticket, verdict(true));

        assert!(catalog.verdict().is_none());
        assert!(catalog.item(1).unwrap().solved);
        assert!(!catalog.is_submitting());
    }

    #[test]
    fn test_next_step_only_after_pass() {
        let mut catalog = loaded(vec![summary(1, false, 0)]);
        catalog.select(1);
        let ticket = catalog.begin_submit().unwrap();
        let mut v = verdict(true);
        v.next_challenge = Some(ChallengeRef {
            id: 2,
            name: "Select Name and Price".into(),
            level: Level::Basic,
        });
        catalog.apply_verdict(ticket, v);
        assert_eq!(catalog.next_step().map(|c| c.id), Some(2));

        assert!(Catalog::new().begin_submit().is_none());
    }

    #[test]
    fn test_aborted_submit_is_not_an_attempt() {
        let mut catalog = loaded(vec![summary(1, false, 2)]);
        catalog.select(1);
        let ticket = catalog.begin_submit().unwrap();
        assert!(catalog.begin_submit().is_none());

        catalog.abort_submit(ticket);
        assert!(!catalog.is_submitting());
        assert!(catalog.error().is_none());
        assert_eq!(catalog.item(1).unwrap().attempts, 2);
    }
}
