mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_test::{assert_err, assert_ok};

use common::{gotos, is_mutation, shared_journal, state_with_cookie, test_config, Action, FakeFactory, PageScript};
use leetcode_submit::error::{AuthError, SubmitError};
use leetcode_submit::infrastructure::Locator;
use leetcode_submit::models::{Language, SubmissionRequest, Verdict};
use leetcode_submit::services::{AuthStateStore, ManualOperator, SessionOutcome};
use leetcode_submit::SubmissionOrchestrator;

const TWO_SUM: &str = "class Solution:\n    def twoSum(self, nums, target):\n        seen = {}\n        for i, n in enumerate(nums):\n            if target - n in seen:\n                return [seen[target - n], i]\n            seen[n] = i\n";

fn two_sum_request() -> SubmissionRequest {
    SubmissionRequest::new("two-sum", TWO_SUM, Language::Python3).unwrap()
}

struct ScriptedOperator {
    confirm: bool,
    asked: Arc<AtomicBool>,
}

#[async_trait]
impl ManualOperator for ScriptedOperator {
    async fn confirm_manual_login(&self, _login_url: &str) -> bool {
        self.asked.store(true, Ordering::SeqCst);
        self.confirm
    }
}

#[tokio::test]
async fn test_two_sum_accepted_and_auth_file_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = AuthStateStore::new(config.auth_state_path.clone());
    assert_ok!(store.write(&state_with_cookie("LEETCODE_SESSION", "stale")).await);

    let factory = FakeFactory::new(PageScript::happy_leetcode());
    let (journal, opens) = shared_journal(&factory);
    let orchestrator = SubmissionOrchestrator::new(config.clone(), Box::new(factory));

    let report = assert_ok!(orchestrator.submit(&two_sum_request()).await);

    assert_eq!(report.slug, "two-sum");
    assert_eq!(report.verdict(), Verdict::Accepted);
    assert_eq!(report.session, SessionOutcome::Authenticated);
    assert_eq!(report.stages.injected_with, Some("monaco"));
    assert!(report.stages.language_selected);
    assert_eq!(report.stages.submitted_with, Some("data-cy"));
    assert!(report.auth_persisted);

    assert_eq!(*opens.lock().unwrap(), vec![true]);
    let actions = journal.lock().unwrap().clone();
    assert_eq!(
        gotos(&actions),
        vec![
            config.root_url(),
            "https://leetcode.com/problems/two-sum/".to_string()
        ]
    );
    assert_eq!(actions.last(), Some(&Action::Close));

    let saved = store.load().await.unwrap();
    assert_eq!(saved.cookies[0].value, "fresh");
}

#[tokio::test]
async fn test_legacy_codemirror_page_uses_codemirror() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let script = PageScript {
        codemirror: true,
        body_text: "Wrong Answer".into(),
        live_state: state_with_cookie("LEETCODE_SESSION", "legacy"),
        ..Default::default()
    }
    .with(Locator::css("img[data-cy='profile-avatar']"))
    .with(Locator::css_with_text("button", "Submit"));
    let factory = FakeFactory::new(script);
    let (journal, opens) = shared_journal(&factory);

    let report = assert_ok!(
        SubmissionOrchestrator::new(config, Box::new(factory))
            .submit(&two_sum_request())
            .await
    );

    assert_eq!(report.stages.injected_with, Some("codemirror"));
    assert!(!report.stages.language_selected);
    assert_eq!(report.stages.submitted_with, Some("text"));
    assert_eq!(report.verdict(), Verdict::WrongAnswer);
    // 没有 auth 文件，直接打开匿名上下文
    assert_eq!(*opens.lock().unwrap(), vec![false]);
    assert_eq!(journal.lock().unwrap().last(), Some(&Action::Close));
}

#[tokio::test]
async fn test_no_auth_and_no_credentials_aborts_before_problem_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let factory = FakeFactory::new(PageScript::default().with(Locator::text("Sign in")));
    let (journal, _) = shared_journal(&factory);

    let err = assert_err!(
        SubmissionOrchestrator::new(config.clone(), Box::new(factory))
            .submit(&two_sum_request())
            .await
    );
    assert!(matches!(
        err,
        SubmitError::Auth(AuthError::MissingCredentials { .. })
    ));

    let actions = journal.lock().unwrap().clone();
    assert_eq!(gotos(&actions), vec![config.root_url()]);
    assert!(!actions.iter().any(is_mutation));
    // 中断时也要关闭浏览上下文
    assert_eq!(actions.last(), Some(&Action::Close));
    assert!(!config.auth_state_path.exists());
}

#[tokio::test]
async fn test_manual_login_fallback_persists_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.headless = false;

    let mut script = PageScript::happy_leetcode();
    // 页面未登录，但其余部分正常
    script.elements.retain(|l| *l != Locator::css("img[data-cy='profile-avatar']"));
    script.elements.push(Locator::text("Sign in"));
    let factory = FakeFactory::new(script);
    let (journal, _) = shared_journal(&factory);

    let asked = Arc::new(AtomicBool::new(false));
    let orchestrator = SubmissionOrchestrator::new(config.clone(), Box::new(factory))
        .with_operator(Box::new(ScriptedOperator {
            confirm: true,
            asked: asked.clone(),
        }));

    let report = assert_ok!(orchestrator.submit(&two_sum_request()).await);

    assert!(asked.load(Ordering::SeqCst));
    assert_eq!(report.session, SessionOutcome::ManualLogin { persisted: true });
    assert_eq!(report.verdict(), Verdict::Accepted);
    assert!(gotos(&journal.lock().unwrap()).contains(&config.login_url()));
    assert!(config.auth_state_path.exists());
}

#[tokio::test]
async fn test_manual_login_aborted_is_auth_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let factory = FakeFactory::new(PageScript::default().with(Locator::text("Sign in")));
    let (journal, _) = shared_journal(&factory);
    let orchestrator = SubmissionOrchestrator::new(config.clone(), Box::new(factory))
        .with_operator(Box::new(ScriptedOperator {
            confirm: false,
            asked: Arc::default(),
        }));

    let err = assert_err!(orchestrator.submit(&two_sum_request()).await);
    assert!(matches!(
        err,
        SubmitError::Auth(AuthError::ManualLoginAborted { .. })
    ));
    assert_eq!(journal.lock().unwrap().last(), Some(&Action::Close));
    assert!(!config.auth_state_path.exists());
}

#[tokio::test]
async fn test_browser_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut factory = FakeFactory::new(PageScript::happy_leetcode());
    factory.unavailable = true;

    let err = assert_err!(
        SubmissionOrchestrator::new(config, Box::new(factory))
            .submit(&two_sum_request())
            .await
    );
    assert!(matches!(err, SubmitError::BrowserUnavailable(_)));
}

#[tokio::test]
async fn test_stage_failures_do_not_abort() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // 已登录，但没有编辑器、没有语言下拉框、没有提交按钮、没有结果
    let factory = FakeFactory::new(
        PageScript::default().with(Locator::css("img[data-cy='profile-avatar']")),
    );
    let (journal, _) = shared_journal(&factory);

    let report = assert_ok!(
        SubmissionOrchestrator::new(config.clone(), Box::new(factory))
            .submit(&two_sum_request())
            .await
    );

    assert_eq!(report.stages.injected_with, None);
    assert!(!report.stages.language_selected);
    assert_eq!(report.stages.submitted_with, None);
    assert_eq!(report.verdict(), Verdict::Unknown);
    assert!(report.auth_persisted);
    assert_eq!(journal.lock().unwrap().last(), Some(&Action::Close));
}
