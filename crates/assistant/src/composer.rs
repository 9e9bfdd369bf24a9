//! Answer composition.
//!
//! A question moves through a fixed pipeline:
//!
//! 1. **Resolve** the leave type and employee it mentions
//! 2. **Classify** it into an [`Intent`]
//! 3. **Retrieve** rule text from the matching document engine
//! 4. **Compute** the balance, for balance questions only
//! 5. **Compose** exactly one answer text
//!
//! Unresolved questions and employees without a usable join date exit
//! early with a fixed message and make no retrieval call.

use std::sync::Arc;

use chrono::NaiveDate;
use leavedesk_config::{LeaveConfig, SeniorityArithmetic};
use leavedesk_core::employee::{EmployeeRecord, EmployeeStore};
use leavedesk_core::error::RetrievalError;
use leavedesk_core::leave::{BalanceStrategy, LeavePolicyTable, LeaveType, SenioritySchedule};
use leavedesk_core::retrieval::QueryEngine;
use tracing::{debug, info};

use crate::balance::{entitled_days, parse_join_date, remaining_fixed, seniority_months};
use crate::intent::{classify, Intent, IntentKind};
use crate::resolve::resolve;

/// Shown when a question cannot be matched to any branch.
pub const GUIDANCE_MESSAGE: &str =
    "請確認問題是否包含員工姓名與假別，或請明確詢問規則 / 剩餘假 / 簽核流程";

/// The assistant's reply to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedAnswer {
    pub text: String,
    pub intent: IntentKind,
}

/// Turns questions into answers using the two document engines.
pub struct AnswerComposer {
    leave_engine: Arc<dyn QueryEngine>,
    approval_engine: Arc<dyn QueryEngine>,
    employees: Arc<EmployeeStore>,
    policies: LeavePolicyTable,
    schedule: SenioritySchedule,
    arithmetic: SeniorityArithmetic,
    /// Fixed evaluation date; `None` means today
    as_of: Option<NaiveDate>,
}

impl AnswerComposer {
    pub fn new(
        leave_engine: Arc<dyn QueryEngine>,
        approval_engine: Arc<dyn QueryEngine>,
        employees: Arc<EmployeeStore>,
    ) -> Self {
        Self {
            leave_engine,
            approval_engine,
            employees,
            policies: LeavePolicyTable::standard(),
            schedule: SenioritySchedule::default(),
            arithmetic: SeniorityArithmetic::default(),
            as_of: None,
        }
    }

    /// Apply the seniority mode and schedule from config.
    pub fn with_leave_config(mut self, config: &LeaveConfig) -> Self {
        self.arithmetic = config.seniority_arithmetic;
        self.schedule = config.seniority_schedule.clone();
        self
    }

    pub fn with_arithmetic(mut self, arithmetic: SeniorityArithmetic) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    /// Evaluate seniority as of a fixed date instead of today.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn employees(&self) -> &EmployeeStore {
        &self.employees
    }

    fn today(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Answer one question.
    ///
    /// Retrieval failures abort composition and are returned as errors.
    pub async fn compose(&self, question: &str) -> Result<ComposedAnswer, RetrievalError> {
        // ── Step 1: Resolve and classify ──
        let resolved = resolve(question, &self.policies, &self.employees);
        let intent = classify(&resolved);
        debug!(
            intent = ?intent.kind(),
            leave_type = resolved.leave_type.map(|t| t.name.as_str()),
            employee = resolved.employee.map(|e| e.name.as_str()),
            "Question classified"
        );

        // ── Step 2: Retrieve and compose per branch ──
        let text = match intent {
            Intent::Signing => {
                self.approval_engine
                    .query(&signing_prompt(question))
                    .await?
            }
            Intent::Policy { leave_type } => {
                let prompt = match leave_type {
                    Some(t) => policy_prompt(&t.name),
                    None => general_policy_prompt(question),
                };
                self.leave_engine.query(&prompt).await?
            }
            Intent::PolicyByTypeOnly { leave_type } => {
                self.leave_engine.query(&policy_prompt(&leave_type.name)).await?
            }
            Intent::Balance {
                leave_type,
                employee,
            } => self.compose_balance(leave_type, employee).await?,
            Intent::Unresolved => GUIDANCE_MESSAGE.to_string(),
        };

        Ok(ComposedAnswer {
            text,
            intent: intent.kind(),
        })
    }

    async fn compose_balance(
        &self,
        leave_type: &LeaveType,
        employee: &EmployeeRecord,
    ) -> Result<String, RetrievalError> {
        let used = employee.used_days(&leave_type.name);

        match leave_type.strategy {
            BalanceStrategy::FixedQuota { limit } => {
                let rule = self.leave_engine.query(&policy_prompt(&leave_type.name)).await?;
                let remain = remaining_fixed(limit, used);
                debug!(employee = %employee.name, limit, used, remain, "Fixed quota computed");
                Ok(fixed_quota_answer(&rule, &leave_type.name, limit, used, remain))
            }
            BalanceStrategy::RuleOnly => {
                self.leave_engine.query(&policy_prompt(&leave_type.name)).await
            }
            BalanceStrategy::SeniorityBased => {
                let join = match parse_join_date(employee) {
                    Ok(date) => date,
                    Err(e) => {
                        info!(error = %e, "Seniority not computable");
                        return Ok(e.user_message());
                    }
                };

                // ── Step 3: Seniority ──
                let months = seniority_months(join, self.today());
                let years = months / 12;
                let rule = self.leave_engine.query(&seniority_prompt(years)).await?;

                match self.arithmetic {
                    SeniorityArithmetic::Local => {
                        let entitled = entitled_days(&self.schedule, months);
                        let remain = remaining_fixed(entitled, used);
                        debug!(employee = %employee.name, years, entitled, used, remain, "Seniority balance computed");
                        Ok(format!(
                            "{rule}\n\n{}",
                            seniority_summary(years, entitled, used, remain)
                        ))
                    }
                    SeniorityArithmetic::Delegated => {
                        let prompt = delegated_prompt(&rule, &employee.name, years, used);
                        self.leave_engine.query(&prompt).await
                    }
                }
            }
        }
    }
}

fn signing_prompt(question: &str) -> String {
    format!(
        "你是公司 AI 助理，請依據簽呈規則回答：{question}\n只能根據提供的簽核條文回答，若查不到請說「查無明確規則」。"
    )
}

fn policy_prompt(leave_type: &str) -> String {
    format!("請說明公司 {leave_type} 的請假規定")
}

fn general_policy_prompt(question: &str) -> String {
    format!("請依據公司請假規定回答：{question}")
}

fn seniority_prompt(years: u32) -> String {
    format!("請提供公司請假政策中，年資 {years} 年的員工特休天數")
}

fn delegated_prompt(rule: &str, employee: &str, years: u32, used: i64) -> String {
    format!(
        "公司特休規定如下：{rule}\n{employee} 的年資為 {years} 年，已休特休：{used} 天。\n\
         請計算剩餘特休天數，格式如下：\n\
         - 年資：X 年\n\
         - 可休特休：X 天\n\
         - 已休特休：X 天\n\
         - 剩餘特休：X 天"
    )
}

fn fixed_quota_answer(rule: &str, leave_type: &str, limit: i64, used: i64, remain: i64) -> String {
    format!(
        "{rule}\n\n- 可休{leave_type}：{limit} 天\n- 已休{leave_type}：{used} 天\n- 剩餘{leave_type}：{remain} 天"
    )
}

fn seniority_summary(years: u32, entitled: i64, used: i64, remain: i64) -> String {
    format!("- 年資：{years} 年\n- 可休特休：{entitled} 天\n- 已休特休：{used} 天\n- 剩餘特休：{remain} 天")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{store_with, ScriptedEngine};
    use std::collections::BTreeMap;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn employees() -> Arc<EmployeeStore> {
        Arc::new(store_with(vec![
            ("王小明", Some("2020-03-15"), BTreeMap::from([("特休".to_string(), 5), ("事假".to_string(), 20)])),
            ("李小華", None, BTreeMap::new()),
            ("陳大文", Some("2020/03/15"), BTreeMap::new()),
        ]))
    }

    fn composer(leave: &Arc<ScriptedEngine>, approval: &Arc<ScriptedEngine>) -> AnswerComposer {
        AnswerComposer::new(leave.clone(), approval.clone(), employees()).with_as_of(as_of())
    }

    #[tokio::test]
    async fn signing_question_goes_to_approval_engine() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "unused"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "由部門主管核准"));

        let answer = composer(&leave, &approval).compose("請假三天要誰簽？").await.unwrap();

        assert_eq!(answer.intent, IntentKind::Signing);
        assert_eq!(answer.text, "由部門主管核准");
        assert_eq!(leave.call_count(), 0);
        assert_eq!(
            approval.prompts(),
            vec!["你是公司 AI 助理，請依據簽呈規則回答：請假三天要誰簽？\n只能根據提供的簽核條文回答，若查不到請說「查無明確規則」。"]
        );
    }

    #[tokio::test]
    async fn policy_question_interpolates_leave_type() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "病假一年三十日"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("病假怎麼請").await.unwrap();

        assert_eq!(answer.intent, IntentKind::Policy);
        assert_eq!(answer.text, "病假一年三十日");
        assert_eq!(leave.prompts(), vec!["請說明公司 病假 的請假規定"]);
    }

    #[tokio::test]
    async fn policy_question_without_leave_type_uses_question() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "請於系統提出申請"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        composer(&leave, &approval).compose("請假方式是什麼").await.unwrap();

        assert_eq!(leave.prompts(), vec!["請依據公司請假規定回答：請假方式是什麼"]);
    }

    #[tokio::test]
    async fn leave_type_only_is_answered_as_policy() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "婚假八日"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("婚假有幾天").await.unwrap();

        assert_eq!(answer.intent, IntentKind::PolicyByTypeOnly);
        assert_eq!(leave.prompts(), vec!["請說明公司 婚假 的請假規定"]);
    }

    #[tokio::test]
    async fn fixed_quota_appends_local_summary() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "事假全年十四日"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("王小明還有幾天事假").await.unwrap();

        assert_eq!(answer.intent, IntentKind::Balance);
        assert_eq!(
            answer.text,
            "事假全年十四日\n\n- 可休事假：14 天\n- 已休事假：20 天\n- 剩餘事假：-6 天"
        );
        assert_eq!(leave.call_count(), 1);
    }

    #[tokio::test]
    async fn rule_only_balance_returns_rule() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "喪假依親等給假"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("王小明的喪假").await.unwrap();

        assert_eq!(answer.text, "喪假依親等給假");
        assert_eq!(leave.prompts(), vec!["請說明公司 喪假 的請假規定"]);
    }

    #[tokio::test]
    async fn local_seniority_makes_one_call() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "滿三年者十四日"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("王小明還剩幾天特休").await.unwrap();

        assert_eq!(
            answer.text,
            "滿三年者十四日\n\n- 年資：4 年\n- 可休特休：14 天\n- 已休特休：5 天\n- 剩餘特休：9 天"
        );
        assert_eq!(leave.prompts(), vec!["請提供公司請假政策中，年資 4 年的員工特休天數"]);
    }

    #[tokio::test]
    async fn delegated_seniority_makes_two_calls() {
        let leave = Arc::new(ScriptedEngine::with_answers(
            "leave_policy",
            &["滿三年者十四日", "- 年資：4 年\n- 剩餘特休：9 天"],
        ));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval)
            .with_arithmetic(SeniorityArithmetic::Delegated)
            .compose("王小明還剩幾天特休")
            .await
            .unwrap();

        assert_eq!(answer.text, "- 年資：4 年\n- 剩餘特休：9 天");
        let prompts = leave.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].starts_with("公司特休規定如下：滿三年者十四日\n王小明 的年資為 4 年，已休特休：5 天。"));
        assert!(prompts[1].ends_with("- 剩餘特休：X 天"));
    }

    #[tokio::test]
    async fn missing_join_date_warns_without_retrieval() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "unused"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("李小華的特休").await.unwrap();

        assert_eq!(answer.text, "⚠️ 員工資料缺少入職日，無法計算年資");
        assert_eq!(leave.call_count(), 0);
        assert_eq!(approval.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_join_date_warns_without_retrieval() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "unused"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("陳大文的特休").await.unwrap();

        assert!(answer.text.contains("2020/03/15"));
        assert_eq!(leave.call_count(), 0);
    }

    #[tokio::test]
    async fn unresolved_returns_guidance_without_retrieval() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "unused"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let answer = composer(&leave, &approval).compose("今天午餐吃什麼").await.unwrap();

        assert_eq!(answer.intent, IntentKind::Unresolved);
        assert_eq!(answer.text, GUIDANCE_MESSAGE);
        assert_eq!(leave.call_count() + approval.call_count(), 0);
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let leave = Arc::new(ScriptedEngine::failing("leave_policy"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));

        let err = composer(&leave, &approval).compose("病假怎麼請").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Provider { ref engine, .. } if engine == "leave_policy"));
    }

    #[tokio::test]
    async fn leave_config_selects_mode_and_schedule() {
        let leave = Arc::new(ScriptedEngine::new("leave_policy", "rule"));
        let approval = Arc::new(ScriptedEngine::new("approval_flow", "unused"));
        let config = LeaveConfig {
            seniority_arithmetic: SeniorityArithmetic::Local,
            seniority_schedule: SenioritySchedule {
                tiers: vec![leavedesk_core::leave::SeniorityTier { min_months: 0, days: 20 }],
                growth: None,
            },
        };

        let answer = composer(&leave, &approval)
            .with_leave_config(&config)
            .compose("王小明的特休")
            .await
            .unwrap();

        assert!(answer.text.ends_with("- 可休特休：20 天\n- 已休特休：5 天\n- 剩餘特休：15 天"));
    }
}
