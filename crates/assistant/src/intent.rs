//! Intent classification.
//!
//! Rules are checked in priority order and the first match wins:
//!
//! 1. **Signing**: "who" (`誰`) together with an approval word
//! 2. **Policy**: a how-to / rules keyword
//! 3. **PolicyByTypeOnly**: a leave type but no employee
//! 4. **Balance**: a leave type and an employee
//! 5. **Unresolved**: anything else

use leavedesk_core::employee::EmployeeRecord;
use leavedesk_core::leave::LeaveType;

use crate::resolve::ResolvedQuery;

const SIGNING_SUBJECT: &str = "誰";
const SIGNING_WORDS: &[&str] = &["簽", "核准", "簽核"];
const POLICY_KEYWORDS: &[&str] = &["怎麼請", "如何請", "請假方式", "休幾天", "規定", "申請辦法"];

/// What a question is asking for, with the entities each branch needs.
#[derive(Debug, Clone, Copy)]
pub enum Intent<'a> {
    Signing,
    Policy { leave_type: Option<&'a LeaveType> },
    PolicyByTypeOnly { leave_type: &'a LeaveType },
    Balance {
        leave_type: &'a LeaveType,
        employee: &'a EmployeeRecord,
    },
    Unresolved,
}

/// Intent without its payload, for logging and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Signing,
    Policy,
    PolicyByTypeOnly,
    Balance,
    Unresolved,
}

impl Intent<'_> {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Signing => IntentKind::Signing,
            Intent::Policy { .. } => IntentKind::Policy,
            Intent::PolicyByTypeOnly { .. } => IntentKind::PolicyByTypeOnly,
            Intent::Balance { .. } => IntentKind::Balance,
            Intent::Unresolved => IntentKind::Unresolved,
        }
    }
}

pub fn is_signing_question(text: &str) -> bool {
    text.contains(SIGNING_SUBJECT) && SIGNING_WORDS.iter().any(|w| text.contains(w))
}

pub fn is_policy_question(text: &str) -> bool {
    POLICY_KEYWORDS.iter().any(|k| text.contains(k))
}

pub fn classify<'a>(query: &ResolvedQuery<'a>) -> Intent<'a> {
    let text = query.raw_question;

    if is_signing_question(text) {
        return Intent::Signing;
    }
    if is_policy_question(text) {
        return Intent::Policy {
            leave_type: query.leave_type,
        };
    }
    match (query.leave_type, query.employee) {
        (Some(leave_type), None) => Intent::PolicyByTypeOnly { leave_type },
        (Some(leave_type), Some(employee)) => Intent::Balance {
            leave_type,
            employee,
        },
        (None, _) => Intent::Unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::test_helpers::store_of;
    use leavedesk_core::leave::LeavePolicyTable;

    fn kind_of(question: &str) -> IntentKind {
        let table = LeavePolicyTable::standard();
        let store = store_of(&[("王小明", Some("2020-03-15"))]);
        classify(&resolve(question, &table, &store)).kind()
    }

    #[test]
    fn who_plus_approval_is_signing_regardless_of_other_content() {
        assert_eq!(kind_of("請假三天要誰簽？"), IntentKind::Signing);
        assert_eq!(kind_of("王小明的特休規定要誰核准"), IntentKind::Signing);
        assert_eq!(kind_of("簽核流程找誰"), IntentKind::Signing);
    }

    #[test]
    fn approval_word_without_who_is_not_signing() {
        assert!(!is_signing_question("簽核流程是什麼"));
        assert!(!is_signing_question("誰在休假"));
    }

    #[test]
    fn policy_keywords() {
        assert_eq!(kind_of("病假怎麼請？"), IntentKind::Policy);
        assert_eq!(kind_of("王小明的事假規定"), IntentKind::Policy);
        assert_eq!(kind_of("申請辦法在哪裡"), IntentKind::Policy);
    }

    #[test]
    fn leave_type_without_employee_is_policy_by_type() {
        assert_eq!(kind_of("婚假有幾天"), IntentKind::PolicyByTypeOnly);
    }

    #[test]
    fn employee_and_leave_type_is_balance() {
        let table = LeavePolicyTable::standard();
        let store = store_of(&[("王小明", Some("2020-03-15"))]);
        let resolved = resolve("王小明還剩幾天特休", &table, &store);

        match classify(&resolved) {
            Intent::Balance {
                leave_type,
                employee,
            } => {
                assert_eq!(leave_type.name, "特休");
                assert_eq!(employee.name, "王小明");
            }
            other => panic!("expected balance, got {other:?}"),
        }
    }

    #[test]
    fn nothing_recognized_is_unresolved() {
        assert_eq!(kind_of("今天午餐吃什麼"), IntentKind::Unresolved);
        assert_eq!(kind_of("王小明在嗎"), IntentKind::Unresolved);
    }
}
