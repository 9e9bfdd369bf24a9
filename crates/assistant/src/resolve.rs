//! Entity resolution: which leave type and which employee a question is about.
//!
//! Both lookups are plain substring containment. When several names match,
//! the first one in table (or file) order wins, so an employee whose name is
//! a substring of another's can shadow it depending on data order.

use leavedesk_core::employee::{EmployeeRecord, EmployeeStore};
use leavedesk_core::leave::{LeavePolicyTable, LeaveType};

/// A question together with the entities mentioned in it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedQuery<'a> {
    pub raw_question: &'a str,
    pub leave_type: Option<&'a LeaveType>,
    pub employee: Option<&'a EmployeeRecord>,
}

pub fn resolve_leave_type<'a>(question: &str, table: &'a LeavePolicyTable) -> Option<&'a LeaveType> {
    table.iter().find(|t| question.contains(t.name.as_str()))
}

pub fn resolve_employee<'a>(question: &str, store: &'a EmployeeStore) -> Option<&'a EmployeeRecord> {
    store
        .records()
        .iter()
        .find(|e| question.contains(e.name.as_str()))
}

pub fn resolve<'a>(
    question: &'a str,
    table: &'a LeavePolicyTable,
    store: &'a EmployeeStore,
) -> ResolvedQuery<'a> {
    ResolvedQuery {
        raw_question: question,
        leave_type: resolve_leave_type(question, table),
        employee: resolve_employee(question, store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::store_of;

    #[test]
    fn finds_leave_type_and_employee() {
        let table = LeavePolicyTable::standard();
        let store = store_of(&[("王小明", Some("2020-03-15")), ("李小華", None)]);

        let resolved = resolve("李小華還有幾天事假？", &table, &store);
        assert_eq!(resolved.leave_type.unwrap().name, "事假");
        assert_eq!(resolved.employee.unwrap().name, "李小華");
        assert_eq!(resolved.raw_question, "李小華還有幾天事假？");
    }

    #[test]
    fn nothing_mentioned_resolves_to_none() {
        let table = LeavePolicyTable::standard();
        let store = store_of(&[("王小明", None)]);

        let resolved = resolve("今天天氣如何", &table, &store);
        assert!(resolved.leave_type.is_none());
        assert!(resolved.employee.is_none());
    }

    #[test]
    fn ambiguous_names_take_first_in_file_order() {
        let table = LeavePolicyTable::standard();

        let store = store_of(&[("王明", None), ("王明華", None)]);
        assert_eq!(resolve_employee("王明華的特休", &store).unwrap().name, "王明");

        let store = store_of(&[("王明華", None), ("王明", None)]);
        assert_eq!(resolve_employee("王明華的特休", &store).unwrap().name, "王明華");

        assert!(resolve_leave_type("產假怎麼算", &table).is_none());
    }
}
